//! Scalar views and their display options.

use std::fmt;

/// Gmsh colormap number used for thickness fields.
pub const DEFAULT_COLORMAP: u32 = 17;

/// Display options of one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    /// Shown when the file is opened.
    pub visible: bool,
    /// Colormap number.
    pub colormap: u32,
    /// Reverse the colormap.
    pub colormap_swap: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            visible: false,
            colormap: DEFAULT_COLORMAP,
            colormap_swap: true,
        }
    }
}

/// Identifies a published view within its backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewHandle(pub(crate) usize);

impl ViewHandle {
    /// Handle of the view at `index` in publication order, for backends
    /// implemented outside this crate.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the view in publication order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One scalar per element, under a label.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarView {
    /// Human-readable name shown by the viewer.
    pub label: String,
    /// Element identifiers, parallel to `values`.
    pub element_tags: Vec<u64>,
    /// One value per element.
    pub values: Vec<f64>,
    /// Display options.
    pub options: ViewOptions,
}

impl ScalarView {
    /// Number of elements carried by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the view carries no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
