//! The capability a visualization frontend offers to the pipeline.

use std::path::Path;

use mesh_types::SurfaceMesh;

use crate::error::ViewResult;
use crate::view::{ScalarView, ViewHandle, ViewOptions};

/// Accepts named scalar fields over the elements of one mesh, and
/// persists them.
///
/// Element identifiers are the mesh's element tags, not triangle indices;
/// callers map between the two.
pub trait ViewBackend {
    /// Attach the mesh that subsequent views refer to. Views published
    /// against a previous mesh are discarded.
    fn set_mesh(&mut self, mesh: &SurfaceMesh);

    /// Register `values` over `element_tags` under `label`. The new view
    /// starts hidden with default options.
    ///
    /// # Errors
    ///
    /// Fails if no mesh is attached, the slices differ in length, or a tag
    /// is not an element of the attached mesh.
    fn publish(&mut self, element_tags: &[u64], values: &[f64], label: &str)
    -> ViewResult<ViewHandle>;

    /// A published view.
    ///
    /// # Errors
    ///
    /// Fails for a handle this backend did not issue.
    fn view(&self, view: ViewHandle) -> ViewResult<&ScalarView>;

    /// Mutable display options of a published view.
    ///
    /// # Errors
    ///
    /// Fails for a handle this backend did not issue.
    fn options_mut(&mut self, view: ViewHandle) -> ViewResult<&mut ViewOptions>;

    /// Write one view to `path`, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Fails for an unknown handle, a missing mesh, or any I/O error.
    fn persist(&self, view: ViewHandle, path: &Path) -> ViewResult<()>;
}
