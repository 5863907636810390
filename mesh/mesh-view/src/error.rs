//! Error types for view publishing and persistence.

use std::path::PathBuf;

use thiserror::Error;

use crate::view::ViewHandle;

/// Result type alias for view operations.
pub type ViewResult<T> = Result<T, ViewError>;

/// Errors that can occur while publishing or writing views.
#[derive(Debug, Error)]
pub enum ViewError {
    /// I/O error while writing a view file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The directory of an output path could not be created.
    #[error("cannot create output directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// No mesh was attached before publishing or persisting.
    #[error("no mesh attached to the view store")]
    NoMesh,

    /// The handle does not refer to a published view.
    #[error("unknown view {0}")]
    UnknownView(ViewHandle),

    /// Element identifiers and values differ in length.
    #[error("view '{label}' has {values} values for {elements} elements")]
    LengthMismatch {
        /// View label.
        label: String,
        /// Number of element identifiers.
        elements: usize,
        /// Number of values.
        values: usize,
    },

    /// An element identifier is not a triangle of the attached mesh.
    #[error("view '{label}' refers to unknown element {tag}")]
    UnknownElement {
        /// View label.
        label: String,
        /// Offending element identifier.
        tag: u64,
    },
}

impl ViewError {
    /// Create a directory creation error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CreateDir {
            path: path.into(),
            source,
        }
    }
}
