//! Error types for mesh loading.

use std::path::PathBuf;

use mesh_types::MeshError;
use thiserror::Error;

/// Result type for mesh I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while building a canonical mesh from a file.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// The file extension names neither a CAD nor a triangulated format.
    #[error("unsupported file format: .{extension} (expected .step, .stp or .stl)")]
    UnsupportedFormat {
        /// The unrecognized extension.
        extension: String,
    },

    /// The CAD backend rejected the geometry or could not mesh it.
    #[error("geometry import failed for {path}: {message}")]
    GeometryImport {
        /// File being imported.
        path: PathBuf,
        /// Backend diagnostic.
        message: String,
    },

    /// Invalid file content (parse error).
    #[error("invalid file content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// Invalid header in binary STL.
    #[error("invalid STL header: expected {expected} bytes, got {got}")]
    InvalidHeader {
        /// Expected header size.
        expected: usize,
        /// Actual header size.
        got: usize,
    },

    /// Binary STL ended before the declared facet count.
    #[error("invalid face count: expected {expected}, got {got}")]
    InvalidFaceCount {
        /// Declared number of facets.
        expected: u32,
        /// Facets actually read.
        got: u32,
    },

    /// The assembled tables were inconsistent.
    #[error("invalid mesh tables: {0}")]
    Mesh(#[from] MeshError),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Float parsing error.
    #[error("float parsing error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),
}

impl IoError {
    /// Create an `InvalidContent` error with the given message.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }

    /// Create a `GeometryImport` error for `path`.
    #[must_use]
    pub fn geometry_import(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::GeometryImport {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Map an open/read failure, distinguishing a missing file.
    pub(crate) fn from_open(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(err)
        }
    }
}
