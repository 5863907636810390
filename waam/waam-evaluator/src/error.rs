//! Pipeline errors, tagged with the stage that failed.

use std::path::PathBuf;

use mesh_io::IoError;
use mesh_thickness::ThicknessError;
use mesh_view::ViewError;
use thiserror::Error;

/// Result type alias for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;

/// A fatal error in one stage of the evaluation.
///
/// Per-triangle numerical failures never show up here; they are carried
/// in the fields and the report.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The input could not be turned into a mesh.
    #[error("failed to load {path}")]
    Load {
        /// Input file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: IoError,
    },

    /// The mesh or the parameters were rejected by the analysis.
    #[error("wall thickness analysis failed")]
    Analyze {
        /// Underlying error.
        #[from]
        source: ThicknessError,
    },

    /// A field could not be registered with the view backend.
    #[error("failed to publish view '{label}'")]
    Publish {
        /// View label.
        label: String,
        /// Underlying error.
        #[source]
        source: ViewError,
    },

    /// A view could not be written.
    #[error("failed to write {path}")]
    Persist {
        /// Output file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: ViewError,
    },
}
