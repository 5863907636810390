//! Wall-thickness evaluation of WAAM parts.
//!
//! Ties the mesh crates into one forward pipeline:
//!
//! 1. [`MeshBuilder`](mesh_io::MeshBuilder) turns STL or STEP input into a
//!    canonical surface mesh
//! 2. [`analyze_walls`](mesh_thickness::analyze_walls) solves the
//!    inscribed-sphere radius per triangle, derives the gradient and scales
//!    both for display
//! 3. a [`ViewBackend`](mesh_view::ViewBackend) receives the scaled fields
//!    and writes `radii_scaled.msh` and `gradient_scaled.msh`
//!
//! # Example
//!
//! ```no_run
//! use waam_evaluator::{evaluate, EvaluationConfig};
//!
//! let config = EvaluationConfig::new("bracket.stl").output_dir("bracket-walls");
//! let evaluation = evaluate(&config).unwrap();
//! println!("{}", evaluation.analysis.report);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod config;
mod error;
mod pipeline;

pub use config::{EvaluationConfig, GRADIENT_FILE, RADII_FILE};
pub use error::{EvalError, EvalResult};
pub use pipeline::{Evaluation, GRADIENT_LABEL, RADII_LABEL, evaluate, evaluate_with};
