//! Evaluation configuration.

use std::path::{Path, PathBuf};

use mesh_thickness::ThicknessParams;

/// File name of the scaled radius view.
pub const RADII_FILE: &str = "radii_scaled.msh";

/// File name of the scaled gradient view.
pub const GRADIENT_FILE: &str = "gradient_scaled.msh";

/// What to evaluate and where to put the results.
///
/// # Example
///
/// ```
/// use mesh_thickness::ThicknessParams;
/// use waam_evaluator::EvaluationConfig;
///
/// let config = EvaluationConfig::new("part.stl")
///     .output_dir("results")
///     .params(ThicknessParams::default().parallel(false));
/// assert!(config.radii_path().ends_with("results/radii_scaled.msh"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationConfig {
    /// STL or STEP input file.
    pub input: PathBuf,
    /// Directory receiving one file per view; created if missing.
    pub output_dir: PathBuf,
    /// Tessellation hint for STEP input. The truck backend reads it as the
    /// chord-deviation tolerance, not an edge length. `None` or zero lets
    /// the backend choose.
    pub sizing: Option<f64>,
    /// Solver and post-processing parameters.
    pub params: ThicknessParams,
}

impl EvaluationConfig {
    /// Evaluate `input`, writing into `output/`.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: PathBuf::from("output"),
            sizing: None,
            params: ThicknessParams::default(),
        }
    }

    /// Set the output directory.
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the CAD sizing hint.
    #[must_use]
    pub const fn sizing(mut self, sizing: Option<f64>) -> Self {
        self.sizing = sizing;
        self
    }

    /// Set the analysis parameters.
    #[must_use]
    pub fn params(mut self, params: ThicknessParams) -> Self {
        self.params = params;
        self
    }

    /// Path of the scaled radius view.
    #[must_use]
    pub fn radii_path(&self) -> PathBuf {
        self.output_file(RADII_FILE)
    }

    /// Path of the scaled gradient view.
    #[must_use]
    pub fn gradient_path(&self) -> PathBuf {
        self.output_file(GRADIENT_FILE)
    }

    fn output_file(&self, name: impl AsRef<Path>) -> PathBuf {
        self.output_dir.join(name)
    }
}
