//! Parameters for wall thickness analysis.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ThicknessError, ThicknessResult};

/// Parameters for wall thickness analysis.
///
/// # Example
///
/// ```
/// use mesh_thickness::ThicknessParams;
/// use std::time::Duration;
///
/// // Ten starts at 1, 1/2, 1/4, ... and a 95% outlier clamp
/// let params = ThicknessParams::default();
/// assert_eq!(params.max_trials, 10);
/// assert!((params.outlier_fraction - 0.95).abs() < 1e-12);
///
/// // Single-threaded with a one-minute deadline
/// let params = ThicknessParams::default()
///     .parallel(false)
///     .time_budget(Duration::from_secs(60));
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThicknessParams {
    /// Initial guess of the first root-finding trial. Each further trial
    /// halves the previous guess.
    pub first_guess: f64,

    /// Number of multi-start trials per triangle before it is marked invalid.
    pub max_trials: usize,

    /// A trial converges when `|f(r)| <= residual_tolerance * max(|r|, 1)`.
    pub residual_tolerance: f64,

    /// Objective evaluations allowed per trial.
    pub max_evaluations: usize,

    /// Normals shorter than this, and centroid distances at or below it,
    /// are treated as degenerate.
    pub degenerate_epsilon: f64,

    /// Gradient values at or above this fraction of the maximum are clamped.
    pub outlier_fraction: f64,

    /// Solve triangles on the rayon thread pool.
    pub parallel: bool,

    /// Overall deadline for the radius solve. Triangles not started in time
    /// receive the invalid radius.
    pub time_budget: Option<Duration>,
}

impl Default for ThicknessParams {
    fn default() -> Self {
        Self {
            first_guess: 1.0,
            max_trials: 10,
            residual_tolerance: 1e-6,
            max_evaluations: 400,
            degenerate_epsilon: 1e-12,
            outlier_fraction: 0.95,
            parallel: true,
            time_budget: None,
        }
    }
}

impl ThicknessParams {
    /// Set the first initial guess.
    #[must_use]
    pub const fn first_guess(mut self, guess: f64) -> Self {
        self.first_guess = guess;
        self
    }

    /// Set the number of multi-start trials.
    #[must_use]
    pub const fn max_trials(mut self, trials: usize) -> Self {
        self.max_trials = trials;
        self
    }

    /// Set the convergence tolerance on the objective.
    #[must_use]
    pub const fn residual_tolerance(mut self, tolerance: f64) -> Self {
        self.residual_tolerance = tolerance;
        self
    }

    /// Set the evaluation cap per trial.
    #[must_use]
    pub const fn max_evaluations(mut self, evaluations: usize) -> Self {
        self.max_evaluations = evaluations;
        self
    }

    /// Set the outlier clamp fraction.
    #[must_use]
    pub const fn outlier_fraction(mut self, fraction: f64) -> Self {
        self.outlier_fraction = fraction;
        self
    }

    /// Enable or disable parallel solving.
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set an overall deadline for the radius solve.
    #[must_use]
    pub const fn time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// The initial guesses tried in order: `first_guess / 2^k`.
    pub fn initial_guesses(&self) -> impl Iterator<Item = f64> + '_ {
        std::iter::successors(Some(self.first_guess), |g| Some(g / 2.0)).take(self.max_trials)
    }

    /// Check that the parameters describe a runnable analysis.
    ///
    /// # Errors
    ///
    /// Returns [`ThicknessError::InvalidParams`] naming the first bad field.
    pub fn validate(&self) -> ThicknessResult<()> {
        if !(self.first_guess.is_finite() && self.first_guess > 0.0) {
            return Err(ThicknessError::invalid_params(format!(
                "first_guess must be positive and finite, got {}",
                self.first_guess
            )));
        }
        if self.max_trials == 0 {
            return Err(ThicknessError::invalid_params(
                "max_trials must be at least 1",
            ));
        }
        if !(self.residual_tolerance.is_finite() && self.residual_tolerance > 0.0) {
            return Err(ThicknessError::invalid_params(format!(
                "residual_tolerance must be positive and finite, got {}",
                self.residual_tolerance
            )));
        }
        if self.max_evaluations < 2 {
            return Err(ThicknessError::invalid_params(
                "max_evaluations must be at least 2",
            ));
        }
        if !(self.degenerate_epsilon.is_finite() && self.degenerate_epsilon >= 0.0) {
            return Err(ThicknessError::invalid_params(format!(
                "degenerate_epsilon must be non-negative, got {}",
                self.degenerate_epsilon
            )));
        }
        if !(self.outlier_fraction > 0.0 && self.outlier_fraction <= 1.0) {
            return Err(ThicknessError::invalid_params(format!(
                "outlier_fraction must be in (0, 1], got {}",
                self.outlier_fraction
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = ThicknessParams::default();
        assert!((params.first_guess - 1.0).abs() < f64::EPSILON);
        assert_eq!(params.max_trials, 10);
        assert!(params.parallel);
        assert!(params.time_budget.is_none());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_initial_guesses_halve() {
        let guesses: Vec<f64> = ThicknessParams::default().initial_guesses().collect();
        assert_eq!(guesses.len(), 10);
        assert_eq!(guesses[0], 1.0);
        assert_eq!(guesses[1], 0.5);
        assert_eq!(guesses[9], 1.0 / 512.0);
    }

    #[test]
    fn test_builder_pattern() {
        let params = ThicknessParams::default()
            .first_guess(4.0)
            .max_trials(3)
            .residual_tolerance(1e-9)
            .max_evaluations(50)
            .outlier_fraction(0.9)
            .parallel(false)
            .time_budget(Duration::from_millis(250));

        assert_eq!(params.initial_guesses().collect::<Vec<_>>(), vec![4.0, 2.0, 1.0]);
        assert_eq!(params.max_evaluations, 50);
        assert!(!params.parallel);
        assert_eq!(params.time_budget, Some(Duration::from_millis(250)));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(ThicknessParams::default().max_trials(0).validate().is_err());
        assert!(ThicknessParams::default().first_guess(0.0).validate().is_err());
        assert!(ThicknessParams::default().first_guess(f64::NAN).validate().is_err());
        assert!(ThicknessParams::default().outlier_fraction(0.0).validate().is_err());
        assert!(ThicknessParams::default().outlier_fraction(1.5).validate().is_err());
        assert!(ThicknessParams::default().max_evaluations(1).validate().is_err());
        assert!(ThicknessParams::default()
            .residual_tolerance(-1.0)
            .validate()
            .is_err());
    }
}
