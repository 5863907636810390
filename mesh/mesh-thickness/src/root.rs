//! Scalar root finding.
//!
//! Newton iteration with a forward-difference slope, so only function
//! values are needed. The radius objective is piecewise linear
//! with unit slope, for which one step lands on the root of the nearest
//! piece; the general loop covers the kinks.

/// Stopping rules for [`find_root`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootOptions {
    /// Converged when `|f(x)| <= residual_tolerance * max(|x|, 1)`.
    pub residual_tolerance: f64,
    /// Maximum number of function evaluations, including slope probes.
    pub max_evaluations: usize,
}

impl Default for RootOptions {
    fn default() -> Self {
        Self {
            residual_tolerance: 1e-6,
            max_evaluations: 400,
        }
    }
}

/// Outcome of one root-finding run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RootOutcome {
    /// `root` satisfies the residual test.
    Converged {
        /// The root.
        root: f64,
        /// Function evaluations used.
        evaluations: usize,
    },
    /// The run gave up.
    Failed {
        /// Why the run stopped.
        reason: RootFailure,
        /// Function evaluations used.
        evaluations: usize,
    },
}

/// Reasons a root-finding run stops without a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootFailure {
    /// Evaluation budget exhausted.
    EvaluationLimit,
    /// The function or iterate became NaN or infinite.
    NonFinite,
    /// The finite-difference slope vanished.
    FlatSlope,
}

impl RootOutcome {
    /// The root, if the run converged.
    #[must_use]
    pub const fn root(&self) -> Option<f64> {
        match *self {
            Self::Converged { root, .. } => Some(root),
            Self::Failed { .. } => None,
        }
    }

    /// Function evaluations used.
    #[must_use]
    pub const fn evaluations(&self) -> usize {
        match *self {
            Self::Converged { evaluations, .. } | Self::Failed { evaluations, .. } => evaluations,
        }
    }
}

/// Find a root of `f` starting from `x0`.
///
/// # Example
///
/// ```
/// use mesh_thickness::{find_root, RootOptions};
///
/// let outcome = find_root(|x| x * x - 2.0, 1.0, &RootOptions::default());
/// let root = outcome.root().unwrap();
/// assert!((root - 2.0_f64.sqrt()).abs() < 1e-6);
/// ```
pub fn find_root<F>(mut f: F, x0: f64, options: &RootOptions) -> RootOutcome
where
    F: FnMut(f64) -> f64,
{
    let fail = |reason, evaluations| RootOutcome::Failed {
        reason,
        evaluations,
    };

    let mut x = x0;
    if !x.is_finite() {
        return fail(RootFailure::NonFinite, 0);
    }
    let mut fx = f(x);
    let mut evaluations = 1;

    loop {
        if !fx.is_finite() {
            return fail(RootFailure::NonFinite, evaluations);
        }
        if fx.abs() <= options.residual_tolerance * x.abs().max(1.0) {
            return RootOutcome::Converged {
                root: x,
                evaluations,
            };
        }
        if evaluations + 2 > options.max_evaluations {
            return fail(RootFailure::EvaluationLimit, evaluations);
        }

        let h = f64::EPSILON.sqrt() * x.abs().max(1.0);
        let slope = (f(x + h) - fx) / h;
        evaluations += 1;
        if !slope.is_finite() {
            return fail(RootFailure::NonFinite, evaluations);
        }
        if slope.abs() <= f64::EPSILON {
            return fail(RootFailure::FlatSlope, evaluations);
        }

        x -= fx / slope;
        if !x.is_finite() {
            return fail(RootFailure::NonFinite, evaluations);
        }
        fx = f(x);
        evaluations += 1;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn smooth_function() {
        let outcome = find_root(|x| x.powi(3) - 8.0, 1.0, &RootOptions::default());
        assert_relative_eq!(outcome.root().unwrap(), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn already_at_root_costs_one_evaluation() {
        let outcome = find_root(|x| x - 3.0, 3.0, &RootOptions::default());
        assert_eq!(
            outcome,
            RootOutcome::Converged {
                root: 3.0,
                evaluations: 1
            }
        );
    }

    #[test]
    fn absolute_value_kink_in_one_step() {
        // |x - 0.7| from either side
        let f = |x: f64| (x - 0.7).abs();
        let left = find_root(f, 0.1, &RootOptions::default());
        let right = find_root(f, 5.0, &RootOptions::default());
        assert_relative_eq!(left.root().unwrap(), 0.7, epsilon = 1e-6);
        assert_relative_eq!(right.root().unwrap(), 0.7, epsilon = 1e-6);
        assert!(left.evaluations() <= 3);
    }

    #[test]
    fn no_real_root_hits_limit_or_flat_slope() {
        let outcome = find_root(|x| x * x + 1.0, 0.5, &RootOptions::default());
        assert!(outcome.root().is_none());
        assert!(outcome.evaluations() <= RootOptions::default().max_evaluations);
    }

    #[test]
    fn flat_function_fails() {
        let outcome = find_root(|_| 1.0, 0.5, &RootOptions::default());
        assert!(matches!(
            outcome,
            RootOutcome::Failed {
                reason: RootFailure::FlatSlope,
                ..
            }
        ));
    }

    #[test]
    fn non_finite_values_fail() {
        let outcome = find_root(|_| f64::INFINITY, 1.0, &RootOptions::default());
        assert!(matches!(
            outcome,
            RootOutcome::Failed {
                reason: RootFailure::NonFinite,
                evaluations: 1
            }
        ));
        let outcome = find_root(|x| x, f64::NAN, &RootOptions::default());
        assert_eq!(outcome.evaluations(), 0);
    }

    #[test]
    fn respects_evaluation_limit() {
        let options = RootOptions {
            residual_tolerance: 1e-12,
            max_evaluations: 5,
        };
        let outcome = find_root(|x| x * x + 1.0, 3.0, &options);
        assert!(outcome.evaluations() <= 5);
        assert!(outcome.root().is_none());
    }
}
