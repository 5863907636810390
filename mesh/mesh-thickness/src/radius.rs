//! Multi-start radius solve over every triangle.

// Mesh processing uses indices; casts are safe for practical mesh sizes.
#![allow(clippy::cast_precision_loss)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use mesh_types::SurfaceMesh;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::ThicknessResult;
use crate::objective::RadiusObjective;
use crate::params::ThicknessParams;
use crate::root::{RootOptions, find_root};

/// Radius recorded for triangles without a converged solution.
pub const INVALID_RADIUS: f64 = -1.0;

/// How each triangle's solve ended, counted over the mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveStats {
    /// A trial converged.
    pub converged: usize,
    /// All trials failed.
    pub failed: usize,
    /// Normal was zero or non-finite; no trial was run.
    pub degenerate_normals: usize,
    /// Not attempted because the time budget ran out.
    pub skipped_by_deadline: usize,
}

impl SolveStats {
    /// Triangles holding [`INVALID_RADIUS`].
    #[must_use]
    pub const fn invalid(&self) -> usize {
        self.failed + self.degenerate_normals + self.skipped_by_deadline
    }
}

/// One radius per triangle, [`INVALID_RADIUS`] where none was found.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RadiusField {
    values: Vec<f64>,
    stats: SolveStats,
}

impl RadiusField {
    /// Wrap raw values; anything negative or non-finite counts as invalid.
    #[must_use]
    pub fn from_values(values: Vec<f64>) -> Self {
        let converged = values.iter().filter(|&&r| is_valid_radius(r)).count();
        let stats = SolveStats {
            converged,
            failed: values.len() - converged,
            ..SolveStats::default()
        };
        Self { values, stats }
    }

    /// Raw values, parallel to the incidence table.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the field has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The radius of triangle `index`, if it is valid.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().filter(|&r| is_valid_radius(r))
    }

    /// Iterator over valid radii.
    pub fn valid(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied().filter(|&r| is_valid_radius(r))
    }

    /// Largest valid radius.
    #[must_use]
    pub fn max_valid(&self) -> Option<f64> {
        self.valid().reduce(f64::max)
    }

    /// Per-outcome counts.
    #[must_use]
    pub const fn stats(&self) -> &SolveStats {
        &self.stats
    }

    /// Consume the field, returning its values.
    #[must_use]
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Whether `r` is a real radius rather than the sentinel.
#[must_use]
pub fn is_valid_radius(r: f64) -> bool {
    r.is_finite() && r >= 0.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Solve {
    Converged(f64),
    Failed,
    Degenerate,
    Skipped,
}

/// Solve the inscribed-sphere radius of every triangle.
///
/// Each triangle's [`RadiusObjective`] is handed to [`find_root`] from the
/// guesses of [`ThicknessParams::initial_guesses`]; the first converged
/// trial wins. Triangles whose normal is shorter than `degenerate_epsilon`
/// are not solved. All of them, plus those where every trial fails or the
/// time budget ran out first, get [`INVALID_RADIUS`]. No per-triangle
/// outcome is an error.
///
/// Triangles are independent, so with `params.parallel` they are solved on
/// the rayon pool; the result is identical either way.
///
/// # Errors
///
/// Returns [`ThicknessError::InvalidParams`](crate::ThicknessError::InvalidParams)
/// if `params` does not validate.
///
/// # Example
///
/// ```
/// use mesh_thickness::{solve_radii, ThicknessParams};
/// use mesh_types::{Point3, SurfaceMesh, Vector3};
///
/// // Two facing triangles one unit apart
/// let mesh = SurfaceMesh::with_sequential_tags(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///         Point3::new(0.0, 0.0, 1.0),
///         Point3::new(0.0, 1.0, 1.0),
///         Point3::new(1.0, 0.0, 1.0),
///     ],
///     vec![[0, 1, 2], [3, 4, 5]],
///     vec![Vector3::z(), -Vector3::z()],
/// )
/// .unwrap();
///
/// let radii = solve_radii(&mesh, &ThicknessParams::default()).unwrap();
/// assert!((radii.values()[0] - 1.0).abs() < 1e-6);
/// assert!((radii.values()[1] - 1.0).abs() < 1e-6);
/// ```
pub fn solve_radii(mesh: &SurfaceMesh, params: &ThicknessParams) -> ThicknessResult<RadiusField> {
    params.validate()?;

    let triangle_count = mesh.triangle_count();
    info!(
        triangles = triangle_count,
        trials = params.max_trials,
        parallel = params.parallel,
        "Solving inscribed-sphere radii"
    );

    let centroids = mesh.centroids();
    let normals = mesh.normals();
    let options = RootOptions {
        residual_tolerance: params.residual_tolerance,
        max_evaluations: params.max_evaluations,
    };

    let start = Instant::now();
    let expired = AtomicBool::new(false);
    let out_of_time = || {
        if expired.load(Ordering::Relaxed) {
            return true;
        }
        let over = params.time_budget.is_some_and(|b| start.elapsed() >= b);
        if over {
            expired.store(true, Ordering::Relaxed);
        }
        over
    };

    let solve_one = |i: usize| -> Solve {
        if out_of_time() {
            return Solve::Skipped;
        }
        let normal = normals[i];
        let length = normal.norm();
        if !length.is_finite() || length < params.degenerate_epsilon {
            return Solve::Degenerate;
        }
        let objective = RadiusObjective::new(&centroids, i, &(normal / length));
        params
            .initial_guesses()
            .find_map(|guess| find_root(|r| objective.evaluate(r), guess, &options).root())
            .map_or(Solve::Failed, |r| Solve::Converged(r.max(0.0)))
    };

    let outcomes: Vec<Solve> = if params.parallel {
        (0..triangle_count).into_par_iter().map(solve_one).collect()
    } else {
        (0..triangle_count).map(solve_one).collect()
    };

    let mut stats = SolveStats::default();
    let values: Vec<f64> = outcomes
        .into_iter()
        .map(|outcome| match outcome {
            Solve::Converged(r) => {
                stats.converged += 1;
                r
            }
            Solve::Failed => {
                stats.failed += 1;
                INVALID_RADIUS
            }
            Solve::Degenerate => {
                stats.degenerate_normals += 1;
                INVALID_RADIUS
            }
            Solve::Skipped => {
                stats.skipped_by_deadline += 1;
                INVALID_RADIUS
            }
        })
        .collect();

    debug!(
        elapsed_ms = start.elapsed().as_millis(),
        converged = stats.converged,
        "Radius solve finished"
    );
    if stats.degenerate_normals > 0 {
        warn!(
            count = stats.degenerate_normals,
            "Triangles with degenerate normals marked invalid"
        );
    }
    if stats.failed > 0 {
        warn!(
            count = stats.failed,
            fraction = stats.failed as f64 / triangle_count as f64,
            "No converged radius after all trials"
        );
    }
    if stats.skipped_by_deadline > 0 {
        warn!(
            count = stats.skipped_by_deadline,
            "Time budget exhausted before all triangles were solved"
        );
    }

    Ok(RadiusField { values, stats })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{Point3, Vector3};
    use std::time::Duration;

    /// Two unit squares, z = 0 facing up and z = `gap` facing down.
    fn plates(gap: f64) -> SurfaceMesh {
        let nodes = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, gap),
            Point3::new(1.0, 0.0, gap),
            Point3::new(1.0, 1.0, gap),
            Point3::new(0.0, 1.0, gap),
        ];
        let triangles = vec![[0, 1, 2], [0, 2, 3], [4, 6, 5], [4, 7, 6]];
        let normals = vec![Vector3::z(), Vector3::z(), -Vector3::z(), -Vector3::z()];
        SurfaceMesh::with_sequential_tags(nodes, triangles, normals).unwrap()
    }

    #[test]
    fn parallel_plates_give_the_gap() {
        let radii = solve_radii(&plates(1.0), &ThicknessParams::default()).unwrap();
        for &r in radii.values() {
            assert_relative_eq!(r, 1.0, epsilon = 1e-6);
        }
        assert_eq!(radii.stats().converged, 4);
        assert_eq!(radii.stats().invalid(), 0);
    }

    #[test]
    fn root_nearest_the_first_guess_wins() {
        // Candidates are 0 (coplanar neighbour) and the gap. A 0.3 gap is
        // closer to the first guess of 1.0; a 3.0 gap is not.
        let thin = solve_radii(&plates(0.3), &ThicknessParams::default()).unwrap();
        for &r in thin.values() {
            assert_relative_eq!(r, 0.3, epsilon = 1e-6);
        }

        let thick = solve_radii(&plates(3.0), &ThicknessParams::default()).unwrap();
        assert!(thick.values().iter().all(|&r| r.abs() < 1e-6));

        let params = ThicknessParams::default().first_guess(4.0);
        let thick = solve_radii(&plates(3.0), &params).unwrap();
        for &r in thick.values() {
            assert_relative_eq!(r, 3.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn sequential_matches_parallel() {
        let mesh = plates(2.5);
        let par = solve_radii(&mesh, &ThicknessParams::default()).unwrap();
        let seq = solve_radii(&mesh, &ThicknessParams::default().parallel(false)).unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn zero_normal_is_invalid_without_solving() {
        let mesh = plates(1.0);
        let mut normals = mesh.normals().to_vec();
        normals[1] = Vector3::zeros();
        let mesh = SurfaceMesh::with_sequential_tags(
            mesh.nodes().to_vec(),
            mesh.triangles().to_vec(),
            normals,
        )
        .unwrap();

        let radii = solve_radii(&mesh, &ThicknessParams::default()).unwrap();
        assert_eq!(radii.values()[1], INVALID_RADIUS);
        assert_eq!(radii.get(1), None);
        assert_eq!(radii.stats().degenerate_normals, 1);
        assert_relative_eq!(radii.values()[0], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn single_triangle_fails_to_converge() {
        let mesh = SurfaceMesh::with_sequential_tags(
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
            vec![[0, 1, 2]],
            vec![Vector3::z()],
        )
        .unwrap();
        let radii = solve_radii(&mesh, &ThicknessParams::default()).unwrap();
        assert_eq!(radii.values(), &[INVALID_RADIUS]);
        assert_eq!(radii.stats().failed, 1);
    }

    #[test]
    fn exhausted_budget_skips_everything() {
        let params = ThicknessParams::default().time_budget(Duration::ZERO);
        let radii = solve_radii(&plates(1.0), &params).unwrap();
        assert!(radii.values().iter().all(|&r| r == INVALID_RADIUS));
        assert_eq!(radii.stats().skipped_by_deadline, 4);
    }

    #[test]
    fn invalid_params_are_rejected() {
        let params = ThicknessParams::default().max_trials(0);
        assert!(solve_radii(&plates(1.0), &params).is_err());
    }

    #[test]
    fn field_accessors() {
        let field = RadiusField::from_values(vec![0.5, INVALID_RADIUS, 2.0]);
        assert_eq!(field.len(), 3);
        assert_eq!(field.max_valid(), Some(2.0));
        assert_eq!(field.valid().count(), 2);
        assert_eq!(field.stats().failed, 1);
        assert!(!is_valid_radius(f64::NAN));
        assert!(is_valid_radius(0.0));
    }
}
