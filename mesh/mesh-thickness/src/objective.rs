//! Per-triangle inscribed-sphere objective.

use mesh_types::{Point3, Vector3};

/// The scalar function whose roots are candidate sphere radii for one
/// triangle.
///
/// For triangle `i` with centroid `c_i` and normal `n_i`,
///
/// ```text
/// f(r) = min over j != i of | |(c_i - c_j) · n_i| - r |
/// ```
///
/// i.e. the distance from `r` to the nearest normal-projected distance of
/// another centroid. Every projected distance is a root; which one a solver
/// reaches depends on its starting point.
///
/// The projected distances are computed and sorted once, so each
/// evaluation is a binary search instead of a pass over all triangles.
///
/// # Example
///
/// ```
/// use mesh_thickness::RadiusObjective;
/// use mesh_types::{Point3, Vector3};
///
/// let centroids = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(0.0, 0.0, 2.0),
///     Point3::new(5.0, 0.0, 0.5),
/// ];
/// let f = RadiusObjective::new(&centroids, 0, &Vector3::z());
/// assert_eq!(f.candidates(), &[0.5, 2.0]);
/// assert!((f.evaluate(1.0) - 0.5).abs() < 1e-12);
/// assert_eq!(f.evaluate(2.0), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusObjective {
    distances: Vec<f64>,
}

impl RadiusObjective {
    /// Build the objective of triangle `index` from all centroids and its
    /// normal. Non-finite projections are dropped.
    #[must_use]
    pub fn new(centroids: &[Point3<f64>], index: usize, normal: &Vector3<f64>) -> Self {
        let origin = centroids[index];
        let mut distances: Vec<f64> = centroids
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != index)
            .map(|(_, c)| (origin - c).dot(normal).abs())
            .filter(|d| d.is_finite())
            .collect();
        distances.sort_unstable_by(f64::total_cmp);
        Self { distances }
    }

    /// Sorted projected distances.
    #[must_use]
    pub fn candidates(&self) -> &[f64] {
        &self.distances
    }

    /// Evaluate `f(r)`. Infinite when there is no other triangle.
    #[must_use]
    pub fn evaluate(&self, r: f64) -> f64 {
        let split = self.distances.partition_point(|&d| d < r);
        let above = self.distances.get(split).map(|&d| d - r);
        let below = split
            .checked_sub(1)
            .and_then(|k| self.distances.get(k))
            .map(|&d| r - d);
        match (below, above) {
            (Some(b), Some(a)) => b.min(a),
            (Some(v), None) | (None, Some(v)) => v,
            (None, None) => f64::INFINITY,
        }
    }
}
