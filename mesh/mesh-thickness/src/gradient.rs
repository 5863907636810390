//! Neighbour finite-difference gradient of the radius field.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use mesh_types::SurfaceMesh;
use tracing::debug;

use crate::adjacency::EdgeAdjacency;
use crate::error::{ThicknessError, ThicknessResult};
use crate::radius::RadiusField;

/// One gradient magnitude per triangle.
///
/// `values[i]` is `0.0` wherever the gradient is undefined; [`Self::is_defined`]
/// tells the two cases apart.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GradientField {
    values: Vec<f64>,
    defined: Vec<bool>,
}

impl GradientField {
    /// Raw values, parallel to the incidence table.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Whether triangle `index` had at least one neighbour with a valid
    /// radius at a distinct centroid.
    #[must_use]
    pub fn is_defined(&self, index: usize) -> bool {
        self.defined.get(index).copied().unwrap_or(false)
    }

    /// Number of triangles with a defined gradient.
    #[must_use]
    pub fn defined_count(&self) -> usize {
        self.defined.iter().filter(|&&d| d).count()
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
}

/// Gradient magnitude of the radius field over shared-edge neighbours.
///
/// For triangle `i` with radius `r_i`, the gradient is the Euclidean
/// norm of the finite differences
///
/// ```text
/// (r_i - r_j) / |c_j - c_i|
/// ```
///
/// over neighbours `j` whose radius is valid and whose centroid is farther
/// than `degenerate_epsilon` from `c_i`. Only neighbours are filtered: a
/// triangle whose own radius is [`INVALID_RADIUS`](crate::INVALID_RADIUS)
/// uses the sentinel as `r_i`. Triangles without a qualifying neighbour keep
/// the default `0.0`.
///
/// # Errors
///
/// Returns [`ThicknessError::FieldLength`] if `radii` or `adjacency` do not
/// have one entry per triangle.
///
/// # Example
///
/// ```
/// use mesh_thickness::{radius_gradient, EdgeAdjacency, RadiusField};
/// use mesh_types::{Point3, SurfaceMesh, Vector3};
///
/// let mesh = SurfaceMesh::with_sequential_tags(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(3.0, 0.0, 0.0),
///         Point3::new(3.0, 3.0, 0.0),
///         Point3::new(0.0, 3.0, 0.0),
///     ],
///     vec![[0, 1, 2], [0, 2, 3]],
///     vec![Vector3::z(); 2],
/// )
/// .unwrap();
/// let adjacency = EdgeAdjacency::build(mesh.triangles());
/// let radii = RadiusField::from_values(vec![1.0, 1.0]);
///
/// let gradient = radius_gradient(&mesh, &adjacency, &radii, 1e-12).unwrap();
/// assert_eq!(gradient.values(), &[0.0, 0.0]);
/// assert!(gradient.is_defined(0));
/// ```
pub fn radius_gradient(
    mesh: &SurfaceMesh,
    adjacency: &EdgeAdjacency,
    radii: &RadiusField,
    degenerate_epsilon: f64,
) -> ThicknessResult<GradientField> {
    let triangle_count = mesh.triangle_count();
    ThicknessError::check_length("radius field", triangle_count, radii.len())?;
    ThicknessError::check_length("adjacency", triangle_count, adjacency.len())?;

    let centroids = mesh.centroids();
    let mut values = vec![0.0; triangle_count];
    let mut defined = vec![false; triangle_count];
    let mut coincident = 0_usize;

    for i in 0..triangle_count {
        // An invalid own radius still enters the differences as the sentinel
        let r_i = radii.values()[i];

        let mut sum_sq = 0.0;
        let mut terms = 0_usize;
        for &j in adjacency.neighbours(i) {
            let j = j as usize;
            let Some(r_j) = radii.get(j) else {
                continue;
            };
            let distance = (centroids[j] - centroids[i]).norm();
            if distance <= degenerate_epsilon {
                coincident += 1;
                continue;
            }
            let diff = (r_i - r_j) / distance;
            sum_sq += diff * diff;
            terms += 1;
        }

        if terms > 0 {
            values[i] = sum_sq.sqrt();
            defined[i] = true;
        }
    }

    let defined_count = defined.iter().filter(|&&d| d).count();
    debug!(
        defined = defined_count,
        undefined = triangle_count - defined_count,
        coincident_neighbours = coincident,
        "Computed radius gradient"
    );

    Ok(GradientField { values, defined })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::radius::INVALID_RADIUS;
    use approx::assert_relative_eq;
    use mesh_types::{Point3, Vector3};

    /// Strip of three triangles: 0-1 share an edge, 1-2 share an edge.
    fn strip() -> SurfaceMesh {
        SurfaceMesh::with_sequential_tags(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(2.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [1, 3, 2], [1, 4, 3]],
            vec![Vector3::z(); 3],
        )
        .unwrap()
    }

    fn gradient_of(radii: Vec<f64>) -> GradientField {
        let mesh = strip();
        let adjacency = EdgeAdjacency::build(mesh.triangles());
        radius_gradient(&mesh, &adjacency, &RadiusField::from_values(radii), 1e-12).unwrap()
    }

    #[test]
    fn middle_triangle_combines_both_neighbours() {
        let mesh = strip();
        let c = mesh.centroids();
        let gradient = gradient_of(vec![1.0, 2.0, 4.0]);

        let d01 = (c[1] - c[0]).norm();
        let d12 = (c[2] - c[1]).norm();
        let expected = ((2.0 - 1.0) / d01).hypot((2.0 - 4.0) / d12);
        assert_relative_eq!(gradient.values()[1], expected, epsilon = 1e-12);
        assert_relative_eq!(gradient.values()[0], 1.0 / d01, epsilon = 1e-12);
        assert_eq!(gradient.defined_count(), 3);
    }

    #[test]
    fn invalid_neighbour_is_skipped() {
        let mesh = strip();
        let c = mesh.centroids();
        let gradient = gradient_of(vec![1.0, INVALID_RADIUS, 4.0]);

        // Ends only touch the invalid middle triangle
        assert_eq!(gradient.values()[0], 0.0);
        assert_eq!(gradient.values()[2], 0.0);
        assert!(!gradient.is_defined(0));
        assert!(!gradient.is_defined(2));

        let d01 = (c[1] - c[0]).norm();
        let d12 = (c[2] - c[1]).norm();
        let expected = ((INVALID_RADIUS - 1.0) / d01).hypot((INVALID_RADIUS - 4.0) / d12);
        assert_relative_eq!(gradient.values()[1], expected, epsilon = 1e-12);
        assert!(gradient.is_defined(1));
    }

    #[test]
    fn invalid_own_radius_enters_as_sentinel() {
        let mesh = strip();
        let c = mesh.centroids();
        let gradient = gradient_of(vec![INVALID_RADIUS, 2.0, 2.0]);

        let d01 = (c[1] - c[0]).norm();
        assert_relative_eq!(gradient.values()[0], (2.0 - INVALID_RADIUS) / d01, epsilon = 1e-12);
        assert!(gradient.is_defined(0));
        // The middle triangle only sees the valid right neighbour
        assert_eq!(gradient.values()[1], 0.0);
        assert!(gradient.is_defined(1));
    }

    #[test]
    fn invalid_pair_across_one_edge() {
        // Square split along its diagonal: centroid distance sqrt(2) / 3
        let mesh = SurfaceMesh::with_sequential_tags(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
            vec![Vector3::z(); 2],
        )
        .unwrap();
        let adjacency = EdgeAdjacency::build(mesh.triangles());
        let radii = RadiusField::from_values(vec![INVALID_RADIUS, 1.0]);
        let gradient = radius_gradient(&mesh, &adjacency, &radii, 1e-12).unwrap();

        let distance = 2.0_f64.sqrt() / 3.0;
        assert_relative_eq!(gradient.values()[0], 2.0 / distance, epsilon = 1e-12);
        // The valid triangle's only neighbour is invalid
        assert_eq!(gradient.values()[1], 0.0);
        assert!(!gradient.is_defined(1));
    }

    #[test]
    fn coincident_centroids_are_skipped() {
        // Two triangles on the same nodes would not be neighbours, so build
        // a collapsed pair whose centroids coincide but share one edge.
        let mesh = SurfaceMesh::with_sequential_tags(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 0.0),
            ],
            vec![[0, 1, 2], [1, 2, 3]],
            vec![Vector3::z(); 2],
        )
        .unwrap();
        let adjacency = EdgeAdjacency::build(mesh.triangles());
        assert!(adjacency.are_neighbours(0, 1));

        let radii = RadiusField::from_values(vec![1.0, 5.0]);
        let gradient = radius_gradient(&mesh, &adjacency, &radii, 1e-12).unwrap();
        assert_eq!(gradient.values(), &[0.0, 0.0]);
        assert_eq!(gradient.defined_count(), 0);
    }

    #[test]
    fn mismatched_field_is_an_error() {
        let mesh = strip();
        let adjacency = EdgeAdjacency::build(mesh.triangles());
        let radii = RadiusField::from_values(vec![1.0]);
        let err = radius_gradient(&mesh, &adjacency, &radii, 1e-12).unwrap_err();
        assert!(matches!(err, ThicknessError::FieldLength { expected: 3, got: 1, .. }));
    }
}
