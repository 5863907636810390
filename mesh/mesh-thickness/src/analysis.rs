//! Full wall-thickness pipeline over one mesh.

use mesh_types::SurfaceMesh;
use tracing::info;

use crate::adjacency::EdgeAdjacency;
use crate::error::{ThicknessError, ThicknessResult};
use crate::gradient::{GradientField, radius_gradient};
use crate::params::ThicknessParams;
use crate::radius::{RadiusField, solve_radii};
use crate::result::ThicknessReport;
use crate::scaling::{scale_gradient, scale_radii};

/// Raw and display-ready fields of one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct WallAnalysis {
    /// Inscribed-sphere radius per triangle.
    pub radii: RadiusField,
    /// Radius gradient per triangle.
    pub gradient: GradientField,
    /// Radii divided by the largest valid radius; invalid entries stay at
    /// the sentinel.
    pub scaled_radii: Vec<f64>,
    /// Gradient shifted to zero, outlier-clamped and scaled to one.
    pub scaled_gradient: Vec<f64>,
    /// Summary counts and extrema.
    pub report: ThicknessReport,
}

/// Solve radii, derive the gradient and normalise both for display.
///
/// # Errors
///
/// Returns [`ThicknessError::EmptyMesh`] for a mesh without triangles and
/// [`ThicknessError::InvalidParams`] if `params` does not validate.
/// Per-triangle failures are never errors.
///
/// # Example
///
/// ```
/// use mesh_thickness::{analyze_walls, ThicknessParams};
/// use mesh_types::{Point3, SurfaceMesh, Vector3};
///
/// // Two facing unit squares one unit apart
/// let mesh = SurfaceMesh::with_sequential_tags(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(1.0, 1.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///         Point3::new(0.0, 0.0, 1.0),
///         Point3::new(1.0, 0.0, 1.0),
///         Point3::new(1.0, 1.0, 1.0),
///         Point3::new(0.0, 1.0, 1.0),
///     ],
///     vec![[0, 1, 2], [0, 2, 3], [4, 6, 5], [4, 7, 6]],
///     vec![Vector3::z(), Vector3::z(), -Vector3::z(), -Vector3::z()],
/// )
/// .unwrap();
///
/// let analysis = analyze_walls(&mesh, &ThicknessParams::default()).unwrap();
/// assert_eq!(analysis.report.solve.converged, 4);
/// assert!(analysis.scaled_radii.iter().all(|r| (r - 1.0).abs() < 1e-6));
/// ```
pub fn analyze_walls(mesh: &SurfaceMesh, params: &ThicknessParams) -> ThicknessResult<WallAnalysis> {
    params.validate()?;
    if mesh.is_empty() {
        return Err(ThicknessError::empty_mesh());
    }

    info!(
        nodes = mesh.node_count(),
        triangles = mesh.triangle_count(),
        "Starting wall thickness analysis"
    );

    let radii = solve_radii(mesh, params)?;
    let adjacency = EdgeAdjacency::build(mesh.triangles());
    let gradient = radius_gradient(mesh, &adjacency, &radii, params.degenerate_epsilon)?;

    let scaled_radii = scale_radii(&radii);
    let scaled_gradient = scale_gradient(gradient.values(), params.outlier_fraction);
    let report = ThicknessReport::from_fields(&radii, &gradient);

    info!(
        converged = report.solve.converged,
        invalid = report.solve.invalid(),
        neighbour_pairs = adjacency.pair_count(),
        min_wall = report.min_wall_thickness().map(|t| format!("{t:.3}")),
        "Wall thickness analysis complete"
    );

    Ok(WallAnalysis {
        radii,
        gradient,
        scaled_radii,
        scaled_gradient,
        report,
    })
}
