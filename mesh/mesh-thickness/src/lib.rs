//! Wall thickness analysis for surface meshes.
//!
//! Thickness is measured per triangle as the radius of a sphere seated on
//! the triangle's centroid, along its inward normal, and reaching another
//! part of the surface. Doubling it gives the local wall thickness.
//!
//! # Algorithm
//!
//! For triangle `i` with centroid `c_i` and unit normal `n_i` pointing into
//! the material, every other centroid `c_j` proposes the candidate radius
//! `|(c_i - c_j) . n_i|`. The radius is a root of
//!
//! ```text
//! f(r) = min_j | |(c_i - c_j) . n_i| - r |
//! ```
//!
//! found with a forward-difference Newton iteration from a halving sequence
//! of initial guesses. The first converged trial wins. Triangles that never
//! converge, or whose normal is degenerate, get [`INVALID_RADIUS`].
//!
//! The gradient of the radius field is a finite difference over triangles
//! sharing an edge. Both fields are then normalised for display; the
//! gradient additionally has its top outliers clamped.
//!
//! # Example
//!
//! ```
//! use mesh_thickness::{analyze_walls, ThicknessParams};
//! use mesh_types::{Point3, SurfaceMesh, Vector3};
//!
//! // A plate of thickness 0.5: bottom face normals point up into the
//! // material, top face normals point down.
//! let mesh = SurfaceMesh::with_sequential_tags(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!         Point3::new(0.0, 0.0, 0.5),
//!         Point3::new(0.0, 1.0, 0.5),
//!         Point3::new(1.0, 0.0, 0.5),
//!     ],
//!     vec![[0, 1, 2], [3, 4, 5]],
//!     vec![Vector3::z(), -Vector3::z()],
//! )
//! .unwrap();
//!
//! let analysis = analyze_walls(&mesh, &ThicknessParams::default()).unwrap();
//! println!("{}", analysis.report);
//! assert!(analysis.report.min_wall_thickness().is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod adjacency;
mod analysis;
mod error;
mod gradient;
mod objective;
mod params;
mod radius;
mod result;
mod root;
mod scaling;

pub use adjacency::EdgeAdjacency;
pub use analysis::{WallAnalysis, analyze_walls};
pub use error::{ThicknessError, ThicknessResult};
pub use gradient::{GradientField, radius_gradient};
pub use objective::RadiusObjective;
pub use params::ThicknessParams;
pub use radius::{INVALID_RADIUS, RadiusField, SolveStats, is_valid_radius, solve_radii};
pub use result::ThicknessReport;
pub use root::{RootFailure, RootOptions, RootOutcome, find_root};
pub use scaling::{clamp_outliers, scale_by_max, scale_gradient, scale_radii, subtract_min};
