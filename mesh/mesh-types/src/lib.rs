//! Canonical mesh tables for wall-thickness evaluation.
//!
//! This crate provides the representation every other stage works on:
//!
//! - [`SurfaceMesh`] - node table, incidence table, per-triangle normals and
//!   element tags, kept as parallel arrays keyed by triangle index
//! - [`Triangle`] - a triangle with resolved vertex positions
//! - [`Aabb`] - axis-aligned bounding box
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with no UI or CAD-kernel dependencies.
//!
//! # Units
//!
//! Unit-agnostic. All coordinates are `f64`; WAAM parts are usually modelled
//! in millimeters.
//!
//! # Normal Convention
//!
//! Normals are stored per triangle, not per node, and are unit length.
//! A degenerate source (zero-area facet, zero stored normal) is kept as the
//! zero vector so downstream stages can detect and skip it.
//!
//! # Example
//!
//! ```
//! use mesh_types::{Point3, SurfaceMesh, Vector3};
//!
//! let mesh = SurfaceMesh::with_sequential_tags(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.5, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2]],
//!     vec![Vector3::z()],
//! )
//! .unwrap();
//!
//! assert_eq!(mesh.triangle_count(), 1);
//! assert_eq!(mesh.element_tags(), &[1]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod error;
mod surface;
mod triangle;

pub use bounds::Aabb;
pub use error::{MeshError, MeshResult};
pub use surface::SurfaceMesh;
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
