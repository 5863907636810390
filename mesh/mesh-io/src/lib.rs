//! Mesh builder for wall-thickness evaluation.
//!
//! Turns an input file into a canonical [`SurfaceMesh`](mesh_types::SurfaceMesh):
//! a deduplicated node table, a triangle incidence table, one unit normal
//! and one element tag per triangle.
//!
//! - **STL** (binary and ASCII) is read directly. Vertices closer than half
//!   the shortest edge are welded and normals are the negated stored facet
//!   normals.
//! - **STEP** geometry is meshed by an injected [`CadBackend`], scoped to a
//!   [`CadSession`] per load. The `step` feature provides [`TruckBackend`],
//!   built on the truck CAD kernel.
//!
//! # Layer 0 Crate
//!
//! No UI or viewer dependencies; usable from CLIs, services and tests.
//!
//! # Example
//!
//! ```no_run
//! use mesh_io::MeshBuilder;
//!
//! let mut builder = MeshBuilder::new();
//! let mesh = builder.build("bracket.stl", None).unwrap();
//!
//! assert_eq!(mesh.normals().len(), mesh.triangle_count());
//! ```
//!
//! # Quality Standards
//!
//! - Zero clippy/doc warnings
//! - Zero `unwrap`/`expect` in library code

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod builder;
mod cad;
mod error;
#[cfg(feature = "step")]
mod step;
mod stl;
mod triangulated;
mod weld;

pub use builder::{MeshBuilder, MeshFormat};
pub use cad::{CadBackend, CadElement, CadSession, CadSurfaceMesh, load_parametric};
pub use error::{IoError, IoResult};
#[cfg(feature = "step")]
pub use step::TruckBackend;
pub use stl::{StlFacet, read_stl, save_stl};
pub use triangulated::{load_triangulated, mesh_from_facets};
pub use weld::{NodeWeld, weld_nodes};
