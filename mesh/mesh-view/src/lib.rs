//! Scalar-field views over mesh elements.
//!
//! A [`ViewBackend`] receives per-element scalar fields under a label,
//! keeps display options per view and persists each view to its own file.
//! [`MshViewStore`] writes Gmsh MSH 2.2 ASCII, which opens directly in Gmsh.
//!
//! # Example
//!
//! ```no_run
//! use mesh_types::{Point3, SurfaceMesh, Vector3};
//! use mesh_view::{MshViewStore, ViewBackend};
//! use std::path::Path;
//!
//! let mesh = SurfaceMesh::with_sequential_tags(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2]],
//!     vec![Vector3::z()],
//! )
//! .unwrap();
//!
//! let mut store = MshViewStore::new();
//! store.set_mesh(&mesh);
//! let view = store.publish(mesh.element_tags(), &[1.0], "Radii Gradients").unwrap();
//! store.options_mut(view).unwrap().visible = true;
//! store.persist(view, Path::new("out/gradient_scaled.msh")).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod backend;
mod error;
mod msh;
mod view;

pub use backend::ViewBackend;
pub use error::{ViewError, ViewResult};
pub use msh::MshViewStore;
pub use view::{DEFAULT_COLORMAP, ScalarView, ViewHandle, ViewOptions};
