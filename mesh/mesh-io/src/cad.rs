//! Parametric (CAD) input through an injected meshing backend.
//!
//! A CAD kernel keeps session state between calls: imported geometry, mesh
//! size fields, the generated mesh. [`CadSession`] scopes that state to one
//! load: it resets the backend when opened and again when dropped, so two
//! evaluations sharing a backend never see each other's geometry.

use std::path::Path;

use hashbrown::HashMap;
use mesh_types::{Aabb, Point3, SurfaceMesh, Vector3};
use tracing::{debug, info, warn};

use crate::error::{IoError, IoResult};

/// One surface element as reported by a CAD mesher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CadElement {
    /// Mesher-assigned element identifier.
    pub tag: u64,
    /// Node tags of the three corners.
    pub nodes: [u64; 3],
    /// Geometric face the element was meshed on.
    pub face: usize,
}

/// Raw surface mesh as produced by a [`CadBackend`], before renumbering.
///
/// Node tags are arbitrary positive identifiers; `node_tags[k]` is the tag
/// of `nodes[k]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CadSurfaceMesh {
    /// Tag of each node.
    pub node_tags: Vec<u64>,
    /// Coordinates, parallel to `node_tags`.
    pub nodes: Vec<Point3<f64>>,
    /// Triangular surface elements.
    pub elements: Vec<CadElement>,
}

/// Capabilities the mesh builder needs from a CAD kernel.
///
/// Implementations hold kernel session state and are driven through a
/// [`CadSession`].
pub trait CadBackend {
    /// Import the geometry stored at `path`, replacing nothing: the session
    /// clears the backend beforehand.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::GeometryImport`] if the kernel rejects the file.
    fn import(&mut self, path: &Path) -> IoResult<()>;

    /// Request a target element size for every geometric point.
    fn set_target_size(&mut self, size: f64);

    /// Mesh all imported faces with triangles.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::GeometryImport`] if meshing fails.
    fn generate_surface_mesh(&mut self) -> IoResult<CadSurfaceMesh>;

    /// Surface normal of `face` at (or nearest to) `point`, not necessarily
    /// unit length. `None` when the kernel cannot evaluate it.
    fn face_normal(&self, face: usize, point: &Point3<f64>) -> Option<Vector3<f64>>;

    /// Axis-aligned bounds of the imported geometry.
    fn bounding_box(&self) -> Aabb;

    /// Drop all session state.
    fn clear(&mut self);
}

/// Scoped ownership of a [`CadBackend`] for one load.
///
/// # Example
///
/// ```
/// # use mesh_io::{CadBackend, CadSession, CadSurfaceMesh, IoResult};
/// # use mesh_types::{Aabb, Point3, Vector3};
/// # use std::path::Path;
/// # struct Nothing;
/// # impl CadBackend for Nothing {
/// #     fn import(&mut self, _: &Path) -> IoResult<()> { Ok(()) }
/// #     fn set_target_size(&mut self, _: f64) {}
/// #     fn generate_surface_mesh(&mut self) -> IoResult<CadSurfaceMesh> { Ok(CadSurfaceMesh::default()) }
/// #     fn face_normal(&self, _: usize, _: &Point3<f64>) -> Option<Vector3<f64>> { None }
/// #     fn bounding_box(&self) -> Aabb { Aabb::empty() }
/// #     fn clear(&mut self) {}
/// # }
/// let mut backend = Nothing;
/// {
///     let session = CadSession::open(&mut backend);
///     assert!(session.bounding_box().is_empty());
/// } // backend cleared here
/// ```
pub struct CadSession<'a> {
    backend: &'a mut dyn CadBackend,
}

impl<'a> CadSession<'a> {
    /// Start a session, resetting any state left by a previous run.
    pub fn open(backend: &'a mut dyn CadBackend) -> Self {
        backend.clear();
        Self { backend }
    }

    /// Import the geometry at `path`.
    ///
    /// # Errors
    ///
    /// Propagates the backend's import error.
    pub fn import(&mut self, path: &Path) -> IoResult<()> {
        self.backend.import(path)
    }

    /// Apply a sizing hint. `None`, zero, negative or non-finite values leave
    /// the backend on its automatic sizing.
    pub fn apply_sizing(&mut self, sizing: Option<f64>) {
        match sizing {
            Some(size) if size > 0.0 && size.is_finite() => {
                debug!(size, "Setting target element size");
                self.backend.set_target_size(size);
            }
            _ => debug!("Using automatic element size"),
        }
    }

    /// Mesh the imported geometry and canonicalise it.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::GeometryImport`] if meshing fails or an element
    /// references an unknown node tag.
    pub fn surface_mesh(&mut self, path: &Path) -> IoResult<SurfaceMesh> {
        let raw = self.backend.generate_surface_mesh()?;
        canonicalize(&raw, &*self.backend, path)
    }

    /// Bounds of the imported geometry.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        self.backend.bounding_box()
    }
}

impl Drop for CadSession<'_> {
    fn drop(&mut self) {
        self.backend.clear();
    }
}

/// Load parametric geometry through `backend` into a [`SurfaceMesh`].
///
/// Normals are the backend's analytic face normals at each triangle's
/// centroid, unit length; where the backend cannot evaluate one the normal
/// is the zero vector and the triangle later resolves to the invalid radius.
///
/// # Errors
///
/// Returns [`IoError::GeometryImport`] if import or meshing fails.
pub fn load_parametric(
    backend: &mut dyn CadBackend,
    path: &Path,
    sizing: Option<f64>,
) -> IoResult<SurfaceMesh> {
    let mut session = CadSession::open(backend);
    session.import(path)?;
    session.apply_sizing(sizing);
    let mesh = session.surface_mesh(path)?;
    info!(
        path = %path.display(),
        nodes = mesh.node_count(),
        triangles = mesh.triangle_count(),
        "Loaded parametric mesh"
    );
    Ok(mesh)
}

/// Renumber nodes by ascending tag and evaluate per-triangle normals.
#[allow(clippy::cast_possible_truncation)]
fn canonicalize(
    raw: &CadSurfaceMesh,
    backend: &dyn CadBackend,
    path: &Path,
) -> IoResult<SurfaceMesh> {
    if raw.node_tags.len() != raw.nodes.len() {
        return Err(IoError::geometry_import(
            path,
            format!(
                "mesher returned {} node tags for {} nodes",
                raw.node_tags.len(),
                raw.nodes.len()
            ),
        ));
    }

    let mut order: Vec<usize> = (0..raw.nodes.len()).collect();
    order.sort_by_key(|&k| raw.node_tags[k]);

    let mut index_of: HashMap<u64, u32> = HashMap::with_capacity(order.len());
    let mut nodes = Vec::with_capacity(order.len());
    for &k in &order {
        index_of.insert(raw.node_tags[k], nodes.len() as u32);
        nodes.push(raw.nodes[k]);
    }

    let mut triangles = Vec::with_capacity(raw.elements.len());
    let mut normals = Vec::with_capacity(raw.elements.len());
    let mut element_tags = Vec::with_capacity(raw.elements.len());
    let mut missing_normals = 0_usize;

    for element in &raw.elements {
        let mut row = [0_u32; 3];
        for (slot, tag) in row.iter_mut().zip(element.nodes) {
            *slot = *index_of.get(&tag).ok_or_else(|| {
                IoError::geometry_import(
                    path,
                    format!("element {} references unknown node {tag}", element.tag),
                )
            })?;
        }

        let [a, b, c] = row.map(|i| nodes[i as usize]);
        let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);
        let normal = backend
            .face_normal(element.face, &centroid)
            .and_then(|n| n.try_normalize(0.0));
        if normal.is_none() {
            missing_normals += 1;
        }

        triangles.push(row);
        normals.push(normal.unwrap_or_else(Vector3::zeros));
        element_tags.push(element.tag);
    }

    if missing_normals > 0 {
        warn!(
            count = missing_normals,
            "Face normal unavailable for some triangles; they will carry a zero normal"
        );
    }

    Ok(SurfaceMesh::new(nodes, triangles, normals, element_tags)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::path::PathBuf;

    /// Two faces: face 0 is the z=0 plane, face 1 has no evaluable normal.
    #[derive(Default)]
    struct FakeKernel {
        imported: Option<PathBuf>,
        size_requests: Vec<f64>,
        clears: usize,
        fail_import: bool,
    }

    impl CadBackend for FakeKernel {
        fn import(&mut self, path: &Path) -> IoResult<()> {
            if self.fail_import {
                return Err(IoError::geometry_import(path, "bad geometry"));
            }
            self.imported = Some(path.to_path_buf());
            Ok(())
        }

        fn set_target_size(&mut self, size: f64) {
            self.size_requests.push(size);
        }

        fn generate_surface_mesh(&mut self) -> IoResult<CadSurfaceMesh> {
            // Tags deliberately out of order and non-contiguous
            Ok(CadSurfaceMesh {
                node_tags: vec![40, 10, 30, 20],
                nodes: vec![
                    Point3::new(0.0, 1.0, 0.0),
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(1.0, 1.0, 0.0),
                    Point3::new(1.0, 0.0, 0.0),
                ],
                elements: vec![
                    CadElement {
                        tag: 7,
                        nodes: [10, 20, 30],
                        face: 0,
                    },
                    CadElement {
                        tag: 9,
                        nodes: [10, 30, 40],
                        face: 1,
                    },
                ],
            })
        }

        fn face_normal(&self, face: usize, _point: &Point3<f64>) -> Option<Vector3<f64>> {
            (face == 0).then(|| Vector3::new(0.0, 0.0, 3.0))
        }

        fn bounding_box(&self) -> Aabb {
            Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 0.0))
        }

        fn clear(&mut self) {
            self.clears += 1;
            self.imported = None;
        }
    }

    #[test]
    fn nodes_renumbered_by_ascending_tag() {
        let mut kernel = FakeKernel::default();
        let mesh = load_parametric(&mut kernel, Path::new("part.step"), None).unwrap();

        assert_eq!(mesh.nodes()[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(mesh.nodes()[3], Point3::new(0.0, 1.0, 0.0));
        assert_eq!(mesh.triangles(), &[[0, 1, 2], [0, 2, 3]]);
        assert_eq!(mesh.element_tags(), &[7, 9]);
    }

    #[test]
    fn normals_are_unit_or_zero() {
        let mut kernel = FakeKernel::default();
        let mesh = load_parametric(&mut kernel, Path::new("part.step"), None).unwrap();

        assert_relative_eq!(mesh.normals()[0].z, 1.0);
        assert_eq!(mesh.normals()[1], Vector3::zeros());
    }

    #[test]
    fn session_clears_on_open_and_drop() {
        let mut kernel = FakeKernel::default();
        load_parametric(&mut kernel, Path::new("part.step"), Some(0.5)).unwrap();
        assert_eq!(kernel.clears, 2);
        assert!(kernel.imported.is_none());
    }

    #[test]
    fn session_clears_even_on_failure() {
        let mut kernel = FakeKernel {
            fail_import: true,
            ..FakeKernel::default()
        };
        let err = load_parametric(&mut kernel, Path::new("broken.step"), None).unwrap_err();
        assert!(matches!(err, IoError::GeometryImport { .. }));
        assert_eq!(kernel.clears, 2);
    }

    #[test]
    fn sizing_hint_only_applied_when_positive() {
        let mut kernel = FakeKernel::default();
        {
            let mut session = CadSession::open(&mut kernel);
            session.apply_sizing(Some(0.0));
            session.apply_sizing(Some(-1.0));
            session.apply_sizing(Some(f64::NAN));
            session.apply_sizing(None);
            session.apply_sizing(Some(2.5));
            assert!(session.bounding_box().contains(&Point3::new(0.5, 0.5, 0.0)));
        }
        assert_eq!(kernel.size_requests, vec![2.5]);
    }

    #[test]
    fn unknown_node_tag_is_an_import_error() {
        struct Dangling;
        impl CadBackend for Dangling {
            fn import(&mut self, _: &Path) -> IoResult<()> {
                Ok(())
            }
            fn set_target_size(&mut self, _: f64) {}
            fn generate_surface_mesh(&mut self) -> IoResult<CadSurfaceMesh> {
                Ok(CadSurfaceMesh {
                    node_tags: vec![1, 2, 3],
                    nodes: vec![Point3::origin(); 3],
                    elements: vec![CadElement {
                        tag: 1,
                        nodes: [1, 2, 99],
                        face: 0,
                    }],
                })
            }
            fn face_normal(&self, _: usize, _: &Point3<f64>) -> Option<Vector3<f64>> {
                None
            }
            fn bounding_box(&self) -> Aabb {
                Aabb::empty()
            }
            fn clear(&mut self) {}
        }

        let err = load_parametric(&mut Dangling, Path::new("x.stp"), None).unwrap_err();
        assert!(format!("{err}").contains("unknown node 99"));
    }
}
