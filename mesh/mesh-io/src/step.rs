//! STEP (ISO 10303) input through the truck CAD kernel.
//!
//! [`TruckBackend`] implements [`CadBackend`]: it parses the exchange file
//! with `truck-stepio`, tessellates every shell face with `truck-meshalgo`
//! and answers normal queries from the tessellation's surface normals, which
//! truck evaluates on the analytic surface rather than from facet winding.
//!
//! # Feature Gate
//!
//! ```toml
//! [dependencies]
//! mesh-io = { version = "0.1", features = ["step"] }
//! ```

use std::path::{Path, PathBuf};

use mesh_types::{Aabb, Point3, Vector3};
use tracing::{debug, warn};
use truck_meshalgo::prelude::*;
use truck_polymesh::{PolygonMesh, StandardVertex};
use truck_stepio::r#in::Table;

use crate::cad::{CadBackend, CadElement, CadSurfaceMesh};
use crate::error::{IoError, IoResult};
use crate::weld::weld_nodes;

/// Chord tolerance used for the sizing pre-pass.
const PREPASS_TOLERANCE: f64 = 0.01;

/// Automatic tolerance as a fraction of the bounding-box diameter.
const AUTO_TOLERANCE_FRACTION: f64 = 0.001;

/// One tessellated face: per-triangle centroid and analytic normal.
#[derive(Debug, Clone, Default)]
struct FaceSamples {
    centroids: Vec<Point3<f64>>,
    normals: Vec<Vector3<f64>>,
}

impl FaceSamples {
    /// Normal of the sample closest to `point`.
    fn nearest_normal(&self, point: &Point3<f64>) -> Option<Vector3<f64>> {
        self.centroids
            .iter()
            .zip(&self.normals)
            .min_by(|(a, _), (b, _)| {
                (*a - point)
                    .norm_squared()
                    .total_cmp(&(*b - point).norm_squared())
            })
            .map(|(_, n)| *n)
    }
}

/// STEP backend built on the truck kernel.
///
/// # Example
///
/// ```ignore
/// use mesh_io::{load_parametric, TruckBackend};
/// use std::path::Path;
///
/// let mut backend = TruckBackend::new();
/// let mesh = load_parametric(&mut backend, Path::new("bracket.step"), None).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct TruckBackend {
    source: Option<(PathBuf, String)>,
    target_size: Option<f64>,
    faces: Vec<FaceSamples>,
    bounds: Aabb,
}

impl TruckBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tessellate(&mut self, path: &Path, text: &str) -> IoResult<CadSurfaceMesh> {
        let exchange = truck_stepio::r#in::ruststep::parser::parse(text)
            .map_err(|e| IoError::geometry_import(path, format!("failed to parse STEP: {e}")))?;
        let Some(section) = exchange.data.first() else {
            return Err(IoError::geometry_import(path, "no data sections"));
        };
        let table = Table::from_data_section(section);

        let mut positions: Vec<Point3<f64>> = Vec::new();
        let mut corners: Vec<[usize; 3]> = Vec::new();
        let mut owners: Vec<usize> = Vec::new();
        self.faces.clear();

        for shell_holder in table.shell.values() {
            let Ok(shell) = table.to_compressed_shell(shell_holder) else {
                warn!(path = %path.display(), "Skipping shell that failed to convert");
                continue;
            };

            let tolerance = match self.target_size {
                Some(size) => size,
                None => {
                    let pre = shell.robust_triangulation(PREPASS_TOLERANCE).to_polygon();
                    pre.bounding_box().diameter() * AUTO_TOLERANCE_FRACTION
                }
            };
            debug!(tolerance, "Tessellating shell");

            let meshed = shell.robust_triangulation(tolerance);
            for face in &meshed.faces {
                let Some(face_mesh) = face.surface.clone() else {
                    continue;
                };
                let face_mesh = if face.orientation {
                    face_mesh
                } else {
                    let mut m = face_mesh;
                    m.invert();
                    m
                };
                let face_id = self.faces.len();
                self.faces
                    .push(append_face(&face_mesh, &mut positions, &mut corners));
                owners.resize(corners.len(), face_id);
            }
        }

        if corners.is_empty() {
            return Err(IoError::geometry_import(
                path,
                "STEP file contains no geometry or tessellation failed",
            ));
        }

        self.bounds = Aabb::from_points(positions.iter());

        // Faces are tessellated independently; seam vertices coincide.
        let weld = weld_nodes(&positions, self.bounds.diagonal() * 1e-9);

        let node_tags = (1..=weld.nodes.len() as u64).collect();
        let elements = corners
            .iter()
            .zip(&owners)
            .enumerate()
            .map(|(k, (tri, &face))| CadElement {
                tag: k as u64 + 1,
                nodes: tri.map(|v| u64::from(weld.remap[v]) + 1),
                face,
            })
            .collect();

        Ok(CadSurfaceMesh {
            node_tags,
            nodes: weld.nodes,
            elements,
        })
    }
}

/// Append one face's triangles; returns the face's normal samples.
fn append_face(
    mesh: &PolygonMesh,
    positions: &mut Vec<Point3<f64>>,
    corners: &mut Vec<[usize; 3]>,
) -> FaceSamples {
    let base = positions.len();
    positions.extend(mesh.positions().iter().map(|p| Point3::new(p.x, p.y, p.z)));
    let vertex_normals: Vec<Vector3<f64>> = mesh
        .normals()
        .iter()
        .map(|n| Vector3::new(n.x, n.y, n.z))
        .collect();

    let mut samples = FaceSamples::default();
    let mut push = |tri: [&StandardVertex; 3]| {
        let idx = tri.map(|v| base + v.pos);
        let [a, b, c] = idx.map(|i| positions[i]);
        let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);

        let analytic = tri
            .iter()
            .filter_map(|v| v.nor.and_then(|k| vertex_normals.get(k)))
            .fold(Vector3::zeros(), |acc, n| acc + n);
        let normal = if analytic.norm_squared() > 0.0 {
            analytic
        } else {
            (b - a).cross(&(c - a))
        };

        corners.push(idx);
        samples.centroids.push(centroid);
        samples.normals.push(normal);
    };

    for tri in mesh.tri_faces() {
        push([&tri[0], &tri[1], &tri[2]]);
    }
    for quad in mesh.quad_faces() {
        push([&quad[0], &quad[1], &quad[2]]);
        push([&quad[0], &quad[2], &quad[3]]);
    }
    samples
}

impl CadBackend for TruckBackend {
    fn import(&mut self, path: &Path) -> IoResult<()> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => IoError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => IoError::geometry_import(path, e.to_string()),
        })?;
        self.source = Some((path.to_path_buf(), text));
        Ok(())
    }

    /// truck has no element-size control, so the hint becomes the chord
    /// tolerance handed to `robust_triangulation`.
    fn set_target_size(&mut self, size: f64) {
        self.target_size = Some(size);
    }

    fn generate_surface_mesh(&mut self) -> IoResult<CadSurfaceMesh> {
        let Some((path, text)) = self.source.take() else {
            return Err(IoError::geometry_import(
                PathBuf::new(),
                "no geometry imported",
            ));
        };
        let result = self.tessellate(&path, &text);
        self.source = Some((path, text));
        result
    }

    fn face_normal(&self, face: usize, point: &Point3<f64>) -> Option<Vector3<f64>> {
        self.faces.get(face)?.nearest_normal(point)
    }

    fn bounding_box(&self) -> Aabb {
        self.bounds
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}
