//! Canonical surface mesh: node table, incidence table and normal table.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Aabb, MeshError, MeshResult, Triangle};

/// A triangulated surface in canonical form.
///
/// The mesh is a set of parallel tables keyed by triangle index:
///
/// - `nodes`: deduplicated node coordinates, indexed `0..N`
/// - `triangles`: incidence table, three node indices per triangle
/// - `normals`: one outward unit normal per triangle (zero for degenerate input)
/// - `element_tags`: the identifier the mesh source assigned to each triangle
///
/// Element tags are what visualization views are keyed on. They usually
/// differ from the 0-based triangle index (CAD meshers start at 1 and may
/// leave gaps), so callers must map through [`SurfaceMesh::element_tags`].
///
/// The tables are validated once in [`SurfaceMesh::new`] and never mutated
/// afterwards; every pipeline stage produces new arrays instead.
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, SurfaceMesh, Vector3};
///
/// let mesh = SurfaceMesh::new(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
///     vec![Vector3::z()],
///     vec![1],
/// )
/// .unwrap();
///
/// assert_eq!(mesh.triangle_count(), 1);
/// assert!((mesh.centroid(0).x - 1.0 / 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceMesh {
    nodes: Vec<Point3<f64>>,
    triangles: Vec<[u32; 3]>,
    normals: Vec<Vector3<f64>>,
    element_tags: Vec<u64>,
}

impl SurfaceMesh {
    /// Assemble a mesh from its tables.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::TableLength`] if `normals` or `element_tags` do not
    /// have one row per triangle, and [`MeshError::NodeOutOfRange`] if an
    /// incidence row references a missing node.
    pub fn new(
        nodes: Vec<Point3<f64>>,
        triangles: Vec<[u32; 3]>,
        normals: Vec<Vector3<f64>>,
        element_tags: Vec<u64>,
    ) -> MeshResult<Self> {
        let expected = triangles.len();
        if normals.len() != expected {
            return Err(MeshError::TableLength {
                table: "normal",
                expected,
                got: normals.len(),
            });
        }
        if element_tags.len() != expected {
            return Err(MeshError::TableLength {
                table: "element tag",
                expected,
                got: element_tags.len(),
            });
        }

        let node_count = nodes.len();
        for (triangle, row) in triangles.iter().enumerate() {
            if let Some(&node) = row.iter().find(|&&n| n as usize >= node_count) {
                return Err(MeshError::NodeOutOfRange {
                    triangle,
                    node,
                    node_count,
                });
            }
        }

        Ok(Self {
            nodes,
            triangles,
            normals,
            element_tags,
        })
    }

    /// Assemble a mesh whose element tags are `1..=T`, the numbering a
    /// triangulated file implies.
    ///
    /// # Errors
    ///
    /// Same as [`SurfaceMesh::new`].
    pub fn with_sequential_tags(
        nodes: Vec<Point3<f64>>,
        triangles: Vec<[u32; 3]>,
        normals: Vec<Vector3<f64>>,
    ) -> MeshResult<Self> {
        let tags = (1..=triangles.len() as u64).collect();
        Self::new(nodes, triangles, normals, tags)
    }

    /// Number of nodes.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// True when the mesh has no triangles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Node coordinate table.
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[Point3<f64>] {
        &self.nodes
    }

    /// Incidence table.
    #[inline]
    #[must_use]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Normal table.
    #[inline]
    #[must_use]
    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    /// Element identifiers, parallel to the incidence table.
    #[inline]
    #[must_use]
    pub fn element_tags(&self) -> &[u64] {
        &self.element_tags
    }

    /// Resolve triangle `index` to vertex positions.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.triangle_count()`.
    #[must_use]
    pub fn triangle(&self, index: usize) -> Triangle {
        let [a, b, c] = self.triangles[index];
        Triangle::new(
            self.nodes[a as usize],
            self.nodes[b as usize],
            self.nodes[c as usize],
        )
    }

    /// Centroid of triangle `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.triangle_count()`.
    #[must_use]
    pub fn centroid(&self, index: usize) -> Point3<f64> {
        self.triangle(index).centroid()
    }

    /// Centroids of all triangles, in triangle order.
    ///
    /// Derived on demand; the tables are immutable so this is never stale.
    #[must_use]
    pub fn centroids(&self) -> Vec<Point3<f64>> {
        (0..self.triangles.len()).map(|i| self.centroid(i)).collect()
    }

    /// Shortest edge over all triangles, or `None` for an empty mesh.
    #[must_use]
    pub fn min_edge_length(&self) -> Option<f64> {
        (0..self.triangles.len())
            .map(|i| self.triangle(i).min_edge_length())
            .reduce(f64::min)
    }

    /// Bounding box of the node table.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.nodes.iter())
    }
}
