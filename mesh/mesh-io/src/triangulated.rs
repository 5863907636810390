//! Triangulated input: STL facets welded into canonical tables.

use std::path::Path;

use mesh_types::{SurfaceMesh, Triangle, Vector3};
use tracing::{debug, info, warn};

use crate::error::IoResult;
use crate::stl::{StlFacet, read_stl};
use crate::weld::weld_nodes;

/// Load an STL file into a [`SurfaceMesh`].
///
/// See [`mesh_from_facets`] for how the facets are canonicalised.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid STL.
pub fn load_triangulated<P: AsRef<Path>>(path: P) -> IoResult<SurfaceMesh> {
    let path = path.as_ref();
    let facets = read_stl(path)?;
    let mesh = mesh_from_facets(&facets)?;
    info!(
        path = %path.display(),
        nodes = mesh.node_count(),
        triangles = mesh.triangle_count(),
        "Loaded triangulated mesh"
    );
    Ok(mesh)
}

/// Canonicalise a facet list.
///
/// - Vertices closer than half the shortest facet edge are merged into one
///   node; every facet survives, so the triangle count is unchanged.
/// - Each normal is the *negated* stored facet normal, unit length. A zero
///   stored normal stays zero. CAD input uses the kernel's own orientation,
///   so the two input kinds disagree in sign; downstream only the projected
///   distance magnitude matters, but views inherit the convention.
/// - Element tags are `1..=T` in file order.
///
/// # Errors
///
/// Returns an error only if the assembled tables are inconsistent, which
/// indicates a bug rather than bad input.
pub fn mesh_from_facets(facets: &[StlFacet]) -> IoResult<SurfaceMesh> {
    let raw: Vec<_> = facets.iter().flat_map(|f| f.vertices).collect();

    let min_edge = facets
        .iter()
        .map(|f| {
            let [a, b, c] = f.vertices;
            Triangle::new(a, b, c).min_edge_length()
        })
        .reduce(f64::min)
        .unwrap_or(0.0);
    let tolerance = min_edge / 2.0;
    if !facets.is_empty() && tolerance <= 0.0 {
        warn!(
            min_edge,
            "Zero-length facet edge in triangulated input; node merging disabled"
        );
    }

    let weld = weld_nodes(&raw, tolerance);
    debug!(
        raw = raw.len(),
        nodes = weld.nodes.len(),
        merged = weld.merged_count(),
        tolerance,
        "Welded facet vertices"
    );

    let triangles = weld
        .remap
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();

    let normals = facets
        .iter()
        .map(|f| (-f.normal).try_normalize(0.0).unwrap_or_else(Vector3::zeros))
        .collect();

    Ok(SurfaceMesh::with_sequential_tags(weld.nodes, triangles, normals)?)
}
