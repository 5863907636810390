//! Node welding for triangulated input.
//!
//! A triangulated file stores every facet with its own three vertices, so a
//! shared corner appears once per incident facet. Welding collapses points
//! closer than a tolerance into one node and returns the old-to-new index
//! map used to rebuild the incidence table.

use hashbrown::HashMap;
use mesh_types::Point3;

/// Result of welding a raw point list.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeWeld {
    /// Welded node table, in first-seen order.
    pub nodes: Vec<Point3<f64>>,
    /// For every raw point, the index of the node it was merged into.
    pub remap: Vec<u32>,
}

impl NodeWeld {
    /// Number of raw points that were folded into an earlier node.
    #[must_use]
    pub fn merged_count(&self) -> usize {
        self.remap.len() - self.nodes.len()
    }
}

/// Merge points that lie strictly closer than `tolerance` to each other.
///
/// Points are visited in input order. The first unassigned point becomes a
/// new node (the seed) and every unassigned point within `tolerance` of the
/// seed is mapped onto it. Seeds are therefore pairwise at least `tolerance`
/// apart, and welding an already welded table is a no-op.
///
/// A non-positive or non-finite tolerance disables merging.
///
/// # Example
///
/// ```
/// use mesh_io::weld_nodes;
/// use mesh_types::Point3;
///
/// let points = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 0.0, 1e-9),
/// ];
/// let weld = weld_nodes(&points, 0.5);
/// assert_eq!(weld.nodes.len(), 2);
/// assert_eq!(weld.remap, vec![0, 1, 0]);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)] // node tables are limited to u32 indices
pub fn weld_nodes(points: &[Point3<f64>], tolerance: f64) -> NodeWeld {
    if tolerance <= 0.0 || !tolerance.is_finite() {
        return NodeWeld {
            nodes: points.to_vec(),
            remap: (0..points.len() as u32).collect(),
        };
    }

    // Cells as wide as the tolerance: any point within reach of a seed sits in
    // the seed's cell or one of its 26 neighbours.
    let mut spatial_hash: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    for (idx, point) in points.iter().enumerate() {
        spatial_hash
            .entry(pos_to_cell(point, tolerance))
            .or_default()
            .push(idx as u32);
    }

    let mut remap: Vec<Option<u32>> = vec![None; points.len()];
    let mut nodes = Vec::new();

    for (idx, seed) in points.iter().enumerate() {
        if remap[idx].is_some() {
            continue;
        }

        let node = nodes.len() as u32;
        nodes.push(*seed);
        remap[idx] = Some(node);

        let cell = pos_to_cell(seed, tolerance);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(candidates) = spatial_hash.get(&(cell.0 + dx, cell.1 + dy, cell.2 + dz))
                    else {
                        continue;
                    };
                    for &other in candidates {
                        let slot = &mut remap[other as usize];
                        if slot.is_none() && (points[other as usize] - seed).norm() < tolerance {
                            *slot = Some(node);
                        }
                    }
                }
            }
        }
    }

    NodeWeld {
        nodes,
        remap: remap.into_iter().map(|n| n.unwrap_or(0)).collect(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn pos_to_cell(pos: &Point3<f64>, cell_size: f64) -> (i64, i64, i64) {
    (
        (pos.x / cell_size).floor() as i64,
        (pos.y / cell_size).floor() as i64,
        (pos.z / cell_size).floor() as i64,
    )
}
