//! Shared-edge adjacency from the incidence table.

// Triangle indices are stored as u32 like the incidence table itself.
#![allow(clippy::cast_possible_truncation)]

use hashbrown::HashMap;

/// Edge-neighbour lists for every triangle.
///
/// Triangles `i` and `j` are neighbours iff their sets of distinct node
/// indices intersect in exactly two nodes, i.e. they share one edge and
/// are not duplicates of each other. The relation is symmetric by
/// construction and neighbour lists are sorted.
///
/// # Example
///
/// ```
/// use mesh_thickness::EdgeAdjacency;
///
/// // A fan of three triangles around node 0
/// let adjacency = EdgeAdjacency::build(&[[0, 1, 2], [0, 2, 3], [0, 3, 4]]);
/// assert_eq!(adjacency.neighbours(1), &[0, 2]);
/// assert_eq!(adjacency.neighbours(0), &[1]);
/// assert!(!adjacency.are_neighbours(0, 2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeAdjacency {
    neighbours: Vec<Vec<u32>>,
}

impl EdgeAdjacency {
    /// Build adjacency for an incidence table.
    #[must_use]
    pub fn build(triangles: &[[u32; 3]]) -> Self {
        let node_sets: Vec<Vec<u32>> = triangles.iter().map(|t| distinct_nodes(*t)).collect();

        // Every triangle listed under each of its distinct node pairs
        let mut edge_map: HashMap<(u32, u32), Vec<u32>> = HashMap::new();
        for (idx, nodes) in node_sets.iter().enumerate() {
            for (k, &a) in nodes.iter().enumerate() {
                for &b in &nodes[k + 1..] {
                    edge_map.entry((a, b)).or_default().push(idx as u32);
                }
            }
        }

        let mut neighbours = vec![Vec::new(); triangles.len()];
        for sharing in edge_map.values() {
            for (k, &i) in sharing.iter().enumerate() {
                for &j in &sharing[k + 1..] {
                    let common = node_sets[i as usize]
                        .iter()
                        .filter(|&n| node_sets[j as usize].contains(n))
                        .count();
                    if common == 2 {
                        neighbours[i as usize].push(j);
                        neighbours[j as usize].push(i);
                    }
                }
            }
        }

        // A pair sharing exactly two nodes meets under exactly one edge key,
        // so no duplicates arise; sorting only fixes hash-map order.
        for list in &mut neighbours {
            list.sort_unstable();
        }

        Self { neighbours }
    }

    /// Neighbours of triangle `index`, ascending.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn neighbours(&self, index: usize) -> &[u32] {
        &self.neighbours[index]
    }

    /// Whether `a` and `b` share exactly one edge.
    #[must_use]
    pub fn are_neighbours(&self, a: usize, b: usize) -> bool {
        self.neighbours
            .get(a)
            .is_some_and(|list| list.binary_search(&(b as u32)).is_ok())
    }

    /// Number of triangles covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.neighbours.len()
    }

    /// True when built from an empty incidence table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbours.is_empty()
    }

    /// Number of neighbour pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.neighbours.iter().map(Vec::len).sum::<usize>() / 2
    }
}

/// Sorted distinct node indices of one triangle.
fn distinct_nodes(triangle: [u32; 3]) -> Vec<u32> {
    let mut nodes = triangle.to_vec();
    nodes.sort_unstable();
    nodes.dedup();
    nodes
}
