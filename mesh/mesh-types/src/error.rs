//! Error types for building canonical mesh tables.

use thiserror::Error;

/// Result type alias for mesh table construction.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors raised when the parallel tables of a [`SurfaceMesh`](crate::SurfaceMesh)
/// are inconsistent.
#[derive(Debug, Error)]
pub enum MeshError {
    /// A per-triangle table does not have one row per triangle.
    #[error("{table} table has {got} rows, expected one per triangle ({expected})")]
    TableLength {
        /// Name of the offending table.
        table: &'static str,
        /// Number of triangles.
        expected: usize,
        /// Number of rows found.
        got: usize,
    },

    /// An incidence row references a node that does not exist.
    #[error("triangle {triangle} references node {node}, but only {node_count} nodes exist")]
    NodeOutOfRange {
        /// Triangle index.
        triangle: usize,
        /// Offending node index.
        node: u32,
        /// Number of nodes in the table.
        node_count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MeshError::TableLength {
            table: "normal",
            expected: 4,
            got: 3,
        };
        assert!(format!("{err}").contains("normal table has 3 rows"));

        let err = MeshError::NodeOutOfRange {
            triangle: 2,
            node: 9,
            node_count: 5,
        };
        assert!(format!("{err}").contains("node 9"));
    }
}
