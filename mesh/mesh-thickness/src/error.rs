//! Error types for thickness analysis.
//!
//! Only malformed input is an error. Numerical trouble on individual
//! triangles (no converged root, zero normal, isolated triangle) is
//! recorded in the output fields and counted in the report instead.

use thiserror::Error;

/// Result type alias for thickness operations.
pub type ThicknessResult<T> = Result<T, ThicknessError>;

/// Errors that can occur during thickness analysis.
#[derive(Debug, Error)]
pub enum ThicknessError {
    /// Input mesh has no triangles.
    #[error("input mesh is empty")]
    EmptyMesh,

    /// Invalid analysis parameters.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// A per-triangle field does not match the mesh it is applied to.
    #[error("{field} has {got} entries but the mesh has {expected} triangles")]
    FieldLength {
        /// Name of the field.
        field: &'static str,
        /// Triangle count of the mesh.
        expected: usize,
        /// Entries in the field.
        got: usize,
    },
}

impl ThicknessError {
    /// Create an empty mesh error.
    #[must_use]
    pub const fn empty_mesh() -> Self {
        Self::EmptyMesh
    }

    /// Create an invalid params error.
    #[must_use]
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::InvalidParams(details.into())
    }

    /// Fail with [`ThicknessError::FieldLength`] unless `got == expected`.
    pub(crate) fn check_length(
        field: &'static str,
        expected: usize,
        got: usize,
    ) -> ThicknessResult<()> {
        if expected == got {
            Ok(())
        } else {
            Err(Self::FieldLength {
                field,
                expected,
                got,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ThicknessError::empty_mesh();
        assert!(format!("{err}").contains("empty"));

        let err = ThicknessError::invalid_params("max_trials must be at least 1");
        assert!(format!("{err}").contains("max_trials"));

        let err = ThicknessError::FieldLength {
            field: "radius field",
            expected: 4,
            got: 3,
        };
        assert_eq!(
            format!("{err}"),
            "radius field has 3 entries but the mesh has 4 triangles"
        );
    }

    #[test]
    fn length_check() {
        assert!(ThicknessError::check_length("radius field", 2, 2).is_ok());
        assert!(matches!(
            ThicknessError::check_length("radius field", 2, 1),
            Err(ThicknessError::FieldLength { got: 1, .. })
        ));
    }
}
