//! Result types for wall thickness analysis.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::gradient::GradientField;
use crate::radius::{RadiusField, SolveStats};

/// Summary of one analysis run.
///
/// # Example
///
/// ```
/// use mesh_thickness::ThicknessReport;
///
/// let report = ThicknessReport::default();
/// assert_eq!(report.coverage_percent(), 0.0);
/// assert!(report.min_wall_thickness().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThicknessReport {
    /// Number of triangles analysed.
    pub triangles: usize,
    /// Outcome counts of the radius solve.
    pub solve: SolveStats,
    /// Smallest valid radius.
    pub min_radius: Option<f64>,
    /// Largest valid radius.
    pub max_radius: Option<f64>,
    /// Mean of the valid radii.
    pub mean_radius: Option<f64>,
    /// Triangles with a defined gradient.
    pub gradient_defined: usize,
}

impl ThicknessReport {
    /// Summarise a radius field and its gradient.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_fields(radii: &RadiusField, gradient: &GradientField) -> Self {
        let count = radii.valid().count();
        let mean_radius = (count > 0).then(|| radii.valid().sum::<f64>() / count as f64);
        Self {
            triangles: radii.len(),
            solve: *radii.stats(),
            min_radius: radii.valid().reduce(f64::min),
            max_radius: radii.max_valid(),
            mean_radius,
            gradient_defined: gradient.defined_count(),
        }
    }

    /// Thinnest wall, i.e. twice the smallest radius.
    #[must_use]
    pub fn min_wall_thickness(&self) -> Option<f64> {
        self.min_radius.map(|r| 2.0 * r)
    }

    /// Thickest wall, i.e. twice the largest radius.
    #[must_use]
    pub fn max_wall_thickness(&self) -> Option<f64> {
        self.max_radius.map(|r| 2.0 * r)
    }

    /// Percentage of triangles with a valid radius.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn coverage_percent(&self) -> f64 {
        if self.triangles == 0 {
            0.0
        } else {
            100.0 * (self.solve.converged as f64) / (self.triangles as f64)
        }
    }
}

fn fmt_length(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}"))
}

impl std::fmt::Display for ThicknessReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Wall Thickness Analysis:")?;
        writeln!(f, "  Triangles analyzed: {}", self.triangles)?;
        writeln!(f, "  Converged: {}", self.solve.converged)?;
        writeln!(f, "  Coverage: {:.1}%", self.coverage_percent())?;
        if self.solve.failed > 0 {
            writeln!(f, "  No solution: {}", self.solve.failed)?;
        }
        if self.solve.degenerate_normals > 0 {
            writeln!(f, "  Degenerate normals: {}", self.solve.degenerate_normals)?;
        }
        if self.solve.skipped_by_deadline > 0 {
            writeln!(
                f,
                "  Skipped (time budget): {}",
                self.solve.skipped_by_deadline
            )?;
        }
        writeln!(f, "  Min radius: {}", fmt_length(self.min_radius))?;
        writeln!(f, "  Max radius: {}", fmt_length(self.max_radius))?;
        writeln!(f, "  Mean radius: {}", fmt_length(self.mean_radius))?;
        writeln!(
            f,
            "  Min wall thickness: {}",
            fmt_length(self.min_wall_thickness())
        )?;
        writeln!(f, "  Gradient defined: {}", self.gradient_defined)?;
        Ok(())
    }
}
