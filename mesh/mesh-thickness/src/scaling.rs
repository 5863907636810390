//! Normalisation and outlier clamping of scalar fields.
//!
//! The radius and gradient fields are normalised differently:
//!
//! - radius: divided by its maximum, so zero stays a true zero
//! - gradient: shifted so its minimum is zero, divided by its maximum,
//!   clamped at [`ThicknessParams::outlier_fraction`](crate::ThicknessParams)
//!   of that maximum and divided by the new maximum
//!
//! Non-finite entries are ignored when finding extrema and passed through
//! unchanged.

use crate::radius::{INVALID_RADIUS, RadiusField, is_valid_radius};

fn finite_max(values: &[f64]) -> Option<f64> {
    values.iter().copied().filter(|v| v.is_finite()).reduce(f64::max)
}

fn finite_min(values: &[f64]) -> Option<f64> {
    values.iter().copied().filter(|v| v.is_finite()).reduce(f64::min)
}

/// Divide every value by the maximum.
///
/// Values are returned unchanged when there is no positive finite maximum.
///
/// # Example
///
/// ```
/// use mesh_thickness::scale_by_max;
///
/// assert_eq!(scale_by_max(&[1.0, 2.0, 4.0]), vec![0.25, 0.5, 1.0]);
/// assert_eq!(scale_by_max(&[0.0, 0.0]), vec![0.0, 0.0]);
/// ```
#[must_use]
pub fn scale_by_max(values: &[f64]) -> Vec<f64> {
    match finite_max(values) {
        Some(max) if max > 0.0 => values.iter().map(|v| v / max).collect(),
        _ => values.to_vec(),
    }
}

/// Shift values so the minimum becomes zero.
///
/// # Example
///
/// ```
/// use mesh_thickness::subtract_min;
///
/// assert_eq!(subtract_min(&[3.0, 5.0, 4.0]), vec![0.0, 2.0, 1.0]);
/// ```
#[must_use]
pub fn subtract_min(values: &[f64]) -> Vec<f64> {
    match finite_min(values) {
        Some(min) => values.iter().map(|v| v - min).collect(),
        None => values.to_vec(),
    }
}

/// One-pass winsorisation of the top of a field.
///
/// With `max` the largest finite value, every value `>= fraction * max` is
/// replaced by the largest value below that threshold. If nothing lies
/// below the threshold (for example a constant field) the values are
/// returned unchanged.
///
/// The result never exceeds the original maximum, and all clamped entries
/// share one value.
///
/// # Example
///
/// ```
/// use mesh_thickness::clamp_outliers;
///
/// let clamped = clamp_outliers(&[0.1, 0.5, 0.96, 1.0], 0.95);
/// assert_eq!(clamped, vec![0.1, 0.5, 0.5, 0.5]);
/// ```
#[must_use]
pub fn clamp_outliers(values: &[f64], fraction: f64) -> Vec<f64> {
    let Some(max) = finite_max(values) else {
        return values.to_vec();
    };
    let threshold = fraction * max;
    let Some(replacement) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v < threshold)
        .reduce(f64::max)
    else {
        return values.to_vec();
    };

    values
        .iter()
        .map(|&v| if v >= threshold { replacement } else { v })
        .collect()
}

/// Normalise a radius field by its largest valid radius.
///
/// Invalid entries stay at [`INVALID_RADIUS`] so they remain
/// distinguishable in the output; valid entries land in `[0, 1]`.
///
/// # Example
///
/// ```
/// use mesh_thickness::{scale_radii, RadiusField, INVALID_RADIUS};
///
/// let radii = RadiusField::from_values(vec![0.5, INVALID_RADIUS, 2.0]);
/// assert_eq!(scale_radii(&radii), vec![0.25, INVALID_RADIUS, 1.0]);
/// ```
#[must_use]
pub fn scale_radii(radii: &RadiusField) -> Vec<f64> {
    let max = radii.max_valid().filter(|&m| m > 0.0);
    radii
        .values()
        .iter()
        .map(|&r| match (is_valid_radius(r), max) {
            (false, _) => INVALID_RADIUS,
            (true, Some(max)) => r / max,
            (true, None) => r,
        })
        .collect()
}

/// Normalise a gradient field for display: floor at zero, clamp the top
/// `1 - fraction` of the range, scale to a maximum of one.
#[must_use]
pub fn scale_gradient(values: &[f64], fraction: f64) -> Vec<f64> {
    let shifted = scale_by_max(&subtract_min(values));
    scale_by_max(&clamp_outliers(&shifted, fraction))
}
