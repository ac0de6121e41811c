//! # Coordinate Normalization
//!
//! Computes the (x, y, z) offset subtracted from every gridpoint so that
//! projected survey coordinates (often 10^5..10^7) end up near the origin.

use crate::error::{ExportError, ExportResult};
use crate::layer::Layer;
use glam::DVec3;

/// Computes the coordinate offset for a layer stack.
///
/// - An explicit offset wins; it must have exactly 3 components.
/// - Otherwise, when `auto` is set, X and Y use the median of all finite
///   samples and Z uses the minimum finite elevation over every top and
///   bottom surface, so the model reads as height above its lowest point.
/// - Otherwise, or when any pool has no finite samples, the offset is zero.
///
/// # Example
///
/// ```rust
/// use strata_mesh::{normalize::compute_offset, Layer};
/// use glam::DVec3;
///
/// let layers = vec![Layer::flat("A", (2, 2), (1000.0, 2000.0), 10.0, 50.0, 60.0)];
/// let offset = compute_offset(&layers, None, true).unwrap();
/// assert_eq!(offset, DVec3::new(1005.0, 2005.0, 50.0));
/// ```
pub fn compute_offset(
    layers: &[Layer],
    explicit: Option<&[f64]>,
    auto: bool,
) -> ExportResult<DVec3> {
    if let Some(values) = explicit {
        return match values {
            [x, y, z] => Ok(DVec3::new(*x, *y, *z)),
            _ => Err(ExportError::validation(format!(
                "coordinate_offset must have 3 components (x, y, z), got {}",
                values.len()
            ))),
        };
    }

    if !auto {
        return Ok(DVec3::ZERO);
    }

    let mut xs: Vec<f64> = layers.iter().flat_map(|l| l.grid_x.finite_values()).collect();
    let mut ys: Vec<f64> = layers.iter().flat_map(|l| l.grid_y.finite_values()).collect();
    let z_min = layers
        .iter()
        .flat_map(|l| {
            l.top_surface_z
                .finite_values()
                .chain(l.bottom_surface_z.finite_values())
        })
        .fold(None, |acc: Option<f64>, z| Some(acc.map_or(z, |m| m.min(z))));

    match (median(&mut xs), median(&mut ys), z_min) {
        (Some(x), Some(y), Some(z)) => Ok(DVec3::new(x, y, z)),
        _ => Ok(DVec3::ZERO),
    }
}

/// Median of finite values; the mean of the two middle values for even counts.
fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::SurfaceGrid;

    #[test]
    fn test_explicit_offset_wins() {
        let layers = vec![Layer::flat("A", (2, 2), (0.0, 0.0), 1.0, 0.0, 1.0)];
        let offset = compute_offset(&layers, Some(&[1.0, 2.0, 3.0]), true).unwrap();
        assert_eq!(offset, DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_explicit_offset_wrong_length() {
        let err = compute_offset(&[], Some(&[1.0, 2.0]), false).unwrap_err();
        assert!(matches!(err, ExportError::Validation { .. }));
    }

    #[test]
    fn test_no_normalization_is_zero() {
        let layers = vec![Layer::flat("A", (2, 2), (500.0, 500.0), 1.0, 10.0, 20.0)];
        assert_eq!(compute_offset(&layers, None, false).unwrap(), DVec3::ZERO);
    }

    #[test]
    fn test_median_resists_skewed_edge() {
        let mut layer = Layer::flat("A", (1, 5), (0.0, 0.0), 1.0, 0.0, 1.0);
        // One wildly extrapolated edge sample
        layer.grid_x.set(0, 4, 1.0e6);
        let offset = compute_offset(&[layer], None, true).unwrap();
        assert_eq!(offset.x, 2.0);
    }

    #[test]
    fn test_z_is_minimum_over_all_surfaces() {
        let lower = Layer::flat("A", (2, 2), (0.0, 0.0), 1.0, -12.5, 3.0);
        let upper = Layer::flat("B", (2, 2), (0.0, 0.0), 1.0, 3.0, 8.0);
        let offset = compute_offset(&[upper, lower], None, true).unwrap();
        assert_eq!(offset.z, -12.5);
    }

    #[test]
    fn test_non_finite_samples_ignored() {
        let mut layer = Layer::flat("A", (1, 3), (0.0, 0.0), 1.0, 5.0, 6.0);
        layer.grid_x.set(0, 0, f64::NAN);
        layer.bottom_surface_z.set(0, 1, f64::NEG_INFINITY);
        let offset = compute_offset(&[layer], None, true).unwrap();
        assert_eq!(offset.x, 1.5);
        assert_eq!(offset.z, 5.0);
    }

    #[test]
    fn test_all_non_finite_gives_zero() {
        let nan = SurfaceGrid::filled(2, 2, f64::NAN);
        let layer = Layer::new("A", nan.clone(), nan.clone(), nan.clone(), nan);
        assert_eq!(compute_offset(&[layer], None, true).unwrap(), DVec3::ZERO);
    }
}
