//! # Export Options
//!
//! Recognized export options with their defaults. Options deserialize from
//! JSON with every field optional, and accept the short aliases used by
//! older job files (`downsample`, `coord_offset`, `enforce_zone_quality`,
//! `top_cap`).

use crate::error::{ExportError, ExportResult};
use config::constants::{
    clamp_downsample_factor, DEFAULT_DOWNSAMPLE_FACTOR, DEFAULT_INTERFACE_TOLERANCE,
    DEFAULT_MIN_TET_VOLUME, DEFAULT_MIN_ZONE_THICKNESS, DEFAULT_TOP_CAP_NAME,
    DEFAULT_TOP_CAP_THICKNESS,
};
use serde::{Deserialize, Serialize};

/// Options for one export call.
///
/// # Example
///
/// ```rust
/// use strata_mesh::ExportOptions;
///
/// let options = ExportOptions {
///     downsample_factor: 4,
///     normalize_coords: true,
///     ..ExportOptions::default()
/// };
/// assert_eq!(options.stride(), 4);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Grid stride; values ≤ 1 keep every sample
    #[serde(alias = "downsample")]
    pub downsample_factor: i64,
    /// Explicit (x, y, z) offset subtracted from every coordinate
    #[serde(alias = "coord_offset")]
    pub coordinate_offset: Option<Vec<f64>>,
    /// Compute an offset automatically when none is given
    pub normalize_coords: bool,
    /// Maximum z-mismatch for cross-layer node reuse (brick)
    pub interface_tolerance: f64,
    /// Drop degenerate brick zones
    #[serde(alias = "enforce_zone_quality")]
    pub filter_bad_zones: bool,
    /// Minimum mean brick thickness when filtering
    pub min_zone_thickness: f64,
    /// Minimum absolute tetrahedron volume
    pub min_tet_volume: f64,
    /// Monotonic interface repair; `None` uses the strategy default
    pub repair_interfaces: Option<bool>,
    /// Append a flat capping layer above the topmost layer
    #[serde(alias = "top_cap")]
    pub add_top_cap: bool,
    /// Cap thickness above the topmost layer's top surface
    pub top_cap_thickness: f64,
    /// Absolute cap elevation; overrides `top_cap_thickness`
    pub top_cap_z: Option<f64>,
    /// Group name of the cap layer
    pub top_cap_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            downsample_factor: DEFAULT_DOWNSAMPLE_FACTOR as i64,
            coordinate_offset: None,
            normalize_coords: false,
            interface_tolerance: DEFAULT_INTERFACE_TOLERANCE,
            filter_bad_zones: false,
            min_zone_thickness: DEFAULT_MIN_ZONE_THICKNESS,
            min_tet_volume: DEFAULT_MIN_TET_VOLUME,
            repair_interfaces: None,
            add_top_cap: false,
            top_cap_thickness: DEFAULT_TOP_CAP_THICKNESS,
            top_cap_z: None,
            top_cap_name: DEFAULT_TOP_CAP_NAME.to_string(),
        }
    }
}

impl ExportOptions {
    /// Returns the effective grid stride (never zero).
    #[inline]
    pub fn stride(&self) -> usize {
        clamp_downsample_factor(self.downsample_factor)
    }

    /// Checks option values that do not depend on the layer data.
    ///
    /// The explicit offset is validated here as well, so a bad offset is
    /// reported before any grid work starts.
    pub fn validate(&self) -> ExportResult<()> {
        for (name, value) in [
            ("interface_tolerance", self.interface_tolerance),
            ("min_zone_thickness", self.min_zone_thickness),
            ("min_tet_volume", self.min_tet_volume),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ExportError::validation(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }

        if let Some(offset) = &self.coordinate_offset {
            if offset.len() != 3 {
                return Err(ExportError::validation(format!(
                    "coordinate_offset must have 3 components (x, y, z), got {}",
                    offset.len()
                )));
            }
            if offset.iter().any(|v| !v.is_finite()) {
                return Err(ExportError::validation(
                    "coordinate_offset components must be finite",
                ));
            }
        }

        if self.add_top_cap {
            match self.top_cap_z {
                Some(z) if !z.is_finite() => {
                    return Err(ExportError::validation("top_cap_z must be finite"));
                }
                None if !(self.top_cap_thickness.is_finite() && self.top_cap_thickness > 0.0) => {
                    return Err(ExportError::validation(format!(
                        "top_cap_thickness must be positive, got {}",
                        self.top_cap_thickness
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }
}
