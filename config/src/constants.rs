//! # Configuration Constants
//!
//! Centralized constants for the layered grid export pipeline. All
//! geometric tolerances, option defaults and file-format parameters are
//! defined here.
//!
//! ## Categories
//!
//! - **Precision**: Tolerances for interface matching and degeneracy
//! - **Defaults**: Option defaults used by `ExportOptions`
//! - **Limits**: Maximum values for safety bounds
//! - **Format**: `.f3grid` serialization parameters

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Minimum vertical separation enforced between consecutive interfaces.
///
/// The monotonic repair sweep raises any interface sample that sits below
/// the one beneath it plus this value to exactly `below + MONOTONIC_EPSILON`.
///
/// # Example
///
/// ```rust
/// use config::constants::MONOTONIC_EPSILON;
///
/// let below = 10.0_f64;
/// let above = 9.9995_f64;
/// let repaired = if above < below + MONOTONIC_EPSILON {
///     below + MONOTONIC_EPSILON
/// } else {
///     above
/// };
/// assert_eq!(repaired, below + MONOTONIC_EPSILON);
/// ```
pub const MONOTONIC_EPSILON: f64 = 1e-3;

/// Default maximum z-mismatch between a layer's bottom node and the
/// reused top node of the layer below (brick strategy).
pub const DEFAULT_INTERFACE_TOLERANCE: f64 = 1e-4;

/// Default minimum mean thickness of a brick zone.
///
/// Bricks whose mean top-face elevation minus mean bottom-face elevation
/// is at or below this value are dropped when zone filtering is enabled.
pub const DEFAULT_MIN_ZONE_THICKNESS: f64 = 1e-3;

/// Default minimum absolute signed volume of a tetrahedron.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_MIN_TET_VOLUME;
///
/// // Unit right-corner tetrahedron has volume 1/6
/// let volume = 1.0_f64 / 6.0;
/// assert!(volume.abs() >= DEFAULT_MIN_TET_VOLUME);
/// ```
pub const DEFAULT_MIN_TET_VOLUME: f64 = 1e-6;

/// Scaling factor for converting lattice coordinates to integer keys.
///
/// Cross-layer node matching rounds `x * COORDINATE_SCALE` and
/// `y * COORDINATE_SCALE` to `i64`, which matches coordinates to six
/// decimal places without hashing floats.
///
/// # Example
///
/// ```rust
/// use config::constants::COORDINATE_SCALE;
///
/// fn to_key(value: f64) -> i64 {
///     (value * COORDINATE_SCALE).round() as i64
/// }
///
/// assert_eq!(to_key(1.0000001), to_key(1.0));
/// assert_ne!(to_key(1.000001), to_key(1.0));
/// ```
pub const COORDINATE_SCALE: f64 = 1e6;

// =============================================================================
// OPTION DEFAULTS
// =============================================================================

/// Default grid stride. A factor of 1 keeps every sample.
pub const DEFAULT_DOWNSAMPLE_FACTOR: usize = 1;

/// Default thickness of the synthetic top cap layer.
pub const DEFAULT_TOP_CAP_THICKNESS: f64 = 1.0;

/// Default name of the synthetic top cap layer.
pub const DEFAULT_TOP_CAP_NAME: &str = "TopCap";

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum number of gridpoints a single export may allocate.
///
/// Safety limit checked before allocation so that an accidental
/// `downsample_factor = 1` on a huge survey fails fast.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_GRIDPOINTS;
///
/// let (layers, ny, nx) = (12, 400, 400);
/// assert!((layers + 1) * ny * nx < MAX_GRIDPOINTS);
/// ```
pub const MAX_GRIDPOINTS: usize = 20_000_000;

/// Smallest lattice edge (in samples) that still forms one cell.
pub const MIN_LATTICE_SIDE: usize = 2;

// =============================================================================
// FORMAT CONSTANTS
// =============================================================================

/// Decimal places written for gridpoint coordinates.
pub const COORDINATE_DECIMALS: usize = 6;

/// Maximum zone ids per `ZGROUP` line for brick (B8) exports.
pub const BRICK_IDS_PER_LINE: usize = 15;

/// Maximum zone ids per `ZGROUP` line for tetra (T4) exports.
pub const TETRA_IDS_PER_LINE: usize = 20;

/// Group name used when sanitization leaves nothing behind.
pub const FALLBACK_GROUP_NAME: &str = "group";

/// Generator name written into the file header.
pub const GENERATOR_NAME: &str = "strata-grid";

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Clamps a requested downsample factor to a usable stride.
///
/// Zero and negative requests become 1.
///
/// # Example
///
/// ```rust
/// use config::constants::clamp_downsample_factor;
///
/// assert_eq!(clamp_downsample_factor(0), 1);
/// assert_eq!(clamp_downsample_factor(-3), 1);
/// assert_eq!(clamp_downsample_factor(4), 4);
/// ```
#[inline]
pub fn clamp_downsample_factor(factor: i64) -> usize {
    if factor <= 1 {
        1
    } else {
        usize::try_from(factor).unwrap_or(usize::MAX)
    }
}

/// Returns the `ZGROUP` line width for the given element arity.
///
/// # Example
///
/// ```rust
/// use config::constants::{ids_per_group_line, BRICK_IDS_PER_LINE, TETRA_IDS_PER_LINE};
///
/// assert_eq!(ids_per_group_line(8), BRICK_IDS_PER_LINE);
/// assert_eq!(ids_per_group_line(4), TETRA_IDS_PER_LINE);
/// ```
#[inline]
pub fn ids_per_group_line(nodes_per_zone: usize) -> usize {
    if nodes_per_zone == 8 {
        BRICK_IDS_PER_LINE
    } else {
        TETRA_IDS_PER_LINE
    }
}
