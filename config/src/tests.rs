//! # Tests for Config Constants
//!
//! Unit tests verifying the correctness of configuration constants
//! and helper functions.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_monotonic_epsilon_is_positive() {
    assert!(MONOTONIC_EPSILON > 0.0, "MONOTONIC_EPSILON must be positive");
}

#[test]
fn test_interface_tolerance_tighter_than_repair_step() {
    // A repaired interface must never pass as "continuous" by accident
    assert!(DEFAULT_INTERFACE_TOLERANCE < MONOTONIC_EPSILON);
}

#[test]
fn test_min_zone_thickness_matches_repair_step() {
    assert_eq!(DEFAULT_MIN_ZONE_THICKNESS, MONOTONIC_EPSILON);
}

#[test]
fn test_min_tet_volume_is_small() {
    assert!(DEFAULT_MIN_TET_VOLUME > 0.0);
    assert!(DEFAULT_MIN_TET_VOLUME < 1e-3);
}

#[test]
fn test_coordinate_scale_resolves_micrometres() {
    let a = (12.345_678 * COORDINATE_SCALE).round() as i64;
    let b = (12.345_679 * COORDINATE_SCALE).round() as i64;
    assert_ne!(a, b);
}

// =============================================================================
// DEFAULT TESTS
// =============================================================================

#[test]
fn test_default_downsample_keeps_everything() {
    assert_eq!(DEFAULT_DOWNSAMPLE_FACTOR, 1);
}

#[test]
fn test_default_top_cap() {
    assert_eq!(DEFAULT_TOP_CAP_NAME, "TopCap");
    assert_eq!(DEFAULT_TOP_CAP_THICKNESS, 1.0);
}

// =============================================================================
// FORMAT TESTS
// =============================================================================

#[test]
fn test_group_line_widths() {
    assert_eq!(BRICK_IDS_PER_LINE, 15);
    assert_eq!(TETRA_IDS_PER_LINE, 20);
}

#[test]
fn test_fallback_group_name_is_ascii() {
    assert!(FALLBACK_GROUP_NAME.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn test_min_lattice_side() {
    assert_eq!(MIN_LATTICE_SIDE, 2);
}

// =============================================================================
// HELPER TESTS
// =============================================================================

#[test]
fn test_clamp_downsample_factor() {
    assert_eq!(clamp_downsample_factor(i64::MIN), 1);
    assert_eq!(clamp_downsample_factor(0), 1);
    assert_eq!(clamp_downsample_factor(1), 1);
    assert_eq!(clamp_downsample_factor(7), 7);
}

#[test]
fn test_ids_per_group_line() {
    assert_eq!(ids_per_group_line(8), 15);
    assert_eq!(ids_per_group_line(4), 20);
}
