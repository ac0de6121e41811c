//! # Config Crate
//!
//! Centralized configuration constants for the layered grid export
//! pipeline. All tolerances and tunable defaults are defined here so the
//! mesh library, the CLI and the tests agree on them.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_INTERFACE_TOLERANCE, MONOTONIC_EPSILON};
//!
//! // Interface matching is tighter than the repair step
//! assert!(DEFAULT_INTERFACE_TOLERANCE < MONOTONIC_EPSILON);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Format Compatible**: Output parameters match what the simulator imports
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

#[cfg(test)]
mod tests;
