//! # Export Errors
//!
//! Error types for layered grid export. Degenerate elements are not errors;
//! they are dropped and counted in [`DegenerateReport`](crate::DegenerateReport).

use thiserror::Error;

/// Errors that abort an export call.
///
/// Every variant is raised before the output file is touched, except
/// [`ExportError::Io`] which is the write itself failing.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Malformed input or options
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// A layer's bottom node has no counterpart on the layer below
    #[error("Layer {layer} bottom node at ({x}, {y}) has no matching top node on the layer below")]
    StructuralMismatch { layer: usize, x: f64, y: f64 },

    /// A layer's bottom surface does not meet the layer below
    #[error(
        "Layer {layer} is discontinuous at ({x}, {y}): z diff {diff:.6} exceeds tolerance {tolerance:.6}"
    )]
    LayerDiscontinuity {
        layer: usize,
        x: f64,
        y: f64,
        diff: f64,
        tolerance: f64,
    },

    /// Writing the grid file failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Result type for export operations.
pub type ExportResult<T> = std::result::Result<T, ExportError>;
