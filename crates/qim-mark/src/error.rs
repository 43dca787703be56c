//! Error types for the qim-mark public API.
//!
//! [`MarkError`] is the single error enum returned by the crate.
//! Parameter problems carry a nested [`ParameterError`] describing which
//! part of the watermark configuration was rejected.

use thiserror::Error;

use crate::config::Band;

/// Error type for watermark embedding, extraction and evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarkError {
    /// Matrix side length does not match what the operation was planned for.
    #[error("matrix shape mismatch: expected {expected}x{expected}, got {actual}x{actual}")]
    InvalidShape { expected: usize, actual: usize },

    /// Backing buffer length does not form a square matrix of the given side.
    #[error("buffer of {len} values cannot back a {side}x{side} matrix")]
    InvalidLength { side: usize, len: usize },

    /// Watermark configuration rejected before any processing.
    #[error("invalid watermark parameter: {0}")]
    InvalidParameter(#[from] ParameterError),
}

/// Reason a [`WatermarkConfig`](crate::config::WatermarkConfig) was rejected.
///
/// All of these are caught by up-front validation; none of them can surface
/// mid-embedding. Silent truncation would produce a watermark that is not
/// faithfully recoverable, so every case is fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    /// The quantization step must be a positive, finite value.
    #[error("quantization step must be positive and finite, got {0}")]
    NonPositiveDelta(f64),

    /// The canvas must split into four equal quadrants.
    #[error("canvas side must be an even, non-zero pixel count, got {0}")]
    InvalidCanvas(usize),

    /// At least one embedding band is required.
    #[error("embedding band list is empty")]
    EmptyBands,

    /// A band index range is empty (min >= max).
    #[error("band {0} selects no coefficients")]
    EmptyBand(Band),

    /// A band does not fit inside a quadrant's coefficient extent.
    #[error("band {band} exceeds the {extent}x{extent} quadrant extent")]
    BandOutOfBounds { band: Band, extent: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_message() {
        let err = MarkError::InvalidShape {
            expected: 32,
            actual: 64,
        };
        assert_eq!(
            err.to_string(),
            "matrix shape mismatch: expected 32x32, got 64x64"
        );
    }

    #[test]
    fn parameter_error_wraps_into_mark_error() {
        let err: MarkError = ParameterError::NonPositiveDelta(0.0).into();
        match err {
            MarkError::InvalidParameter(ParameterError::NonPositiveDelta(d)) => {
                assert_eq!(d, 0.0)
            }
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn band_out_of_bounds_message() {
        let err = ParameterError::BandOutOfBounds {
            band: Band::new(1, 40, 1, 8),
            extent: 32,
        };
        assert_eq!(
            err.to_string(),
            "band (1..40, 1..8) exceeds the 32x32 quadrant extent"
        );
    }
}
