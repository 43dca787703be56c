//! qim-mark: frequency-domain QIM watermarking for square grayscale images.
//!
//! This crate embeds an imperceptible, recoverable signal into a fixed-size
//! grayscale canvas and measures how well that signal survives lossy
//! re-encoding. It is pure computation: no I/O, no ambient state, and every
//! stage returns a new matrix instead of mutating its input.
//!
//! # Pipeline
//!
//! ```text
//! canvas [0,1]
//!     |
//!     v
//! split into 4 quadrants        (fixed TL, TR, BL, BR order)
//!     |                          per quadrant, independently:
//!     +--> forward DCT           (orthonormal, rows then columns)
//!     |        |
//!     |   quantize bands         (round to delta grid + delta/4 offset)
//!     |        |
//!     +<-- inverse DCT
//!     |
//! reassemble canvas
//!     |
//!     v
//! (optional lossy re-encode by the caller)
//!     |
//!     v
//! per quadrant: forward DCT -> median band residual -> accuracy %
//! plus PSNR / SSIM against the original -> MetricsReport
//! ```
//!
//! # Quick Start
//!
//! The [`Watermarker`] is the primary entry point:
//!
//! ```
//! use qim_mark::{Matrix, Watermarker, WatermarkConfig};
//!
//! let marker = Watermarker::new(WatermarkConfig::default()).unwrap();
//! let image = Matrix::filled(64, 0.5);
//!
//! let marked = marker.embed_image(&image).unwrap();
//! let report = marker.evaluate(&image, &marked).unwrap();
//!
//! assert!(report.watermark_accuracy > 99.0);
//! assert!(report.psnr > 30.0);
//! ```
//!
//! # The embedding rule
//!
//! Quantization index modulation replaces each coefficient `c` inside a
//! configured low-frequency band with
//! `round(c / delta) * delta + delta / 4`. The residual of the result from
//! the nearest `delta` grid point is exactly `delta / 4` no matter what `c`
//! was -- the signal lives in that residual, not in an additive
//! perturbation, which is what makes the operation idempotent and the
//! extraction a pure re-quantization.
//!
//! Extraction takes the **median** residual per band so that a few
//! coefficients distorted by re-encoding noise cannot drag the estimate,
//! and scores drift with a linear penalty clamped at zero.
//!
//! # Configuration discipline
//!
//! [`WatermarkConfig`] (quantization step, band list, canvas side) is an
//! explicit immutable value validated at [`Watermarker::new`]. Embedding
//! and scoring share the instance, so the two halves of the contract can
//! never disagree; out-of-range parameters are rejected before any
//! transform work rather than silently truncated.

pub mod api;
pub mod config;
pub mod embed;
pub mod error;
pub mod extract;
pub mod matrix;
pub mod metrics;
pub mod transform;


pub use api::Watermarker;
pub use config::{Band, WatermarkConfig, DEFAULT_CANVAS, DEFAULT_DELTA};
pub use error::{MarkError, ParameterError};
pub use matrix::{Matrix, Quadrant, QUADRANT_ORDER};
pub use metrics::MetricsReport;
pub use transform::Dct2d;
