//! The [`Watermarker`] entry point tying transform, embedder, extractor
//! and metrics together under one validated configuration.

use rayon::join;

use crate::config::WatermarkConfig;
use crate::embed::quantize_band;
use crate::error::MarkError;
use crate::extract::{band_accuracy, extract_residuals};
use crate::matrix::Matrix;
use crate::metrics::{psnr, quantize_to_u8, ssim, MetricsReport};
use crate::transform::Dct2d;

/// Watermark embedder/scorer for one immutable configuration.
///
/// Construction validates the configuration and plans the quadrant-sized
/// DCT once; all methods are pure and the instance can be shared freely
/// across threads. Holding the configuration inside the instance is what
/// guarantees embed and extract always agree on `delta` and the band list.
///
/// # Example
///
/// ```
/// use qim_mark::{Matrix, Watermarker, WatermarkConfig};
///
/// let marker = Watermarker::new(WatermarkConfig::default()).unwrap();
/// let image = Matrix::filled(64, 0.5);
///
/// let marked = marker.embed_image(&image).unwrap();
/// let report = marker.evaluate(&image, &marked).unwrap();
/// assert!(report.watermark_accuracy > 99.0);
/// ```
pub struct Watermarker {
    config: WatermarkConfig,
    dct: Dct2d,
}

impl std::fmt::Debug for Watermarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watermarker")
            .field("config", &self.config)
            .field("dct_side", &self.dct.side())
            .finish()
    }
}

impl Watermarker {
    /// Validate the configuration and plan the per-quadrant transform.
    pub fn new(config: WatermarkConfig) -> Result<Self, MarkError> {
        config.validate()?;
        let dct = Dct2d::new(config.quadrant_side());
        Ok(Self { config, dct })
    }

    pub fn config(&self) -> &WatermarkConfig {
        &self.config
    }

    /// Embed the watermark into one quadrant.
    ///
    /// Returns the watermarked quadrant in both domains: the spatial
    /// matrix and the quantized frequency block.
    pub fn embed_quadrant(&self, quadrant: &Matrix) -> Result<(Matrix, Matrix), MarkError> {
        let mut block = self.dct.forward(quadrant)?;
        for band in &self.config.bands {
            quantize_band(&mut block, band, self.config.delta);
        }
        let spatial = self.dct.inverse(&block)?;
        Ok((spatial, block))
    }

    /// Embed the watermark into a full canvas.
    ///
    /// The image is split into four quadrants in fixed order, each embedded
    /// independently (the quadrants share no state, so the four transforms
    /// run on parallel workers), and reassembled in the same order.
    pub fn embed_image(&self, image: &Matrix) -> Result<Matrix, MarkError> {
        self.check_canvas(image)?;
        let quads = image.split_quadrants();

        let ((tl, tr), (bl, br)) = join(
            || {
                join(
                    || self.embed_quadrant(&quads[0]),
                    || self.embed_quadrant(&quads[1]),
                )
            },
            || {
                join(
                    || self.embed_quadrant(&quads[2]),
                    || self.embed_quadrant(&quads[3]),
                )
            },
        );

        Matrix::from_quadrants(&[tl?.0, tr?.0, bl?.0, br?.0])
    }

    /// Watermark accuracy of one quadrant, in percent.
    ///
    /// Forward-transforms the quadrant, extracts the median residual per
    /// band and averages the per-band linear-penalty accuracies.
    pub fn score_quadrant(&self, quadrant: &Matrix) -> Result<f64, MarkError> {
        let block = self.dct.forward(quadrant)?;
        let medians = extract_residuals(&block, &self.config.bands, self.config.delta);
        let total: f64 = medians
            .iter()
            .map(|&m| band_accuracy(m, self.config.delta))
            .sum();
        Ok(total / self.config.bands.len() as f64)
    }

    /// Watermark accuracy of a full canvas: mean of the four quadrant
    /// scores.
    pub fn score_image(&self, image: &Matrix) -> Result<f64, MarkError> {
        self.check_canvas(image)?;
        let quads = image.split_quadrants();

        let ((tl, tr), (bl, br)) = join(
            || {
                join(
                    || self.score_quadrant(&quads[0]),
                    || self.score_quadrant(&quads[1]),
                )
            },
            || {
                join(
                    || self.score_quadrant(&quads[2]),
                    || self.score_quadrant(&quads[3]),
                )
            },
        );

        Ok((tl? + tr? + bl? + br?) / 4.0)
    }

    /// Full quality report: PSNR and SSIM between `original` and
    /// `candidate` (both quantized to 8-bit first) plus the watermark
    /// accuracy recovered from `candidate`.
    pub fn evaluate(
        &self,
        original: &Matrix,
        candidate: &Matrix,
    ) -> Result<MetricsReport, MarkError> {
        self.check_canvas(original)?;
        self.check_canvas(candidate)?;

        let original_u8 = quantize_to_u8(original);
        let candidate_u8 = quantize_to_u8(candidate);

        Ok(MetricsReport {
            psnr: psnr(&original_u8, &candidate_u8),
            ssim: ssim(&original_u8, &candidate_u8, self.config.canvas),
            watermark_accuracy: self.score_image(candidate)?,
        })
    }

    fn check_canvas(&self, image: &Matrix) -> Result<(), MarkError> {
        if image.side() != self.config.canvas {
            return Err(MarkError::InvalidShape {
                expected: self.config.canvas,
                actual: image.side(),
            });
        }
        Ok(())
    }
}
