//! Pipeline orchestrator: owns the image lifecycle from source file to
//! results record.
//!
//! One run decodes and resizes the source, embeds the watermark, evaluates
//! the clear domain, re-evaluates after a lossy JPEG round trip, optionally
//! routes the watermarked canvas through the secure-compute capability,
//! and persists the watermarked images plus a JSON results record.

use std::path::{Path, PathBuf};

use qim_mark::{Dct2d, Matrix, MetricsReport, Watermarker};

use crate::error::PipelineError;
use crate::models::config::AppConfig;
use crate::models::report::ResultsRecord;
use crate::services::compute::ComputeBackend;
use crate::services::{image_io, recompress};

/// Everything one pipeline run produced.
pub struct PipelineOutcome {
    /// The watermarked canvas
    pub watermarked: Matrix,
    /// Metrics of the watermarked image vs the original
    pub clear_metrics: MetricsReport,
    /// Metrics after the lossy re-encode
    pub jpeg_metrics: MetricsReport,
    /// Metrics after the secure-compute round trip, when one ran
    pub secure_metrics: Option<MetricsReport>,
    /// Where the watermarked PNG was written
    pub watermarked_path: PathBuf,
    /// Where the results record was written
    pub record_path: PathBuf,
}

/// Watermark embedding + evaluation pipeline for one configuration.
pub struct WatermarkPipeline {
    marker: Watermarker,
    canvas_dct: Dct2d,
    jpeg_quality: u8,
    output_dir: PathBuf,
}

impl WatermarkPipeline {
    pub fn new(config: &AppConfig) -> Result<Self, PipelineError> {
        let marker = Watermarker::new(config.watermark.clone())?;
        let canvas_dct = Dct2d::new(config.watermark.canvas);
        Ok(Self {
            marker,
            canvas_dct,
            jpeg_quality: config.jpeg_quality,
            output_dir: config.output_dir.clone(),
        })
    }

    /// Embed only: decode, watermark, write the marked PNG.
    pub fn embed_file(&self, input: &Path, output: &Path) -> Result<Matrix, PipelineError> {
        let canvas = self.marker.config().canvas;
        let original = image_io::load_grayscale(input, canvas)?;
        let watermarked = self.marker.embed_image(&original)?;
        image_io::save_png(&watermarked, output)?;
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            "Watermark embedded"
        );
        Ok(watermarked)
    }

    /// Full run: embed, evaluate clear/JPEG/secure domains, persist
    /// artifacts.
    pub fn process_file(
        &self,
        input: &Path,
        backend: Option<&dyn ComputeBackend>,
    ) -> Result<PipelineOutcome, PipelineError> {
        let canvas = self.marker.config().canvas;

        tracing::info!(input = %input.display(), canvas, "Processing image");
        let original = image_io::load_grayscale(input, canvas)?;
        let watermarked = self.marker.embed_image(&original)?;

        let clear_metrics = self.marker.evaluate(&original, &watermarked)?;
        tracing::info!(
            psnr = clear_metrics.psnr,
            ssim = clear_metrics.ssim,
            accuracy = clear_metrics.watermark_accuracy,
            "Clear domain evaluated"
        );

        let recompressed = recompress::jpeg_round_trip(&watermarked, self.jpeg_quality)?;
        let jpeg_metrics = self.marker.evaluate(&original, &recompressed)?;
        tracing::info!(
            quality = self.jpeg_quality,
            accuracy = jpeg_metrics.watermark_accuracy,
            "Lossy re-encode evaluated"
        );

        let mut secure_metrics = None;
        std::fs::create_dir_all(&self.output_dir)?;

        if let Some(backend) = backend {
            let processed = self.secure_pass(&watermarked, backend)?;
            let metrics = self.marker.evaluate(&original, &processed)?;
            tracing::info!(
                accuracy = metrics.watermark_accuracy,
                "Secure compute pass evaluated"
            );
            image_io::save_png(&processed, &self.output_dir.join("secure_processed.png"))?;
            secure_metrics = Some(metrics);
        }

        let watermarked_path = self.output_dir.join("watermarked.png");
        image_io::save_png(&watermarked, &watermarked_path)?;

        let record = ResultsRecord::new(
            self.marker.config(),
            self.jpeg_quality,
            clear_metrics.clone(),
            jpeg_metrics.clone(),
            secure_metrics.clone(),
        );
        let record_path = self.output_dir.join("watermarking_results.json");
        record.write(&record_path)?;

        Ok(PipelineOutcome {
            watermarked,
            clear_metrics,
            jpeg_metrics,
            secure_metrics,
            watermarked_path,
            record_path,
        })
    }

    /// Route the watermarked canvas through the compute capability.
    ///
    /// Full-canvas DCT, normalized by the 99th-percentile absolute
    /// coefficient, flattened and sent; the response is rescaled by the
    /// same factor and inverse-transformed.
    fn secure_pass(
        &self,
        watermarked: &Matrix,
        backend: &dyn ComputeBackend,
    ) -> Result<Matrix, PipelineError> {
        let canvas = self.marker.config().canvas;
        let block = self.canvas_dct.forward(watermarked)?;

        let scale = percentile_99_abs(block.as_slice());
        let normalized: Vec<f64> = block.as_slice().iter().map(|&c| c / scale).collect();

        let output = backend.forward(&normalized)?;

        let rescaled: Vec<f64> = output.iter().map(|&c| c * scale).collect();
        let block_out = Matrix::from_vec(canvas, rescaled)?;
        Ok(self.canvas_dct.inverse(&block_out)?)
    }
}

/// 99th percentile of absolute values, with linear interpolation between
/// ranks. Falls back to 1.0 for an all-zero vector so normalization never
/// divides by zero.
fn percentile_99_abs(values: &[f64]) -> f64 {
    let mut magnitudes: Vec<f64> = values.iter().map(|v| v.abs()).collect();
    magnitudes.sort_by(|a, b| a.total_cmp(b));

    let rank = 0.99 * (magnitudes.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let value = if lo == hi {
        magnitudes[lo]
    } else {
        magnitudes[lo] + (rank - lo as f64) * (magnitudes[hi] - magnitudes[lo])
    };

    if value > 0.0 {
        value
    } else {
        1.0
    }
}
