use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use qim_mark::{Band, MetricsReport, WatermarkConfig};

use crate::error::PipelineError;

/// Persisted results record for one pipeline run.
///
/// Written for audit and debugging; nothing reads it back. Captures every
/// parameter needed to reproduce the run alongside the per-domain metrics.
#[derive(Debug, Clone, Serialize)]
pub struct ResultsRecord {
    /// When the run finished
    pub generated_at: DateTime<Utc>,

    /// Canvas side length in pixels
    pub canvas: usize,

    /// Quantization step
    pub delta: f64,

    /// Embedded residual offset (delta / 4)
    pub offset: f64,

    /// Embedding bands, per quadrant
    pub bands: Vec<Band>,

    /// Re-encoding quality factor used for the robustness pass
    pub jpeg_quality: u8,

    /// Metrics of the freshly watermarked image vs the original
    pub clear_domain: MetricsReport,

    /// Metrics after the lossy re-encode of the watermarked image
    pub jpeg_compressed: MetricsReport,

    /// Metrics after the secure-compute round trip, when one ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_compute: Option<MetricsReport>,
}

impl ResultsRecord {
    pub fn new(
        watermark: &WatermarkConfig,
        jpeg_quality: u8,
        clear_domain: MetricsReport,
        jpeg_compressed: MetricsReport,
        secure_compute: Option<MetricsReport>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            canvas: watermark.canvas,
            delta: watermark.delta,
            offset: watermark.offset(),
            bands: watermark.bands.clone(),
            jpeg_quality,
            clear_domain,
            jpeg_compressed,
            secure_compute,
        }
    }

    /// Write the record as pretty-printed JSON.
    pub fn write(&self, path: &Path) -> Result<(), PipelineError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "Results record written");
        Ok(())
    }
}
