//! Lossy re-encoding simulator.
//!
//! Stand-in for real-world compression between embedding and extraction:
//! the watermarked canvas is pushed through an in-memory JPEG encode/decode
//! round trip at a configurable quality factor, then handed back as a
//! normalized matrix for re-scoring.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageFormat;

use qim_mark::Matrix;

use crate::error::PipelineError;
use crate::services::image_io::to_luma;

/// Re-encode a matrix through an in-memory JPEG at the given quality
/// (1-100, lower = more aggressive).
pub fn jpeg_round_trip(matrix: &Matrix, quality: u8) -> Result<Matrix, PipelineError> {
    let side = matrix.side();
    let gray = to_luma(matrix);

    let mut encoded = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut encoded), quality);
    gray.write_with_encoder(encoder)
        .map_err(PipelineError::Recompress)?;

    let decoded = image::load_from_memory_with_format(&encoded, ImageFormat::Jpeg)
        .map_err(PipelineError::Recompress)?
        .to_luma8();

    // JPEG preserves dimensions; resize defensively matches the original
    // pipeline's behavior for any codec that does not.
    let decoded = if decoded.dimensions() == (side as u32, side as u32) {
        decoded
    } else {
        image::imageops::resize(&decoded, side as u32, side as u32, FilterType::CatmullRom)
    };

    let data: Vec<f64> = decoded.pixels().map(|p| p.0[0] as f64 / 255.0).collect();
    tracing::debug!(quality, bytes = encoded.len(), "JPEG round trip complete");
    Ok(Matrix::from_vec(side, data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured_matrix(side: usize) -> Matrix {
        let data: Vec<f64> = (0..side * side)
            .map(|i| ((i as f64 * 0.61).sin() * 0.35 + 0.5).clamp(0.0, 1.0))
            .collect();
        Matrix::from_vec(side, data).unwrap()
    }

    #[test]
    fn preserves_shape_and_range() {
        let m = textured_matrix(64);
        let out = jpeg_round_trip(&m, 50).unwrap();
        assert_eq!(out.side(), 64);
        for &v in out.as_slice() {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn lossy_round_trip_perturbs_pixels() {
        let m = textured_matrix(64);
        let out = jpeg_round_trip(&m, 30).unwrap();
        let max_diff = m
            .as_slice()
            .iter()
            .zip(out.as_slice())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        assert!(max_diff > 0.0, "quality 30 should not be lossless");
        assert!(max_diff < 0.5, "quality 30 should not destroy the image");
    }

    #[test]
    fn higher_quality_preserves_more() {
        let m = textured_matrix(64);
        let mse = |out: &Matrix| -> f64 {
            m.as_slice()
                .iter()
                .zip(out.as_slice())
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>()
                / (64.0 * 64.0)
        };
        let high = mse(&jpeg_round_trip(&m, 90).unwrap());
        let low = mse(&jpeg_round_trip(&m, 10).unwrap());
        assert!(
            high <= low,
            "quality 90 mse {high} should not exceed quality 10 mse {low}"
        );
    }
}
