//! Image decoding, resizing and saving.
//!
//! Adapters between files on disk and the core's normalized [0,1]
//! matrices. Decoding accepts any format the `image` crate recognizes,
//! converts to grayscale and resizes to the configured square canvas with
//! Catmull-Rom (bicubic) filtering.

use std::path::Path;

use image::imageops::FilterType;
use image::GrayImage;

use qim_mark::Matrix;

use crate::error::PipelineError;

/// Decode a source file into a normalized grayscale canvas.
///
/// Unreadable or corrupt sources surface a decode failure with no partial
/// result.
pub fn load_grayscale(path: &Path, side: usize) -> Result<Matrix, PipelineError> {
    let decoded = image::open(path).map_err(|source| PipelineError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let gray = decoded.to_luma8();
    let resized = image::imageops::resize(&gray, side as u32, side as u32, FilterType::CatmullRom);

    let data: Vec<f64> = resized.pixels().map(|p| p.0[0] as f64 / 255.0).collect();
    Ok(Matrix::from_vec(side, data)?)
}

/// Quantize a matrix to an 8-bit grayscale image buffer.
pub fn to_luma(matrix: &Matrix) -> GrayImage {
    let side = matrix.side() as u32;
    let pixels = qim_mark::metrics::quantize_to_u8(matrix);
    // from_raw only fails on a length mismatch, which quantize_to_u8 rules out
    GrayImage::from_raw(side, side, pixels).unwrap_or_else(|| GrayImage::new(side, side))
}

/// Save a matrix as an 8-bit grayscale PNG.
pub fn save_png(matrix: &Matrix, path: &Path) -> Result<(), PipelineError> {
    to_luma(matrix).save(path).map_err(PipelineError::Encode)?;
    tracing::debug!(path = %path.display(), side = matrix.side(), "Image saved");
    Ok(())
}
