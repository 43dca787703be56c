//! Synthetic image fixtures for integration tests.

use std::path::{Path, PathBuf};

use qim_mark::Matrix;

/// Smooth gradient-plus-ripple canvas standing in for a natural photo.
pub fn textured_matrix(side: usize) -> Matrix {
    let data: Vec<f64> = (0..side * side)
        .map(|i| {
            let r = (i / side) as f64 / side as f64;
            let c = (i % side) as f64 / side as f64;
            (0.5 + 0.3 * (r * 4.0).sin() * (c * 5.0).cos() + 0.1 * r).clamp(0.0, 1.0)
        })
        .collect();
    Matrix::from_vec(side, data).expect("fixture dimensions are consistent")
}

/// Write a synthetic grayscale PNG into `dir` and return its path.
pub fn write_test_png(dir: &Path, name: &str, side: usize) -> PathBuf {
    let path = dir.join(name);
    let matrix = textured_matrix(side);
    let pixels: Vec<u8> = matrix
        .as_slice()
        .iter()
        .map(|&v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
        .collect();
    let img = image::GrayImage::from_raw(side as u32, side as u32, pixels)
        .expect("fixture buffer matches dimensions");
    img.save(&path).expect("failed to write fixture PNG");
    path
}
