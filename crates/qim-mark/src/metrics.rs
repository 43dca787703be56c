//! Pixel-fidelity metrics: PSNR and SSIM over 8-bit samples.
//!
//! Fidelity metrics are conventionally defined on integer sample depth, so
//! both inputs are quantized from normalized [0,1] floats to 8-bit before
//! comparison. PSNR of identical images is reported as `f64::INFINITY`
//! rather than propagating a division error.

use serde::Serialize;

use crate::matrix::Matrix;

/// SSIM stabilizer K1 (Wang et al., 2004).
const SSIM_K1: f64 = 0.01;
/// SSIM stabilizer K2.
const SSIM_K2: f64 = 0.03;
/// Dynamic range of 8-bit samples.
const DYNAMIC_RANGE: f64 = 255.0;
/// Side length of the local SSIM window.
const SSIM_WINDOW: usize = 7;

/// Combined quality report for one evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    /// Peak signal-to-noise ratio in dB; `inf` for identical images.
    pub psnr: f64,
    /// Structural similarity index, roughly [-1, 1].
    pub ssim: f64,
    /// Watermark recovery accuracy in percent, [0, 100].
    pub watermark_accuracy: f64,
}

/// Quantize a normalized [0,1] matrix to 8-bit samples (round, clip).
pub fn quantize_to_u8(matrix: &Matrix) -> Vec<u8> {
    matrix
        .as_slice()
        .iter()
        .map(|&v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
        .collect()
}

/// Peak signal-to-noise ratio between two 8-bit images, in dB.
///
/// Returns `f64::INFINITY` when the images are identical (zero MSE).
pub fn psnr(reference: &[u8], candidate: &[u8]) -> f64 {
    debug_assert_eq!(reference.len(), candidate.len());
    let mse: f64 = reference
        .iter()
        .zip(candidate)
        .map(|(&a, &b)| {
            let d = a as f64 - b as f64;
            d * d
        })
        .sum::<f64>()
        / reference.len() as f64;

    if mse == 0.0 {
        return f64::INFINITY;
    }
    10.0 * (DYNAMIC_RANGE * DYNAMIC_RANGE / mse).log10()
}

/// Mean structural similarity between two 8-bit images.
///
/// Local statistics over a sliding 7x7 uniform window with sample
/// (unbiased) covariance, averaged across all fully-contained window
/// positions. Images smaller than the window fall back to one global
/// window covering every pixel.
pub fn ssim(reference: &[u8], candidate: &[u8], side: usize) -> f64 {
    debug_assert_eq!(reference.len(), side * side);
    debug_assert_eq!(candidate.len(), side * side);

    let c1 = (SSIM_K1 * DYNAMIC_RANGE).powi(2);
    let c2 = (SSIM_K2 * DYNAMIC_RANGE).powi(2);

    let window = SSIM_WINDOW.min(side);
    let positions = side - window + 1;

    let mut total = 0.0;
    for wr in 0..positions {
        for wc in 0..positions {
            total += window_ssim(reference, candidate, side, wr, wc, window, c1, c2);
        }
    }
    total / (positions * positions) as f64
}

#[allow(clippy::too_many_arguments)]
fn window_ssim(
    reference: &[u8],
    candidate: &[u8],
    side: usize,
    row0: usize,
    col0: usize,
    window: usize,
    c1: f64,
    c2: f64,
) -> f64 {
    let n = (window * window) as f64;

    let mut sum_r = 0.0;
    let mut sum_c = 0.0;
    for r in row0..row0 + window {
        for c in col0..col0 + window {
            sum_r += reference[r * side + c] as f64;
            sum_c += candidate[r * side + c] as f64;
        }
    }
    let mean_r = sum_r / n;
    let mean_c = sum_c / n;

    let mut var_r = 0.0;
    let mut var_c = 0.0;
    let mut covar = 0.0;
    for r in row0..row0 + window {
        for c in col0..col0 + window {
            let dr = reference[r * side + c] as f64 - mean_r;
            let dc = candidate[r * side + c] as f64 - mean_c;
            var_r += dr * dr;
            var_c += dc * dc;
            covar += dr * dc;
        }
    }
    // Sample covariance, matching the conventional SSIM reference
    let norm = n - 1.0;
    let var_r = var_r / norm;
    let var_c = var_c / norm;
    let covar = covar / norm;

    ((2.0 * mean_r * mean_c + c1) * (2.0 * covar + c2))
        / ((mean_r * mean_r + mean_c * mean_c + c1) * (var_r + var_c + c2))
}
