//! QIM watermark embedding.
//!
//! Quantization index modulation snaps every coefficient inside an
//! embedding band to the nearest multiple of `delta`, then offsets it by a
//! quarter step. The residual of each embedded coefficient from its nearest
//! grid point is therefore exactly `delta / 4` regardless of its original
//! value; that deterministic residual is the hidden signal. Because grid
//! rounding is a projection, re-embedding an already watermarked block
//! reproduces the same coefficients.

use crate::config::Band;
use crate::matrix::Matrix;

/// Replace every coefficient in `band` with
/// `round(c / delta) * delta + delta / 4`.
///
/// Returns a new block; the input is untouched.
pub fn embed_band(block: &Matrix, band: &Band, delta: f64) -> Matrix {
    let mut out = block.clone();
    quantize_band(&mut out, band, delta);
    out
}

/// In-place band quantization on a block the caller owns.
pub(crate) fn quantize_band(block: &mut Matrix, band: &Band, delta: f64) {
    let offset = delta / 4.0;
    for row in band.row_min..band.row_max {
        for col in band.col_min..band.col_max {
            let c = block.get(row, col);
            block.set(row, col, (c / delta).round() * delta + offset);
        }
    }
}
