//! Residual extraction and watermark accuracy scoring.
//!
//! Extraction inverts the embedding rule: recompute the nearest
//! `delta`-grid point for every coefficient in a band and take the signed
//! residual. The band is reduced to its **median** residual -- a few
//! coefficients knocked off-grid by re-encoding noise must not drag the
//! estimate, and the median ignores them where a mean would not.
//!
//! A perfectly preserved watermark has median residual `delta / 4`; the
//! accuracy score penalizes drift linearly and clamps at zero once the
//! median has moved a full quarter step.

use crate::config::Band;
use crate::matrix::Matrix;

/// Median residual of one band from the nearest `delta` grid.
pub fn band_residual_median(block: &Matrix, band: &Band, delta: f64) -> f64 {
    let mut residuals = Vec::with_capacity(band.len());
    for row in band.row_min..band.row_max {
        for col in band.col_min..band.col_max {
            let c = block.get(row, col);
            residuals.push(c - (c / delta).round() * delta);
        }
    }
    median(&mut residuals)
}

/// Median residual of every band, in band-list order.
pub fn extract_residuals(block: &Matrix, bands: &[Band], delta: f64) -> Vec<f64> {
    bands
        .iter()
        .map(|band| band_residual_median(block, band, delta))
        .collect()
}

/// Accuracy of one band given its median residual, in percent.
///
/// `max(0, 1 - |median - delta/4| / (delta/4)) * 100`: 100 when the median
/// sits exactly on the embedded offset, 0 once it has drifted a full
/// quarter step or more.
pub fn band_accuracy(median: f64, delta: f64) -> f64 {
    let expected = delta / 4.0;
    (1.0 - (median - expected).abs() / expected).max(0.0) * 100.0
}

fn median(values: &mut [f64]) -> f64 {
    debug_assert!(!values.is_empty(), "median of empty band");
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}
