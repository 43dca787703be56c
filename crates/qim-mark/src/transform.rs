//! Orthonormal 2D discrete cosine transform.
//!
//! [`Dct2d`] wraps a pair of planned 1D transforms from `rustdct` (DCT-II
//! forward, DCT-III inverse) and applies them separably along rows, then
//! columns. Both directions carry the orthonormal scaling, so the transform
//! preserves energy and `inverse(forward(m))` reconstructs `m` to within
//! floating-point tolerance.
//!
//! `rustdct` computes the unscaled cosine sums; orthonormality is restored
//! by scaling every element by `sqrt(2/N)` with an extra `1/sqrt(2)` on the
//! DC term (and the mirrored scaling before the inverse pass).

use std::f64::consts::{FRAC_1_SQRT_2, SQRT_2};
use std::sync::Arc;

use rustdct::{Dct2, Dct3, DctPlanner, TransformType2And3};

use crate::error::MarkError;
use crate::matrix::Matrix;

/// Planned forward/inverse orthonormal 2D DCT for one square size.
///
/// Planning is done once in [`Dct2d::new`]; the transform itself is pure
/// and reusable across any number of matrices of the planned side length.
pub struct Dct2d {
    side: usize,
    forward: Arc<dyn TransformType2And3<f64>>,
    inverse: Arc<dyn TransformType2And3<f64>>,
}

impl Dct2d {
    /// Plan transforms for `side x side` matrices.
    pub fn new(side: usize) -> Self {
        let mut planner = DctPlanner::new();
        Self {
            side,
            forward: planner.plan_dct2(side),
            inverse: planner.plan_dct3(side),
        }
    }

    /// The side length this transform was planned for.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Forward transform: spatial matrix to frequency block.
    ///
    /// Coefficients are ordered by increasing frequency along each axis,
    /// with the DC term at (0, 0).
    pub fn forward(&self, matrix: &Matrix) -> Result<Matrix, MarkError> {
        self.check_shape(matrix)?;
        let mut rows = matrix.clone();
        self.forward_rows(&mut rows);
        let mut cols = rows.transposed();
        self.forward_rows(&mut cols);
        Ok(cols.transposed())
    }

    /// Inverse transform: frequency block back to the spatial domain.
    pub fn inverse(&self, block: &Matrix) -> Result<Matrix, MarkError> {
        self.check_shape(block)?;
        let mut rows = block.clone();
        self.inverse_rows(&mut rows);
        let mut cols = rows.transposed();
        self.inverse_rows(&mut cols);
        Ok(cols.transposed())
    }

    fn forward_rows(&self, matrix: &mut Matrix) {
        let scale = (2.0 / self.side as f64).sqrt();
        for row in matrix.rows_mut() {
            self.forward.process_dct2(row);
            for value in row.iter_mut() {
                *value *= scale;
            }
            row[0] *= FRAC_1_SQRT_2;
        }
    }

    fn inverse_rows(&self, matrix: &mut Matrix) {
        let scale = (2.0 / self.side as f64).sqrt();
        for row in matrix.rows_mut() {
            row[0] *= SQRT_2;
            for value in row.iter_mut() {
                *value *= scale;
            }
            self.inverse.process_dct3(row);
        }
    }

    fn check_shape(&self, matrix: &Matrix) -> Result<(), MarkError> {
        if matrix.side() != self.side {
            return Err(MarkError::InvalidShape {
                expected: self.side,
                actual: matrix.side(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &Matrix, b: &Matrix, tol: f64) {
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            assert!(
                (x - y).abs() <= tol,
                "matrices differ: {x} vs {y} (tol {tol})"
            );
        }
    }

    #[test]
    fn dc_term_of_constant_matrix() {
        // For a constant matrix every coefficient except DC is zero, and
        // the orthonormal DC term is side * value.
        let dct = Dct2d::new(8);
        let m = Matrix::filled(8, 0.5);
        let block = dct.forward(&m).unwrap();

        assert!((block.get(0, 0) - 8.0 * 0.5).abs() < 1e-12);
        for r in 0..8 {
            for c in 0..8 {
                if (r, c) != (0, 0) {
                    assert!(block.get(r, c).abs() < 1e-12, "AC ({r},{c}) not zero");
                }
            }
        }
    }

    #[test]
    fn round_trip_reconstructs_input() {
        let dct = Dct2d::new(32);
        // Deterministic but textured input
        let data: Vec<f64> = (0..32 * 32)
            .map(|i| ((i as f64 * 0.37).sin() * 0.5 + 0.5) * 0.9)
            .collect();
        let m = Matrix::from_vec(32, data).unwrap();

        let back = dct.inverse(&dct.forward(&m).unwrap()).unwrap();
        assert_close(&m, &back, 1e-10);
    }

    #[test]
    fn transform_preserves_energy() {
        // Orthonormality: sum of squares is identical in both domains.
        let dct = Dct2d::new(16);
        let data: Vec<f64> = (0..256).map(|i| (i as f64 * 0.71).cos()).collect();
        let m = Matrix::from_vec(16, data).unwrap();
        let block = dct.forward(&m).unwrap();

        let spatial: f64 = m.as_slice().iter().map(|v| v * v).sum();
        let frequency: f64 = block.as_slice().iter().map(|v| v * v).sum();
        assert!(
            (spatial - frequency).abs() < 1e-8,
            "energy drifted: {spatial} vs {frequency}"
        );
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let dct = Dct2d::new(16);
        let m = Matrix::zeros(8);
        assert_eq!(
            dct.forward(&m).unwrap_err(),
            MarkError::InvalidShape {
                expected: 16,
                actual: 8
            }
        );
        assert_eq!(
            dct.inverse(&m).unwrap_err(),
            MarkError::InvalidShape {
                expected: 16,
                actual: 8
            }
        );
    }
}
