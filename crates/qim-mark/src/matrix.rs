//! Square matrix storage for spatial pixels and frequency coefficients.
//!
//! [`Matrix`] is a flat, row-major `Vec<f64>` with a side length. The same
//! type holds normalized [0,1] intensities in the spatial domain and
//! unbounded real coefficients in the frequency domain. Pipeline stages
//! never mutate a matrix they received; each stage returns a new one.

use crate::error::MarkError;

/// Quadrant positions in the fixed processing order.
///
/// Every full-image operation walks quadrants in this order and reassembles
/// them the same way, so embed and extract always agree on which quadrant
/// is which.
pub const QUADRANT_ORDER: [Quadrant; 4] = [
    Quadrant::TopLeft,
    Quadrant::TopRight,
    Quadrant::BottomLeft,
    Quadrant::BottomRight,
];

/// One of the four equal spatial partitions of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// Row/column offset of this quadrant's origin in a canvas of the
    /// given half-side.
    fn origin(self, half: usize) -> (usize, usize) {
        match self {
            Quadrant::TopLeft => (0, 0),
            Quadrant::TopRight => (0, half),
            Quadrant::BottomLeft => (half, 0),
            Quadrant::BottomRight => (half, half),
        }
    }
}

/// Square row-major matrix of `f64` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    side: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a zero-filled matrix.
    pub fn zeros(side: usize) -> Self {
        Self {
            side,
            data: vec![0.0; side * side],
        }
    }

    /// Create a matrix filled with a single value.
    pub fn filled(side: usize, value: f64) -> Self {
        Self {
            side,
            data: vec![value; side * side],
        }
    }

    /// Wrap an existing row-major buffer.
    ///
    /// The buffer length must be exactly `side * side`.
    pub fn from_vec(side: usize, data: Vec<f64>) -> Result<Self, MarkError> {
        if data.len() != side * side {
            return Err(MarkError::InvalidLength {
                side,
                len: data.len(),
            });
        }
        Ok(Self { side, data })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Get the value at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[self.index(row, col)]
    }

    /// Set the value at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let idx = self.index(row, col);
        self.data[idx] = value;
    }

    /// Row-major view of all values.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume the matrix, returning the row-major buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Iterate rows as mutable slices of length `side`.
    pub(crate) fn rows_mut(&mut self) -> impl Iterator<Item = &mut [f64]> + '_ {
        self.data.chunks_exact_mut(self.side)
    }

    /// Return the transpose.
    pub fn transposed(&self) -> Matrix {
        let n = self.side;
        let mut out = Matrix::zeros(n);
        for r in 0..n {
            for c in 0..n {
                out.data[c * n + r] = self.data[r * n + c];
            }
        }
        out
    }

    /// Extract one quadrant as a new `half x half` matrix.
    ///
    /// The side length must be even; callers validate this via
    /// [`WatermarkConfig::validate`](crate::config::WatermarkConfig::validate)
    /// before any splitting happens.
    pub fn quadrant(&self, which: Quadrant) -> Matrix {
        debug_assert!(self.side % 2 == 0, "side {} not divisible", self.side);
        let half = self.side / 2;
        let (r0, c0) = which.origin(half);
        let mut out = Matrix::zeros(half);
        for r in 0..half {
            for c in 0..half {
                out.data[r * half + c] = self.data[(r0 + r) * self.side + (c0 + c)];
            }
        }
        out
    }

    /// Split into the four quadrants in [`QUADRANT_ORDER`].
    pub fn split_quadrants(&self) -> [Matrix; 4] {
        QUADRANT_ORDER.map(|q| self.quadrant(q))
    }

    /// Reassemble a canvas from four quadrants given in [`QUADRANT_ORDER`].
    ///
    /// All quadrants must share one side length.
    pub fn from_quadrants(quads: &[Matrix; 4]) -> Result<Matrix, MarkError> {
        let half = quads[0].side;
        for q in &quads[1..] {
            if q.side != half {
                return Err(MarkError::InvalidShape {
                    expected: half,
                    actual: q.side,
                });
            }
        }
        let mut out = Matrix::zeros(half * 2);
        for (quad, position) in quads.iter().zip(QUADRANT_ORDER) {
            let (r0, c0) = position.origin(half);
            for r in 0..half {
                for c in 0..half {
                    out.data[(r0 + r) * out.side + (c0 + c)] = quad.data[r * half + c];
                }
            }
        }
        Ok(out)
    }

    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.side, "row {row} >= {}", self.side);
        debug_assert!(col < self.side, "col {col} >= {}", self.side);
        row * self.side + col
    }
}
