use std::sync::atomic::{AtomicU64, Ordering};

use crate::math::matrix::Matrix;

/// Row-major matrix of `f64` cells stored as `AtomicU64` bit patterns.
///
/// Reads and writes are individually atomic but nothing orders a whole
/// training step: a reader may observe some cells already updated by another
/// in-flight step and some not yet. That staleness is the accepted
/// approximation of Hogwild-style parallel SGD. `add` uses a CAS loop so
/// concurrent increments to the same cell are never lost.
#[derive(Debug)]
pub struct AtomicMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<AtomicU64>,
}

impl AtomicMatrix {
    /// Caller guarantees `source` is rectangular.
    pub fn from_matrix(source: &Matrix) -> AtomicMatrix {
        let cells = source.iter().map(|v| AtomicU64::new(v.to_bits())).collect();
        AtomicMatrix {
            rows: source.rows,
            cols: source.cols,
            cells,
        }
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        f64::from_bits(self.cells[self.index(row, col)].load(Ordering::Relaxed))
    }

    /// Atomically adds `delta` to the cell.
    #[inline]
    pub fn add(&self, row: usize, col: usize, delta: f64) {
        let cell = &self.cells[self.index(row, col)];
        // The closure always returns Some, so fetch_update cannot fail.
        let _ = cell.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
            Some((f64::from_bits(bits) + delta).to_bits())
        });
    }

    /// Copies the current cell values out. Under concurrent training the
    /// copy is not a consistent cut; take it between epochs.
    pub fn snapshot(&self) -> Matrix {
        let mut res = Matrix::zeros(self.rows, self.cols);
        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.get(i, j);
            }
        }
        res
    }
}
