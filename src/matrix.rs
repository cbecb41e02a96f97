//! Row-addressable dense matrix shared across worker threads.
//!
//! Cells hold `f64` bit patterns in `AtomicU64`s, accessed with relaxed
//! ordering: individual loads and stores are atomic, but concurrent row
//! updates may interleave arbitrarily. Racy, but that's the point of
//! Hogwild-style training.

use rand::Rng;
use rand::rngs::StdRng;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct Matrix {
    rows: usize,
    cols: usize,
    cells: Vec<AtomicU64>,
}

impl Matrix {
    /// New matrix with every cell drawn uniformly from `[-bound, bound)`.
    pub fn uniform(rows: usize, cols: usize, bound: f64, rng: &mut StdRng) -> Matrix {
        let cells = (0..rows * cols)
            .map(|_| {
                let v = (rng.random::<f64>() - 0.5) * 2.0 * bound;
                AtomicU64::new(v.to_bits())
            })
            .collect();
        Matrix { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        f64::from_bits(self.cells[row * self.cols + col].load(Ordering::Relaxed))
    }

    /// Copies one row into `out`.
    pub fn copy_row_into(&self, row: usize, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.cols);
        let base = row * self.cols;
        for (j, o) in out.iter_mut().enumerate() {
            *o = f64::from_bits(self.cells[base + j].load(Ordering::Relaxed));
        }
    }

    /// `row += a * src`. Separate load/compute/store per cell; fetch-style
    /// read-modify-write would synchronise more than the training loop needs.
    pub fn add_to_row(&self, row: usize, src: &[f64], a: f64) {
        debug_assert_eq!(src.len(), self.cols);
        let base = row * self.cols;
        for (j, s) in src.iter().enumerate() {
            let cell = &self.cells[base + j];
            let v = f64::from_bits(cell.load(Ordering::Relaxed));
            cell.store((v + a * s).to_bits(), Ordering::Relaxed);
        }
    }

    /// `row *= a`.
    pub fn scale_row(&self, row: usize, a: f64) {
        let base = row * self.cols;
        for j in 0..self.cols {
            let cell = &self.cells[base + j];
            let v = f64::from_bits(cell.load(Ordering::Relaxed));
            cell.store((v * a).to_bits(), Ordering::Relaxed);
        }
    }

    /// L2 norm of one row.
    pub fn l2_norm_row(&self, row: usize) -> f64 {
        let base = row * self.cols;
        (0..self.cols)
            .map(|j| {
                let v = f64::from_bits(self.cells[base + j].load(Ordering::Relaxed));
                v * v
            })
            .sum::<f64>()
            .sqrt()
    }

    /// Rescales every row to unit L2 norm.
    pub fn normalize_rows(&self) {
        for i in 0..self.rows {
            let nrm = self.l2_norm_row(i);
            if nrm > 0.0 {
                self.scale_row(i, 1.0 / nrm);
            }
        }
    }

    /// Snapshot of the whole matrix as plain floats, row-major.
    pub fn to_vec(&self) -> Vec<f64> {
        self.cells
            .iter()
            .map(|cell| f64::from_bits(cell.load(Ordering::Relaxed)))
            .collect()
    }
}
