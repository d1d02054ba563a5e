//! Dense row-major matrix storage.
//!
//! A [`Matrix`] is a single contiguous `Vec<f64>` addressed through an
//! explicit `row * cols + col` accessor. A flat buffer keeps rows adjacent in
//! memory (one allocation, one cache-friendly layout) and avoids the
//! partial-allocation failure modes of per-row buffers.

use rand::Rng;

use crate::error::{allocation_error, validation_error, Result};

/// Dense two-dimensional `f64` matrix in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Allocates a `rows x cols` matrix filled with zeros.
    ///
    /// Reservation is fallible: an out-of-memory condition surfaces as
    /// [`TilebenchError::AllocationError`](crate::TilebenchError) instead of
    /// aborting the process.
    pub fn zeroed(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(validation_error(format!(
                "matrix dimensions must be positive, got {}x{}",
                rows, cols
            )));
        }

        let len = rows.checked_mul(cols).ok_or_else(|| {
            validation_error(format!("matrix dimensions {}x{} overflow usize", rows, cols))
        })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|e| allocation_error(len, e.to_string()))?;
        data.resize(len, 0.0);

        Ok(Matrix { rows, cols, data })
    }

    /// Allocates a `rows x cols` matrix filled with pseudo-random values.
    ///
    /// Values are small integers in `1..=10` stored as `f64`, drawn from the
    /// caller's generator so repeated runs with the same seed produce
    /// identical inputs.
    pub fn random(rows: usize, cols: usize, rng: &mut impl Rng) -> Result<Self> {
        let mut matrix = Self::zeroed(rows, cols)?;
        for value in matrix.data.iter_mut() {
            *value = f64::from(rng.random_range(1u8..=10));
        }
        Ok(matrix)
    }

    /// Allocates an `n x n` identity matrix.
    pub fn identity(n: usize) -> Result<Self> {
        let mut matrix = Self::zeroed(n, n)?;
        for i in 0..n {
            matrix.data[i * n + i] = 1.0;
        }
        Ok(matrix)
    }

    /// Builds a matrix from an existing row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(validation_error(format!(
                "matrix dimensions must be positive, got {}x{}",
                rows, cols
            )));
        }
        let expected = rows.checked_mul(cols).ok_or_else(|| {
            validation_error(format!("matrix dimensions {}x{} overflow usize", rows, cols))
        })?;
        if data.len() != expected {
            return Err(validation_error(format!(
                "buffer of {} elements cannot back a {}x{} matrix",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major index of element `(i, j)`.
    #[inline(always)]
    pub fn at(&self, i: usize, j: usize) -> usize {
        i * self.cols + j
    }

    /// Element at `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.at(i, j)]
    }

    /// Writes element `(i, j)`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        let idx = self.at(i, j);
        self.data[idx] = value;
    }

    /// Resets every element to zero, keeping the allocation.
    pub fn reset(&mut self) {
        self.data.fill(0.0);
    }

    /// The backing row-major buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable view of the backing row-major buffer.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}
