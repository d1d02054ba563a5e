//! Matrix multiplication kernels.
//!
//! Three scalar kernels over row-major [`Matrix`] operands, all computing
//! `C += A * B`:
//!
//! - [`multiply_naive`]: i→j→k loop order. The innermost loop walks a column
//!   of B, so consecutive accesses are `n` elements apart. Poor spatial
//!   locality; kept as the textbook starting point.
//! - [`multiply_standard`]: i→k→j loop order. The innermost loop walks a row
//!   of B contiguously, which is the cache-friendly scalar reference every
//!   other configuration is compared against.
//! - [`multiply_blocked`]: the i→k→j ordering applied tile by tile, so the
//!   working set of each tile triple stays resident in cache across the
//!   inner loops.
//!
//! The blocked kernel visits k in the same ascending order as the standard
//! kernel for every output element, so the two produce bit-identical results
//! and can be compared with strict equality.

use std::cmp::min;

use crate::error::{dimension_mismatch, validation_error, Result};
use crate::matrix::Matrix;

/// Checks that `a`, `b` and `c` have multiplication-compatible shapes.
///
/// The inner dimension check (`a.cols == b.rows`) is the operand mismatch
/// case; an output buffer of the wrong shape is a configuration error.
fn check_operands(a: &Matrix, b: &Matrix, c: &Matrix) -> Result<()> {
    if a.cols() != b.rows() {
        return Err(dimension_mismatch(
            (a.rows(), a.cols()),
            (b.rows(), b.cols()),
        ));
    }
    if c.rows() != a.rows() || c.cols() != b.cols() {
        return Err(validation_error(format!(
            "output matrix is {}x{} but the product is {}x{}",
            c.rows(),
            c.cols(),
            a.rows(),
            b.cols()
        )));
    }
    Ok(())
}

/// Naive multiplication using the i→j→k loop order.
///
/// B is accessed column-wise in the innermost loop (stride `n` in row-major
/// storage), which is what makes this ordering slow on large matrices.
pub fn multiply_naive(a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<()> {
    check_operands(a, b, c)?;

    let (m, n, k) = (a.rows(), b.cols(), a.cols());
    let (a, b) = (a.as_slice(), b.as_slice());
    let c = c.as_mut_slice();

    for i in 0..m {
        for j in 0..n {
            for p in 0..k {
                c[i * n + j] += a[i * k + p] * b[p * n + j];
            }
        }
    }

    Ok(())
}

/// Cache-friendly multiplication using the i→k→j loop order.
///
/// Swapping the j and k loops makes the innermost loop access both B and C
/// sequentially (stride 1). This is the unblocked reference that blocked
/// configurations are measured against.
pub fn multiply_standard(a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<()> {
    check_operands(a, b, c)?;

    let (m, n, k) = (a.rows(), b.cols(), a.cols());
    let (a, b) = (a.as_slice(), b.as_slice());
    let c = c.as_mut_slice();

    for i in 0..m {
        for p in 0..k {
            for j in 0..n {
                c[i * n + j] += a[i * k + p] * b[p * n + j];
            }
        }
    }

    Ok(())
}

/// Blocked (tiled) multiplication parameterized by `block_size`.
///
/// The index space is partitioned into `block_size`-wide tiles along all
/// three dimensions. Tiles are iterated in (ii, jj, kk) order; within a tile
/// triple the element loops run in the standard (i, k, j) order with upper
/// bounds clamped by `min`, so a trailing tile may be shorter when
/// `block_size` does not divide a dimension. Every (i, k, j) triple is
/// visited exactly once, and for a fixed output element the k indices arrive
/// in ascending order exactly as in [`multiply_standard`], keeping the
/// floating-point accumulation sequence identical.
///
/// A `block_size` of at least the matrix dimension degenerates to a single
/// tile per dimension, which is arithmetically the standard kernel.
pub fn multiply_blocked(a: &Matrix, b: &Matrix, c: &mut Matrix, block_size: usize) -> Result<()> {
    check_operands(a, b, c)?;
    if block_size == 0 {
        return Err(validation_error("block size must be positive"));
    }

    let (m, n, k) = (a.rows(), b.cols(), a.cols());
    let (a, b) = (a.as_slice(), b.as_slice());
    let c = c.as_mut_slice();

    for ii in (0..m).step_by(block_size) {
        for jj in (0..n).step_by(block_size) {
            for kk in (0..k).step_by(block_size) {
                for i in ii..min(ii + block_size, m) {
                    for p in kk..min(kk + block_size, k) {
                        for j in jj..min(jj + block_size, n) {
                            c[i * n + j] += a[i * k + p] * b[p * n + j];
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
