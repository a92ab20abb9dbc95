//! Cache-blocked GEMM.

use crate::error::{MatbenchError, Result};
use crate::matrix::{DenseMatrix, check_operands};

/// Cache-blocked matrix multiplication.
///
/// Tiles the i, j and k loops into cubes of side `block_size` so that the
/// three tiles being worked on stay in cache. Each output cell gets one
/// partial sum per k-tile. Tiles on the right and bottom edges are clipped,
/// so `block_size` does not need to divide `n` and may exceed it.
///
/// # Errors
///
/// `InvalidConfiguration` if `block_size` is zero, `DimensionMismatch` if the
/// operands differ in size.
pub fn multiply_blocked(a: &DenseMatrix, b: &DenseMatrix, block_size: usize) -> Result<DenseMatrix> {
    let n = check_operands(a, b)?;
    check_block_size(block_size)?;

    let mut c = vec![0.0; n * n];
    matmul_tiled_band(a.as_slice(), b.as_slice(), &mut c, n, 0, n, block_size);
    DenseMatrix::new(n, c)
}

pub(crate) fn check_block_size(block_size: usize) -> Result<()> {
    if block_size == 0 {
        return Err(MatbenchError::InvalidConfiguration(
            "block size must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Tiled kernel over the output rows `row_start..row_end`.
///
/// `c_band` holds only those rows: row `i` of C lives at
/// `c_band[(i - row_start) * n..]`. The serial multiply passes the whole
/// matrix as one band; the parallel one gives each worker its own band.
///
/// # Arguments
///
/// * `a`, `b` - Operands (n × n), row-major
/// * `c_band` - Output rows (row_end - row_start) × n, accumulated into
pub fn matmul_tiled_band(
    a: &[f64],
    b: &[f64],
    c_band: &mut [f64],
    n: usize,
    row_start: usize,
    row_end: usize,
    block_size: usize,
) {
    for ii in (row_start..row_end).step_by(block_size) {
        let i_end = (ii + block_size).min(row_end);

        for jj in (0..n).step_by(block_size) {
            let j_end = (jj + block_size).min(n);

            for kk in (0..n).step_by(block_size) {
                let k_end = (kk + block_size).min(n);

                for i in ii..i_end {
                    let out = (i - row_start) * n;
                    for j in jj..j_end {
                        let mut sum = 0.0;
                        for k in kk..k_end {
                            sum += a[i * n + k] * b[k * n + j];
                        }
                        c_band[out + j] += sum;
                    }
                }
            }
        }
    }
}
