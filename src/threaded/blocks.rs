//! Block-parallel multiply.

use crate::blocked::tiled::{check_block_size, matmul_tiled_band};
use crate::error::Result;
use crate::matrix::{DenseMatrix, check_operands};
use crate::threaded::pool::{WorkerTask, run_tasks};
use crate::threaded::{check_thread_count, split_rows};
use std::ops::Range;

/// One block-row band of the tiled multiply.
pub struct BandTask<'a> {
    a: &'a [f64],
    b: &'a [f64],
    n: usize,
    block_size: usize,
    rows: Range<usize>,
    out: &'a mut [f64],
}

impl WorkerTask for BandTask<'_> {
    fn run(self) -> Result<()> {
        matmul_tiled_band(
            self.a,
            self.b,
            self.out,
            self.n,
            self.rows.start,
            self.rows.end,
            self.block_size,
        );
        Ok(())
    }
}

/// Multi-threaded cache-blocked multiply.
///
/// Uses the same tiling as [`crate::blocked::tiled::multiply_blocked`], so
/// the per-cell summation order is identical. Every band of `block_size`
/// rows is a task, and a fixed pool of `thread_count` workers pulls bands
/// until none are left. A band owns its rows of C outright.
///
/// # Errors
///
/// `InvalidConfiguration` for a zero block size or thread count,
/// `DimensionMismatch` for unequal operands, `ComputationFailed` if any band
/// failed.
pub fn multiply_blocked_parallel(
    a: &DenseMatrix,
    b: &DenseMatrix,
    block_size: usize,
    thread_count: usize,
) -> Result<DenseMatrix> {
    let n = check_operands(a, b)?;
    check_block_size(block_size)?;
    check_thread_count(thread_count)?;

    let mut c = DenseMatrix::zeros(n)?;
    let bands: Vec<Range<usize>> = (0..n)
        .step_by(block_size)
        .map(|start| start..(start + block_size).min(n))
        .collect();

    let tasks: Vec<BandTask> = split_rows(c.as_mut_slice(), n, &bands)
        .into_iter()
        .zip(bands.iter().cloned())
        .map(|(out, rows)| BandTask {
            a: a.as_slice(),
            b: b.as_slice(),
            n,
            block_size,
            rows,
            out,
        })
        .collect();

    run_tasks(tasks, thread_count)?;
    Ok(c)
}
