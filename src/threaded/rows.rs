//! Row-parallel multiply.

use crate::error::Result;
use crate::matrix::{DenseMatrix, check_operands};
use crate::threaded::pool::{WorkerTask, run_tasks};
use crate::threaded::{check_thread_count, partition, split_rows};
use std::ops::Range;

/// Computes full rows `rows` of C into `out`.
pub struct RowTask<'a> {
    a: &'a [f64],
    b: &'a [f64],
    n: usize,
    rows: Range<usize>,
    out: &'a mut [f64],
}

impl WorkerTask for RowTask<'_> {
    fn run(self) -> Result<()> {
        let RowTask { a, b, n, rows, out } = self;
        for (c_row, i) in out.chunks_exact_mut(n).zip(rows) {
            for (j, cell) in c_row.iter_mut().enumerate() {
                let mut sum = 0.0;
                for k in 0..n {
                    sum += a[i * n + k] * b[k * n + j];
                }
                *cell = sum;
            }
        }
        Ok(())
    }
}

/// Multi-threaded matrix multiplication, split by output rows.
///
/// The n rows of C are divided into `thread_count` ranges whose sizes differ
/// by at most one, and each range is one task on its own thread. With more
/// threads than rows, the surplus threads are simply not started.
///
/// # Errors
///
/// `InvalidConfiguration` for zero threads, `DimensionMismatch` for unequal
/// operands, `ComputationFailed` if any task failed.
pub fn multiply_parallel_rows(
    a: &DenseMatrix,
    b: &DenseMatrix,
    thread_count: usize,
) -> Result<DenseMatrix> {
    let n = check_operands(a, b)?;
    check_thread_count(thread_count)?;

    let mut c = vec![0.0; n * n];
    let ranges = partition(n, thread_count);
    let tasks: Vec<RowTask> = split_rows(&mut c, n, &ranges)
        .into_iter()
        .zip(ranges.iter().cloned())
        .map(|(out, rows)| RowTask {
            a: a.as_slice(),
            b: b.as_slice(),
            n,
            rows,
            out,
        })
        .collect();

    run_tasks(tasks, thread_count)?;
    DenseMatrix::new(n, c)
}
