use crate::error::{MatbenchError, Result};
use crate::threaded::pool::{WorkerTask, run_tasks};
use crate::threaded::{check_thread_count, partition, split_rows};
use std::ops::Range;

/// Sparse matrix in compressed sparse row form.
///
/// Entries of row `i` sit at `col_ind[row_ptr[i]..row_ptr[i + 1]]` and the
/// matching `values`. Column order within a row is whatever the input gave.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    rows: usize,
    cols: usize,
    row_ptr: Vec<usize>,
    col_ind: Vec<usize>,
    values: Vec<f64>,
}

impl CsrMatrix {
    /// Builds a CSR matrix from unordered `(row, col, value)` triplets.
    ///
    /// Counting sort: count entries per row, prefix-sum the counts into
    /// `row_ptr`, then scatter each triplet through a per-row fill cursor.
    /// Triplets keep their relative order within a row.
    ///
    /// # Errors
    ///
    /// `InvalidIndex` if any triplet lies outside `rows × cols`. Nothing is
    /// built in that case.
    pub fn build(rows: usize, cols: usize, triplets: &[(usize, usize, f64)]) -> Result<Self> {
        if let Some(&(row, col, _)) = triplets.iter().find(|&&(r, c, _)| r >= rows || c >= cols) {
            return Err(MatbenchError::InvalidIndex {
                row,
                col,
                rows,
                cols,
            });
        }

        let Some(ptr_len) = rows.checked_add(1) else {
            return Err(MatbenchError::DimensionMismatch(format!(
                "{} rows cannot be indexed",
                rows
            )));
        };

        let nnz = triplets.len();
        let mut row_ptr = vec![0usize; ptr_len];
        for &(r, _, _) in triplets {
            row_ptr[r + 1] += 1;
        }
        for i in 0..rows {
            row_ptr[i + 1] += row_ptr[i];
        }

        let mut fill = row_ptr[..rows].to_vec();
        let mut col_ind = vec![0usize; nnz];
        let mut values = vec![0.0; nnz];
        for &(r, c, v) in triplets {
            let dst = fill[r];
            fill[r] += 1;
            col_ind[dst] = c;
            values[dst] = v;
        }

        Ok(CsrMatrix {
            rows,
            cols,
            row_ptr,
            col_ind,
            values,
        })
    }

    /// Assembles a matrix from arrays that are already in CSR order.
    pub(crate) fn from_parts(
        rows: usize,
        cols: usize,
        row_ptr: Vec<usize>,
        col_ind: Vec<usize>,
        values: Vec<f64>,
    ) -> Result<Self> {
        let nnz = values.len();
        if row_ptr.len() != rows + 1
            || col_ind.len() != nnz
            || row_ptr.first() != Some(&0)
            || row_ptr.last() != Some(&nnz)
            || row_ptr.windows(2).any(|w| w[0] > w[1])
        {
            return Err(MatbenchError::DimensionMismatch(format!(
                "inconsistent CSR arrays for {}x{} matrix with {} entries",
                rows, cols, nnz
            )));
        }
        for (i, w) in row_ptr.windows(2).enumerate() {
            if let Some(&col) = col_ind[w[0]..w[1]].iter().find(|&&c| c >= cols) {
                return Err(MatbenchError::InvalidIndex {
                    row: i,
                    col,
                    rows,
                    cols,
                });
            }
        }
        Ok(CsrMatrix {
            rows,
            cols,
            row_ptr,
            col_ind,
            values,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    pub fn col_ind(&self) -> &[usize] {
        &self.col_ind
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Sparse × dense vector: `y[i] = Σ values[k] * x[col_ind[k]]` over row i.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` unless `x.len() == cols`.
    pub fn multiply(&self, x: &[f64]) -> Result<Vec<f64>> {
        self.check_vector(x)?;
        let mut y = vec![0.0; self.rows];
        self.multiply_rows(x, 0..self.rows, &mut y);
        Ok(y)
    }

    /// Same as [`CsrMatrix::multiply`] with rows split across a worker pool.
    /// Each task owns a disjoint range of `y`.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` for a wrong-length `x`, `InvalidConfiguration` for
    /// zero threads, `ComputationFailed` if a worker failed.
    pub fn multiply_parallel(&self, x: &[f64], thread_count: usize) -> Result<Vec<f64>> {
        self.check_vector(x)?;
        check_thread_count(thread_count)?;

        let mut y = vec![0.0; self.rows];
        let ranges = partition(self.rows, thread_count);
        let tasks: Vec<SpmvTask> = split_rows(&mut y, 1, &ranges)
            .into_iter()
            .zip(ranges.iter().cloned())
            .map(|(out, rows)| SpmvTask {
                matrix: self,
                x,
                rows,
                out,
            })
            .collect();

        run_tasks(tasks, thread_count)?;
        Ok(y)
    }

    /// Expands to a dense row-major `rows × cols` buffer.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.rows * self.cols];
        for i in 0..self.rows {
            for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                dense[i * self.cols + self.col_ind[k]] += self.values[k];
            }
        }
        dense
    }

    fn check_vector(&self, x: &[f64]) -> Result<()> {
        if x.len() != self.cols {
            return Err(MatbenchError::DimensionMismatch(format!(
                "vector has {} elements, matrix has {} columns",
                x.len(),
                self.cols
            )));
        }
        Ok(())
    }

    // `y` holds only the rows in `rows`.
    fn multiply_rows(&self, x: &[f64], rows: Range<usize>, y: &mut [f64]) {
        for (out, i) in y.iter_mut().zip(rows) {
            let mut sum = 0.0;
            for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                sum += self.values[k] * x[self.col_ind[k]];
            }
            *out = sum;
        }
    }
}

/// Computes `y[rows]` for one worker.
pub struct SpmvTask<'a> {
    matrix: &'a CsrMatrix,
    x: &'a [f64],
    rows: Range<usize>,
    out: &'a mut [f64],
}

impl WorkerTask for SpmvTask<'_> {
    fn run(self) -> Result<()> {
        self.matrix.multiply_rows(self.x, self.rows, self.out);
        Ok(())
    }
}
