//! Dense square matrices and the reference implementations.
//!
//! `DenseMatrix` stores its values flat in row-major order, the same layout
//! every multiply in this crate reads and writes. The naive and transposed
//! multiplies here are the correctness baselines the other strategies are
//! checked against.

pub mod naive;
pub mod transpose;

use crate::error::{MatbenchError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Square `n × n` matrix of `f64`, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// Wraps a flat row-major buffer. Fails unless `n >= 1` and
    /// `data.len() == n * n`.
    pub fn new(n: usize, data: Vec<f64>) -> Result<Self> {
        if n == 0 {
            return Err(MatbenchError::DimensionMismatch(
                "matrix dimension must be at least 1".to_string(),
            ));
        }
        if data.len() != n * n {
            return Err(MatbenchError::DimensionMismatch(format!(
                "expected {}x{}={} elements, got {}",
                n,
                n,
                n * n,
                data.len()
            )));
        }
        Ok(DenseMatrix { n, data })
    }

    /// Builds a matrix from nested rows. Every row must have as many
    /// elements as there are rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(MatbenchError::DimensionMismatch(format!(
                    "row {} has {} elements, matrix is not square ({} rows)",
                    i,
                    row.len(),
                    n
                )));
            }
            data.extend_from_slice(row);
        }
        Self::new(n, data)
    }

    pub fn zeros(n: usize) -> Result<Self> {
        Self::new(n, vec![0.0; n * n])
    }

    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::zeros(n)?;
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        Ok(m)
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

/// Checks that two operands can be multiplied and returns their shared size.
pub(crate) fn check_operands(a: &DenseMatrix, b: &DenseMatrix) -> Result<usize> {
    if a.n != b.n {
        return Err(MatbenchError::DimensionMismatch(format!(
            "operands are {}x{} and {}x{}",
            a.n, a.n, b.n, b.n
        )));
    }
    Ok(a.n)
}

/// Random matrix generator.
///
/// Seeded so a benchmark run can be repeated with identical inputs.
pub struct MatrixFactory {
    rng: StdRng,
}

impl MatrixFactory {
    pub fn new(seed: u64) -> Self {
        MatrixFactory {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform values in `[0, 1)`.
    pub fn dense(&mut self, n: usize) -> Result<DenseMatrix> {
        let data = (0..n * n).map(|_| self.rng.gen_range(0.0..1.0)).collect();
        DenseMatrix::new(n, data)
    }

    /// Synthetic sparse matrix where `density` is the fraction of zeros.
    /// See [`crate::sparse::synthetic::generate_synthetic`].
    pub fn sparse(
        &mut self,
        rows: usize,
        cols: usize,
        density: f64,
    ) -> Result<crate::sparse::CsrMatrix> {
        crate::sparse::synthetic::generate_synthetic(rows, cols, density, &mut self.rng)
    }

    /// Random vector for sparse multiplies.
    pub fn vector(&mut self, len: usize) -> Vec<f64> {
        (0..len).map(|_| self.rng.gen_range(0.0..1.0)).collect()
    }
}
