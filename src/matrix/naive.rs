use super::{DenseMatrix, check_operands};
use crate::error::Result;

/// Naive matrix multiplication using i-j-k loop order.
///
/// This is the textbook triple loop: `C[i][j] = Σ_k A[i][k] * B[k][j]`.
/// The innermost loop walks B with stride `n`, so it is slow on anything
/// large. Every other strategy is checked against it.
///
/// # Errors
///
/// `DimensionMismatch` if `a` and `b` have different sizes.
pub fn multiply_naive(a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
    let n = check_operands(a, b)?;
    let mut c = vec![0.0; n * n];
    matmul_naive_ijk(a.as_slice(), b.as_slice(), &mut c, n);
    DenseMatrix::new(n, c)
}

/// Slice kernel behind [`multiply_naive`]. Overwrites `c`.
///
/// # Arguments
///
/// * `a`, `b` - Operands (n × n), row-major
/// * `c` - Output (n × n), row-major
pub fn matmul_naive_ijk(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
    for i in 0..n {
        for j in 0..n {
            let mut sum = 0.0;
            for k in 0..n {
                sum += a[i * n + k] * b[k * n + j];
            }
            c[i * n + j] = sum;
        }
    }
}

/// Accumulating i-k-j multiply over one tile: C += A * B.
///
/// The innermost loop walks B and C with stride 1. Used to fold one
/// `A[bi][bk] * B[bk][j]` product into a result block.
///
/// # Arguments
///
/// * `a`, `b`, `c` - Tiles (side × side), row-major
pub fn matmul_ikj_accumulate(a: &[f64], b: &[f64], c: &mut [f64], side: usize) {
    for i in 0..side {
        for k in 0..side {
            let aik = a[i * side + k];
            for j in 0..side {
                c[i * side + j] += aik * b[k * side + j];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_2x2_known_product() {
        let a = DenseMatrix::new(2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = DenseMatrix::new(2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        let c = multiply_naive(&a, &b).unwrap();
        assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_size_mismatch() {
        let a = DenseMatrix::zeros(2).unwrap();
        let b = DenseMatrix::zeros(3).unwrap();
        assert!(multiply_naive(&a, &b).is_err());
    }

    #[test]
    fn test_accumulate_adds_to_existing() {
        let a = vec![1.0, 0.0, 0.0, 1.0];
        let b = vec![1.0, 2.0, 3.0, 4.0];
        let mut c = vec![1.0; 4];
        matmul_ikj_accumulate(&a, &b, &mut c, 2);
        assert_eq!(c, vec![2.0, 3.0, 4.0, 5.0]);
    }
}
