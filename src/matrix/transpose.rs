use super::{DenseMatrix, check_operands};
use crate::error::Result;

/// Transpose a square matrix: dst = src^T
///
/// After transpose, what was column j of src becomes row j of dst.
///
/// # Example
///
/// ```
/// use matbench::matrix::transpose::transpose;
///
/// let src = vec![1.0, 2.0,
///                3.0, 4.0];
/// let mut dst = vec![0.0; 4];
///
/// transpose(&src, &mut dst, 2);
///
/// assert_eq!(dst, vec![1.0, 3.0,
///                      2.0, 4.0]);
/// ```
pub fn transpose(src: &[f64], dst: &mut [f64], n: usize) {
    for i in 0..n {
        for j in 0..n {
            dst[j * n + i] = src[i * n + j];
        }
    }
}

/// Multiplication with a pre-transposed B.
///
/// B is transposed once up front, so `C[i][j]` becomes the dot product of
/// row i of A and row j of B^T. Both reads are sequential, which lets the
/// compiler vectorize the inner loop. Same result as naive within rounding.
pub fn multiply_vectorized(a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
    let n = check_operands(a, b)?;
    let mut bt = vec![0.0; n * n];
    transpose(b.as_slice(), &mut bt, n);

    let mut c = vec![0.0; n * n];
    for (i, c_row) in c.chunks_exact_mut(n).enumerate() {
        let a_row = a.row(i);
        for (j, out) in c_row.iter_mut().enumerate() {
            *out = dot(a_row, &bt[j * n..(j + 1) * n]);
        }
    }
    DenseMatrix::new(n, c)
}

// Four independent accumulators so the adds don't serialize on one register.
fn dot(x: &[f64], y: &[f64]) -> f64 {
    let mut acc = [0.0f64; 4];
    let mut xs = x.chunks_exact(4);
    let mut ys = y.chunks_exact(4);
    for (xc, yc) in (&mut xs).zip(&mut ys) {
        acc[0] += xc[0] * yc[0];
        acc[1] += xc[1] * yc[1];
        acc[2] += xc[2] * yc[2];
        acc[3] += xc[3] * yc[3];
    }
    let tail: f64 = xs
        .remainder()
        .iter()
        .zip(ys.remainder())
        .map(|(p, q)| p * q)
        .sum();
    (acc[0] + acc[1]) + (acc[2] + acc[3]) + tail
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_handles_remainder() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [1.0; 6];
        assert_eq!(dot(&x, &y), 21.0);
    }

    #[test]
    fn test_vectorized_known_product() {
        let a = DenseMatrix::new(2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = DenseMatrix::new(2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        let c = multiply_vectorized(&a, &b).unwrap();
        assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    }
}
