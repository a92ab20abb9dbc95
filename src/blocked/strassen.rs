//! Strassen's recursive multiplication.
//!
//! Each level splits both operands into four quadrants and replaces the
//! eight quadrant products of the textbook recursion with seven:
//!
//! ```text
//! M1 = (A11 + A22)(B11 + B22)      C11 = M1 + M4 - M5 + M7
//! M2 = (A21 + A22) B11             C12 = M3 + M5
//! M3 = A11 (B12 - B22)             C21 = M2 + M4
//! M4 = A22 (B21 - B11)             C22 = M1 + M3 - M2 + M6
//! M5 = (A11 + A12) B22
//! M6 = (A21 - A11)(B11 + B12)
//! M7 = (A12 - A22)(B21 + B22)
//! ```
//!
//! Recursion runs all the way down to 1×1, so this is slow in practice. It
//! is here to be measured, not to be fast.

use crate::error::{MatbenchError, Result};
use crate::matrix::{DenseMatrix, check_operands};

pub fn is_power_of_two(n: usize) -> bool {
    n != 0 && (n & (n - 1)) == 0
}

/// Recursive Strassen multiply.
///
/// # Errors
///
/// `UnsupportedDimension` unless `n` is a power of two. Callers that sweep
/// arbitrary sizes should check [`is_power_of_two`] first.
pub fn multiply_strassen(a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
    let n = check_operands(a, b)?;
    if !is_power_of_two(n) {
        return Err(MatbenchError::UnsupportedDimension { n });
    }
    DenseMatrix::new(n, strassen(a.as_slice(), b.as_slice(), n))
}

fn strassen(a: &[f64], b: &[f64], n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![a[0] * b[0]];
    }
    let mid = n / 2;

    let [a11, a12, a21, a22] = split(a, n);
    let [b11, b12, b21, b22] = split(b, n);

    let m1 = strassen(&add(&a11, &a22), &add(&b11, &b22), mid);
    let m2 = strassen(&add(&a21, &a22), &b11, mid);
    let m3 = strassen(&a11, &sub(&b12, &b22), mid);
    let m4 = strassen(&a22, &sub(&b21, &b11), mid);
    let m5 = strassen(&add(&a11, &a12), &b22, mid);
    let m6 = strassen(&sub(&a21, &a11), &add(&b11, &b12), mid);
    let m7 = strassen(&sub(&a12, &a22), &add(&b21, &b22), mid);

    let c11 = add(&sub(&add(&m1, &m4), &m5), &m7);
    let c12 = add(&m3, &m5);
    let c21 = add(&m2, &m4);
    let c22 = add(&sub(&add(&m1, &m3), &m2), &m6);

    join(&c11, &c12, &c21, &c22, mid)
}

// Quadrants in order [11, 12, 21, 22].
fn split(m: &[f64], n: usize) -> [Vec<f64>; 4] {
    let mid = n / 2;
    let quadrant = |row0: usize, col0: usize| {
        let mut q = Vec::with_capacity(mid * mid);
        for i in row0..row0 + mid {
            q.extend_from_slice(&m[i * n + col0..i * n + col0 + mid]);
        }
        q
    };
    [
        quadrant(0, 0),
        quadrant(0, mid),
        quadrant(mid, 0),
        quadrant(mid, mid),
    ]
}

fn join(c11: &[f64], c12: &[f64], c21: &[f64], c22: &[f64], mid: usize) -> Vec<f64> {
    let n = mid * 2;
    let mut c = vec![0.0; n * n];
    for i in 0..mid {
        let src = i * mid..(i + 1) * mid;
        c[i * n..i * n + mid].copy_from_slice(&c11[src.clone()]);
        c[i * n + mid..(i + 1) * n].copy_from_slice(&c12[src.clone()]);
        c[(i + mid) * n..(i + mid) * n + mid].copy_from_slice(&c21[src.clone()]);
        c[(i + mid) * n + mid..(i + mid + 1) * n].copy_from_slice(&c22[src]);
    }
    c
}

fn add(x: &[f64], y: &[f64]) -> Vec<f64> {
    x.iter().zip(y).map(|(p, q)| p + q).collect()
}

fn sub(x: &[f64], y: &[f64]) -> Vec<f64> {
    x.iter().zip(y).map(|(p, q)| p - q).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_of_two() {
        assert!(is_power_of_two(1));
        assert!(is_power_of_two(64));
        assert!(!is_power_of_two(0));
        assert!(!is_power_of_two(48));
    }

    #[test]
    fn test_split_join_roundtrip() {
        let m: Vec<f64> = (0..16).map(|i| i as f64).collect();
        let [q11, q12, q21, q22] = split(&m, 4);
        assert_eq!(q12, vec![2.0, 3.0, 6.0, 7.0]);
        assert_eq!(join(&q11, &q12, &q21, &q22, 2), m);
    }

    #[test]
    fn test_rejects_odd_size() {
        let a = DenseMatrix::identity(3).unwrap();
        assert!(matches!(
            multiply_strassen(&a, &a),
            Err(MatbenchError::UnsupportedDimension { n: 3 })
        ));
    }

    #[test]
    fn test_2x2() {
        let a = DenseMatrix::new(2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = DenseMatrix::new(2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        let c = multiply_strassen(&a, &b).unwrap();
        assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    }
}
