use super::buffer::GrowableBuffer;
use super::csr::CsrMatrix;
use crate::error::{MatbenchError, Result};
use rand::Rng;

/// Random sparse matrix where `density` is the fraction of explicit zeros.
///
/// Every one of the `rows * cols` cells is kept independently with
/// probability `1 - density` and given a nonzero value in
/// `[f64::MIN_POSITIVE, 1)`. Storage is sized from the expected count and
/// doubles if the draw overshoots it, then is trimmed to the exact count.
///
/// # Errors
///
/// `InvalidConfiguration` if `density` is not in `[0, 1]`.
pub fn generate_synthetic<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    density: f64,
    rng: &mut R,
) -> Result<CsrMatrix> {
    if !(0.0..=1.0).contains(&density) {
        return Err(MatbenchError::InvalidConfiguration(format!(
            "density must be within [0, 1], got {}",
            density
        )));
    }

    let estimate = ((1.0 - density) * (rows * cols) as f64) as usize;
    let mut col_ind = GrowableBuffer::with_capacity(estimate);
    let mut values = GrowableBuffer::with_capacity(estimate);
    let mut row_ptr = Vec::with_capacity(rows + 1);

    for _ in 0..rows {
        row_ptr.push(col_ind.len());
        for j in 0..cols {
            if rng.gen_range(0.0..1.0) >= density {
                col_ind.push(j);
                values.push(rng.gen_range(f64::MIN_POSITIVE..1.0));
            }
        }
    }
    row_ptr.push(col_ind.len());

    CsrMatrix::from_parts(rows, cols, row_ptr, col_ind.trim(), values.trim())
}
