//! Partition a matrix into blocks and put it back together.

use super::store::{BlockKey, BlockStore, MatrixBlock};
use crate::error::{MatbenchError, Result};
use crate::matrix::DenseMatrix;

/// What [`gather`] does about blocks missing from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completeness {
    /// Every block must be present.
    Required,
    /// Missing blocks are left as zeros.
    Partial,
}

/// Number of blocks per side. `block_size` must be positive and divide `n`.
pub fn blocks_per_side(n: usize, block_size: usize) -> Result<usize> {
    if block_size == 0 || n % block_size != 0 {
        return Err(MatbenchError::InvalidConfiguration(format!(
            "block size {} must be positive and divide the matrix size {}",
            block_size, n
        )));
    }
    Ok(n / block_size)
}

/// Copies block `(bi, bj)` of side `block_size` out of `m`.
pub fn extract_block(m: &DenseMatrix, bi: usize, bj: usize, block_size: usize) -> Result<MatrixBlock> {
    let num_blocks = blocks_per_side(m.size(), block_size)?;
    if bi >= num_blocks || bj >= num_blocks {
        return Err(MatbenchError::InvalidIndex {
            row: bi,
            col: bj,
            rows: num_blocks,
            cols: num_blocks,
        });
    }

    let row_start = bi * block_size;
    let col_start = bj * block_size;
    let mut data = Vec::with_capacity(block_size * block_size);
    for i in row_start..row_start + block_size {
        data.extend_from_slice(&m.row(i)[col_start..col_start + block_size]);
    }
    MatrixBlock::new(BlockKey::new(bi, bj), block_size, data)
}

/// Writes every block of `m` into `store` under its coordinate key and
/// returns how many were written.
pub fn scatter(m: &DenseMatrix, block_size: usize, store: &mut dyn BlockStore) -> Result<usize> {
    let num_blocks = blocks_per_side(m.size(), block_size)?;
    for bi in 0..num_blocks {
        for bj in 0..num_blocks {
            let block = extract_block(m, bi, bj, block_size)?;
            store.put(block.key(), block)?;
        }
    }
    Ok(num_blocks * num_blocks)
}

/// Rebuilds an `n × n` matrix from the blocks in `store`.
///
/// # Errors
///
/// `IncompleteResult` in [`Completeness::Required`] mode if any block is
/// absent. `DimensionMismatch` if a stored block has the wrong side.
pub fn gather(
    store: &dyn BlockStore,
    n: usize,
    block_size: usize,
    completeness: Completeness,
) -> Result<DenseMatrix> {
    let num_blocks = blocks_per_side(n, block_size)?;
    let mut c = DenseMatrix::zeros(n)?;
    let out = c.as_mut_slice();
    let mut missing = 0;

    for bi in 0..num_blocks {
        for bj in 0..num_blocks {
            let key = BlockKey::new(bi, bj);
            let Some(block) = store.get(key)? else {
                missing += 1;
                continue;
            };
            if block.side() != block_size {
                return Err(MatbenchError::DimensionMismatch(format!(
                    "block {} has side {}, expected {}",
                    key,
                    block.side(),
                    block_size
                )));
            }
            for i in 0..block_size {
                let dst = (bi * block_size + i) * n + bj * block_size;
                out[dst..dst + block_size]
                    .copy_from_slice(&block.data()[i * block_size..(i + 1) * block_size]);
            }
        }
    }

    if missing > 0 && completeness == Completeness::Required {
        return Err(MatbenchError::IncompleteResult {
            missing,
            total: num_blocks * num_blocks,
        });
    }
    Ok(c)
}
