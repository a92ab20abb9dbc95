use super::store::{BlockKey, BlockStore, MatrixBlock};
use crate::error::{MatbenchError, Result};
use crate::matrix::naive::matmul_ikj_accumulate;

/// Work order for one output block: `C[bi][bj] = Σ_bk A[bi][bk] * B[bk][bj]`.
///
/// Carries only coordinates, so it can be shipped to wherever the blocks
/// live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMultiplyTask {
    pub bi: usize,
    pub bj: usize,
    pub num_blocks: usize,
    pub block_size: usize,
}

impl BlockMultiplyTask {
    /// Reads the operand blocks from `a` and `b` and returns the product
    /// block.
    ///
    /// # Errors
    ///
    /// `IncompleteResult` if an operand block is missing.
    pub fn compute(&self, a: &dyn BlockStore, b: &dyn BlockStore) -> Result<MatrixBlock> {
        let side = self.block_size;
        let mut result = vec![0.0; side * side];

        for bk in 0..self.num_blocks {
            let a_blk = self.operand(a, BlockKey::new(self.bi, bk))?;
            let b_blk = self.operand(b, BlockKey::new(bk, self.bj))?;
            matmul_ikj_accumulate(a_blk.data(), b_blk.data(), &mut result, side);
        }

        MatrixBlock::new(BlockKey::new(self.bi, self.bj), side, result)
    }

    fn operand(&self, store: &dyn BlockStore, key: BlockKey) -> Result<MatrixBlock> {
        let block = store.get(key)?.ok_or(MatbenchError::IncompleteResult {
            missing: 1,
            total: self.num_blocks,
        })?;
        if block.side() != self.block_size {
            return Err(MatbenchError::DimensionMismatch(format!(
                "operand block {} has side {}, expected {}",
                key,
                block.side(),
                self.block_size
            )));
        }
        Ok(block)
    }
}

/// Runs block tasks somewhere and leaves each result in the `c` store.
///
/// A cluster client would submit the tasks to remote members; the local
/// executor computes them in process against the same stores.
pub trait BlockExecutor {
    fn execute(
        &self,
        tasks: &[BlockMultiplyTask],
        a: &dyn BlockStore,
        b: &dyn BlockStore,
        c: &mut dyn BlockStore,
    ) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalExecutor;

impl BlockExecutor for LocalExecutor {
    fn execute(
        &self,
        tasks: &[BlockMultiplyTask],
        a: &dyn BlockStore,
        b: &dyn BlockStore,
        c: &mut dyn BlockStore,
    ) -> Result<()> {
        for task in tasks {
            let block = task.compute(a, b)?;
            c.put(block.key(), block)?;
        }
        Ok(())
    }
}
