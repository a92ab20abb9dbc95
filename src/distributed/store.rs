use crate::error::{MatbenchError, Result};
use std::collections::HashMap;
use std::fmt;

/// Coordinate of a block within the block grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockKey {
    pub row: usize,
    pub col: usize,
}

impl BlockKey {
    pub fn new(row: usize, col: usize) -> Self {
        BlockKey { row, col }
    }
}

// "bi,bj", the form string-keyed stores use.
impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Square tile of a larger matrix, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixBlock {
    key: BlockKey,
    side: usize,
    data: Vec<f64>,
}

impl MatrixBlock {
    pub fn new(key: BlockKey, side: usize, data: Vec<f64>) -> Result<Self> {
        if side == 0 || data.len() != side * side {
            return Err(MatbenchError::DimensionMismatch(format!(
                "block {} expects {}x{} values, got {}",
                key,
                side,
                side,
                data.len()
            )));
        }
        Ok(MatrixBlock { key, side, data })
    }

    pub fn key(&self) -> BlockKey {
        self.key
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }
}

/// Coordinate-keyed block storage.
///
/// The block-decomposition multiply only talks to this trait, so the same
/// code runs against [`LocalBlockStore`] or a client for a shared
/// cluster-wide map. Lifecycle (connecting, shutting down) belongs to
/// whoever constructs the store.
pub trait BlockStore {
    fn put(&mut self, key: BlockKey, block: MatrixBlock) -> Result<()>;

    fn get(&self, key: BlockKey) -> Result<Option<MatrixBlock>>;

    fn clear(&mut self) -> Result<()>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process [`BlockStore`] backed by a `HashMap`.
#[derive(Debug, Default, Clone)]
pub struct LocalBlockStore {
    blocks: HashMap<BlockKey, MatrixBlock>,
}

impl LocalBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remove(&mut self, key: BlockKey) -> Option<MatrixBlock> {
        self.blocks.remove(&key)
    }
}

impl BlockStore for LocalBlockStore {
    fn put(&mut self, key: BlockKey, block: MatrixBlock) -> Result<()> {
        self.blocks.insert(key, block);
        Ok(())
    }

    fn get(&self, key: BlockKey) -> Result<Option<MatrixBlock>> {
        Ok(self.blocks.get(&key).cloned())
    }

    fn clear(&mut self) -> Result<()> {
        self.blocks.clear();
        Ok(())
    }

    fn len(&self) -> usize {
        self.blocks.len()
    }
}
