//! Block-decomposition multiply over a coordinate-keyed block store.
//!
//! The multiply runs in three phases:
//!
//! 1. scatter: cut A and B into `block_size` tiles and store each under its
//!    `(bi, bj)` key
//! 2. compute: one [`BlockMultiplyTask`] per output block, handed to a
//!    [`BlockExecutor`]
//! 3. gather: read every `(bi, bj)` result back and reassemble C
//!
//! Stores and executor are passed in by the caller. Nothing here knows
//! whether they are in-process or backed by a cluster.

pub mod decompose;
pub mod executor;
pub mod store;

pub use decompose::{Completeness, blocks_per_side, extract_block, gather, scatter};
pub use executor::{BlockExecutor, BlockMultiplyTask, LocalExecutor};
pub use store::{BlockKey, BlockStore, LocalBlockStore, MatrixBlock};

use crate::error::Result;
use crate::matrix::{DenseMatrix, check_operands};
use log::{debug, info};
use std::time::{Duration, Instant};

/// The three maps the multiply works with: operands A and B, result C.
#[derive(Debug, Default, Clone)]
pub struct DistributedStores<S> {
    pub a: S,
    pub b: S,
    pub c: S,
}

impl<S: BlockStore> DistributedStores<S> {
    pub fn new(a: S, b: S, c: S) -> Self {
        DistributedStores { a, b, c }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.a.clear()?;
        self.b.clear()?;
        self.c.clear()
    }
}

impl DistributedStores<LocalBlockStore> {
    pub fn local() -> Self {
        Self::default()
    }
}

/// Cost breakdown of one block-decomposition multiply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferReport {
    /// Operand blocks written (A and B together).
    pub blocks_scattered: usize,
    /// Approximate payload of the scatter phase, 8 bytes per value.
    pub bytes_transferred: u64,
    pub result_blocks: usize,
    pub distribution: Duration,
    pub compute: Duration,
    pub gather: Duration,
}

/// Multiplies `a` and `b` by block decomposition through `stores`.
///
/// The stores are cleared first so blocks from an earlier size cannot leak
/// into this result.
///
/// # Errors
///
/// `InvalidConfiguration` unless `block_size` divides `n`;
/// `IncompleteResult` if the executor left any result block unwritten;
/// store and executor errors as they come.
pub fn multiply_distributed<S, E>(
    a: &DenseMatrix,
    b: &DenseMatrix,
    block_size: usize,
    stores: &mut DistributedStores<S>,
    executor: &E,
) -> Result<(DenseMatrix, TransferReport)>
where
    S: BlockStore,
    E: BlockExecutor + ?Sized,
{
    let n = check_operands(a, b)?;
    let num_blocks = blocks_per_side(n, block_size)?;
    stores.clear()?;

    let start = Instant::now();
    let blocks_scattered = scatter(a, block_size, &mut stores.a)? + scatter(b, block_size, &mut stores.b)?;
    let distribution = start.elapsed();
    let bytes_transferred = (blocks_scattered * block_size * block_size * size_of::<f64>()) as u64;
    debug!(
        "scattered {} blocks ({:.3} MB) in {:?}",
        blocks_scattered,
        bytes_transferred as f64 / 1_000_000.0,
        distribution
    );

    let tasks: Vec<BlockMultiplyTask> = (0..num_blocks)
        .flat_map(|bi| {
            (0..num_blocks).map(move |bj| BlockMultiplyTask {
                bi,
                bj,
                num_blocks,
                block_size,
            })
        })
        .collect();

    let start = Instant::now();
    executor.execute(&tasks, &stores.a, &stores.b, &mut stores.c)?;
    let compute = start.elapsed();
    debug!("computed {} result blocks in {:?}", tasks.len(), compute);

    let start = Instant::now();
    let result_blocks = stores.c.len();
    let c = gather(&stores.c, n, block_size, Completeness::Required)?;
    let report = TransferReport {
        blocks_scattered,
        bytes_transferred,
        result_blocks,
        distribution,
        compute,
        gather: start.elapsed(),
    };
    info!(
        "block multiply n={} block={}: distribution {:?}, compute {:?}, gather {:?}, {:.3} MB moved",
        n,
        block_size,
        report.distribution,
        report.compute,
        report.gather,
        report.bytes_transferred as f64 / 1_000_000.0
    );
    Ok((c, report))
}
