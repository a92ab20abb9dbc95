//! Multi-threaded strategies and the worker pool they share.
//!
//! Every parallel call here builds its own pool, hands each task a disjoint
//! `&mut` region of the output, and joins all workers before returning.
//! Inputs are shared read-only, so no locks guard the output.
//!
//! Available implementations:
//! - `rows`: output rows split evenly across `thread_count` tasks
//! - `blocks`: block-row bands of the tiled multiply pulled by a fixed pool
//! - `pool`: the pool itself, also used by the sparse multiply

pub mod blocks;
pub mod pool;
pub mod rows;

use crate::error::{MatbenchError, Result};
use std::ops::Range;

pub(crate) fn check_thread_count(thread_count: usize) -> Result<()> {
    if thread_count == 0 {
        return Err(MatbenchError::InvalidConfiguration(
            "thread count must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Splits `0..len` into at most `parts` contiguous ranges whose lengths
/// differ by at most one. Empty ranges are dropped.
pub fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.max(1);
    let base = len / parts;
    let extra = len % parts;

    let mut ranges = Vec::with_capacity(parts);
    let mut start = 0;
    for p in 0..parts {
        let size = base + usize::from(p < extra);
        if size == 0 {
            break;
        }
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}

/// Cuts `out` into one mutable slice per range, `width` elements per row.
/// Ranges must be contiguous and start at zero.
pub(crate) fn split_rows<'a>(
    out: &'a mut [f64],
    width: usize,
    ranges: &[Range<usize>],
) -> Vec<&'a mut [f64]> {
    let mut rest = out;
    let mut pieces = Vec::with_capacity(ranges.len());
    for range in ranges {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * width);
        pieces.push(head);
        rest = tail;
    }
    pieces
}
