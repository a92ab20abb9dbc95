//! Cache-blocked and recursive dense multiplication.
//!
//! Available implementations:
//! - `tiled`: six-loop tiling of the i/j/k space into cubes of `block_size`
//! - `strassen`: recursive divide-and-conquer with seven products per level

pub mod strassen;
pub mod tiled;
