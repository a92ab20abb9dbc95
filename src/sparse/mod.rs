//! Compressed sparse row matrices.
//!
//! - `csr`: the storage type, triplet construction and sparse × dense-vector
//!   multiplies (serial and parallel)
//! - `market`: parser for the plain-text coordinate interchange format
//! - `synthetic`: random matrices at a target fraction of zeros
//! - `buffer`: the doubling buffer the generator fills

pub mod buffer;
pub mod csr;
pub mod market;
pub mod synthetic;

pub use csr::CsrMatrix;
pub use market::{load_market, parse_market};
pub use synthetic::generate_synthetic;
