//! Dense and sparse matrix multiplication, measured side by side.
//!
//! Each strategy computes the same product of two square matrices, so the
//! interesting part is how long each one takes, how much CPU it burns and
//! how much memory it holds while doing it. The [`harness`] measures that
//! and [`sink`] writes it out as CSV.
//!
//! ## Usage
//!
//! ```
//! use matbench::{DenseMatrix, multiply_blocked, multiply_naive};
//!
//! let a = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
//! let b = DenseMatrix::from_rows(&[vec![5.0, 6.0], vec![7.0, 8.0]]).unwrap();
//!
//! let c = multiply_naive(&a, &b).unwrap();
//! assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
//! assert_eq!(multiply_blocked(&a, &b, 64).unwrap(), c);
//! ```
//!
//! Benchmarking a strategy:
//!
//! ```
//! use matbench::{BenchmarkHarness, MatrixFactory, SystemProbe, multiply_parallel_rows};
//! use matbench::harness::HarnessConfig;
//!
//! let mut factory = MatrixFactory::new(7);
//! let a = factory.dense(32).unwrap();
//! let b = factory.dense(32).unwrap();
//!
//! let harness = BenchmarkHarness::new(SystemProbe::new(), HarnessConfig { runs: 2, warmup: 0 }).unwrap();
//! let result = harness
//!     .run("ParallelRows", 32, || multiply_parallel_rows(&a, &b, 4))
//!     .unwrap()
//!     .with_threads(4);
//! assert_eq!(result.samples().len(), 2);
//! ```
//!
//! ## What's inside
//!
//! - naive i-j-k, cache-tiled, Strassen, transposed "vectorized" multiply
//! - row-partitioned and band-partitioned multi-threaded multiply
//! - CSR sparse matrix-vector multiply, synthetic and file-loaded
//! - block-decomposition multiply over pluggable block stores

pub mod blocked;
pub mod config;
pub mod distributed;
pub mod error;
pub mod harness;
pub mod matrix;
pub mod sink;
pub mod sparse;
pub mod threaded;

pub use blocked::strassen::{is_power_of_two, multiply_strassen};
pub use blocked::tiled::multiply_blocked;
pub use distributed::{DistributedStores, LocalExecutor, multiply_distributed};
pub use error::{MatbenchError, Result};
pub use harness::{BenchmarkHarness, BenchmarkResult, MetricsProbe, SystemProbe};
pub use matrix::naive::multiply_naive;
pub use matrix::transpose::multiply_vectorized;
pub use matrix::{DenseMatrix, MatrixFactory};
pub use sink::{CsvSink, ResultSink};
pub use sparse::CsrMatrix;
pub use threaded::blocks::multiply_blocked_parallel;
pub use threaded::rows::multiply_parallel_rows;
