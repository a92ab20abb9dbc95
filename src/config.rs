//! Command-line configuration for the benchmark runner.

use crate::error::{MatbenchError, Result};
use crate::harness::HarnessConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, long_about = None)]
#[command(about = "Benchmark dense and sparse matrix multiplication strategies")]
pub struct Cli {
    /// Square matrix sizes to benchmark
    #[arg(long, value_delimiter = ',', default_value = "128,256,512,1024")]
    pub sizes: Vec<usize>,

    /// Measured runs per benchmark
    #[arg(long, default_value_t = 5)]
    pub runs: usize,

    /// Unmeasured warmup runs per benchmark
    #[arg(long, default_value_t = 1)]
    pub warmup: usize,

    /// Thread counts for the parallel strategies
    #[arg(long, value_delimiter = ',', default_value = "1,2,4,8")]
    pub threads: Vec<usize>,

    /// Tile side for the blocked strategies and the block multiply
    #[arg(long, default_value_t = 64)]
    pub block_size: usize,

    /// Fractions of zeros for the synthetic sparse matrices
    #[arg(long, value_delimiter = ',', default_value = "0.1,0.5,0.9")]
    pub densities: Vec<f64>,

    /// Side of the synthetic sparse matrices
    #[arg(long, default_value_t = 500)]
    pub sparse_size: usize,

    /// Coordinate-format file to benchmark sparse multiply on
    #[arg(long)]
    pub mtx: Option<PathBuf>,

    /// CSV file the results are written to
    #[arg(short, long, default_value = "data/rust_results.csv")]
    pub output: PathBuf,

    /// Seed for matrix generation
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl Cli {
    /// Rejects settings no benchmark could run with.
    pub fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(invalid("--runs must be at least 1"));
        }
        if self.block_size == 0 {
            return Err(invalid("--block-size must be at least 1"));
        }
        if self.sizes.contains(&0) {
            return Err(invalid("--sizes must all be at least 1"));
        }
        if self.threads.is_empty() || self.threads.contains(&0) {
            return Err(invalid("--threads must all be at least 1"));
        }
        if let Some(d) = self.densities.iter().find(|d| !(0.0..=1.0).contains(*d)) {
            return Err(MatbenchError::InvalidConfiguration(format!(
                "density {} is outside [0, 1]",
                d
            )));
        }
        Ok(())
    }

    pub fn harness_config(&self) -> HarnessConfig {
        HarnessConfig {
            runs: self.runs,
            warmup: self.warmup,
        }
    }
}

fn invalid(reason: &str) -> MatbenchError {
    MatbenchError::InvalidConfiguration(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("matbench").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.sizes, vec![128, 256, 512, 1024]);
        assert_eq!(cli.threads, vec![1, 2, 4, 8]);
        assert_eq!(cli.densities, vec![0.1, 0.5, 0.9]);
        assert_eq!((cli.runs, cli.warmup, cli.block_size), (5, 1, 64));
        assert_eq!(cli.sparse_size, 500);
        assert_eq!(cli.output, PathBuf::from("data/rust_results.csv"));
        assert!(cli.mtx.is_none());
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_comma_lists() {
        let cli = parse(&["--sizes", "4,8", "--threads", "3", "--densities", "0.25"]);
        assert_eq!(cli.sizes, vec![4, 8]);
        assert_eq!(cli.threads, vec![3]);
        assert_eq!(cli.densities, vec![0.25]);
    }

    #[test]
    fn test_validate_rejects() {
        assert!(parse(&["--runs", "0"]).validate().is_err());
        assert!(parse(&["--block-size", "0"]).validate().is_err());
        assert!(parse(&["--threads", "2,0"]).validate().is_err());
        assert!(parse(&["--densities", "0.5,1.5"]).validate().is_err());
        assert!(parse(&["--sizes", "0"]).validate().is_err());
    }
}
