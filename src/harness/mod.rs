//! Timing harness.
//!
//! Runs an operation a fixed number of warmup and measured iterations and
//! folds the measured ones into a [`BenchmarkResult`]. Wall time comes from
//! the monotonic clock; CPU time and memory come from a [`MetricsProbe`] so
//! that platforms without them report "unsupported" instead of zeros.

pub mod probe;
pub mod result;

pub use probe::{MetricsProbe, ProbeCapabilities, SystemProbe};
pub use result::{BenchmarkResult, RunSample};

use crate::error::{MatbenchError, Result};
use log::{debug, info};
use std::hint::black_box;
use std::time::Instant;

/// Iteration counts for every benchmark the harness runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessConfig {
    pub runs: usize,
    pub warmup: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig { runs: 5, warmup: 1 }
    }
}

pub struct BenchmarkHarness<P = SystemProbe> {
    probe: P,
    config: HarnessConfig,
}

impl<P: MetricsProbe> BenchmarkHarness<P> {
    /// # Errors
    ///
    /// `InvalidConfiguration` if `config.runs` is zero.
    pub fn new(probe: P, config: HarnessConfig) -> Result<Self> {
        if config.runs == 0 {
            return Err(MatbenchError::InvalidConfiguration(
                "at least one measured run is required".to_string(),
            ));
        }
        Ok(BenchmarkHarness { probe, config })
    }

    pub fn config(&self) -> HarnessConfig {
        self.config
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Benchmarks `op` under the name `name` for matrix size `size`.
    ///
    /// Calls `op` exactly `warmup + runs` times. Before each measured call
    /// the probe's garbage hook runs and a memory snapshot is taken. The
    /// operation's output is kept alive until the post-run snapshot, then
    /// dropped.
    ///
    /// # Errors
    ///
    /// The first error `op` returns, unchanged. Remaining iterations are
    /// skipped.
    pub fn run<T, F>(&self, name: &str, size: usize, mut op: F) -> Result<BenchmarkResult>
    where
        F: FnMut() -> Result<T>,
    {
        for _ in 0..self.config.warmup {
            black_box(op()?);
        }

        let mut samples = Vec::with_capacity(self.config.runs);
        for run in 0..self.config.runs {
            self.probe.collect_garbage();
            let mem_before = self.probe.memory_snapshot();
            let cpu_before = self.probe.thread_cpu_time();

            let start = Instant::now();
            let output = black_box(op()?);
            let wall = start.elapsed();

            let cpu_after = self.probe.thread_cpu_time();
            let mem_after = self.probe.memory_snapshot();
            drop(output);

            let cpu = match (cpu_before, cpu_after) {
                (Some(before), Some(after)) => Some(after.saturating_sub(before)),
                _ => None,
            };
            let delta_kb = match (mem_before, mem_after) {
                (Some(before), Some(after)) => Some(after.saturating_sub(before) / 1024),
                _ => None,
            };
            debug!(
                "[{}] run {}: {:.6} s (wall) | {} (CPU) | mem {}",
                name,
                run + 1,
                wall.as_secs_f64(),
                cpu.map_or("unsupported".to_string(), |c| format!("{:.6} s", c.as_secs_f64())),
                delta_kb.map_or("unsupported".to_string(), |kb| format!("{} KB", kb)),
            );

            samples.push(RunSample {
                wall,
                cpu,
                memory_bytes: mem_after,
            });
        }

        let result = BenchmarkResult::from_samples(name, size, samples);
        info!(
            "average [{}] n={}: {:.6} s (wall), {} (CPU), peak memory {}",
            name,
            size,
            result.avg_wall_secs(),
            result
                .avg_cpu_secs()
                .map_or("unsupported".to_string(), |c| format!("{:.6} s", c)),
            result
                .peak_memory_kb()
                .map_or("unsupported".to_string(), |kb| format!("{} KB", kb)),
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Duration;

    /// Counts hook calls and hands out scripted readings.
    #[derive(Default)]
    struct FakeProbe {
        gc_calls: Cell<usize>,
        memory: Cell<u64>,
    }

    impl MetricsProbe for FakeProbe {
        fn capabilities(&self) -> ProbeCapabilities {
            ProbeCapabilities {
                cpu_time: false,
                memory: true,
            }
        }

        fn thread_cpu_time(&self) -> Option<Duration> {
            None
        }

        fn memory_snapshot(&self) -> Option<u64> {
            self.memory.set(self.memory.get() + 2048);
            Some(self.memory.get())
        }

        fn collect_garbage(&self) {
            self.gc_calls.set(self.gc_calls.get() + 1);
        }
    }

    #[test]
    fn test_zero_runs_rejected() {
        let config = HarnessConfig { runs: 0, warmup: 1 };
        assert!(BenchmarkHarness::new(FakeProbe::default(), config).is_err());
    }

    #[test]
    fn test_call_counts() {
        let harness =
            BenchmarkHarness::new(FakeProbe::default(), HarnessConfig { runs: 5, warmup: 1 })
                .unwrap();
        let mut calls = 0;
        let result = harness
            .run("x", 4, || {
                calls += 1;
                Ok(calls)
            })
            .unwrap();
        assert_eq!(calls, 6);
        assert_eq!(result.samples().len(), 5);
        assert_eq!(harness.probe().gc_calls.get(), 5);
    }

    #[test]
    fn test_unsupported_cpu_is_none() {
        let harness =
            BenchmarkHarness::new(FakeProbe::default(), HarnessConfig { runs: 2, warmup: 0 })
                .unwrap();
        let result = harness.run("x", 1, || Ok(())).unwrap();
        assert_eq!(result.avg_cpu_secs(), None);
        // Two snapshots per run, 2 KB each: the last one is 8 KB.
        assert_eq!(result.peak_memory_kb(), Some(8));
    }

    #[test]
    fn test_operation_error_propagates() {
        let harness =
            BenchmarkHarness::new(FakeProbe::default(), HarnessConfig { runs: 3, warmup: 0 })
                .unwrap();
        let mut calls = 0;
        let err = harness
            .run("x", 1, || -> Result<()> {
                calls += 1;
                Err(MatbenchError::InvalidConfiguration("nope".to_string()))
            })
            .unwrap_err();
        assert!(matches!(err, MatbenchError::InvalidConfiguration(_)));
        assert_eq!(calls, 1);
    }
}
