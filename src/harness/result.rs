use std::time::Duration;

/// One measured iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSample {
    pub wall: Duration,
    /// `None` when the probe cannot read thread CPU time.
    pub cpu: Option<Duration>,
    /// Memory snapshot right after the run, `None` when unsupported.
    pub memory_bytes: Option<u64>,
}

/// Aggregated measurements for one (strategy, size) pair.
///
/// Built from samples by the harness. The derived fields are filled in with
/// the consuming `with_*` methods; a field that does not apply stays `None`
/// rather than zero.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResult {
    strategy: String,
    size: usize,
    avg_wall_secs: f64,
    avg_cpu_secs: Option<f64>,
    peak_memory_kb: Option<u64>,
    samples: Vec<RunSample>,
    threads: Option<usize>,
    speedup: Option<f64>,
    efficiency: Option<f64>,
    note: Option<String>,
}

impl BenchmarkResult {
    /// Mean wall and CPU time over `samples`, peak (max) memory.
    ///
    /// CPU time is only reported when every sample has it.
    pub fn from_samples(strategy: impl Into<String>, size: usize, samples: Vec<RunSample>) -> Self {
        let runs = samples.len().max(1) as f64;
        let avg_wall_secs = samples.iter().map(|s| s.wall.as_secs_f64()).sum::<f64>() / runs;

        let cpu: Option<Vec<Duration>> = samples.iter().map(|s| s.cpu).collect();
        let avg_cpu_secs = cpu
            .filter(|c| !c.is_empty())
            .map(|c| c.iter().map(Duration::as_secs_f64).sum::<f64>() / runs);

        let peak_memory_kb = samples.iter().filter_map(|s| s.memory_bytes).max().map(|b| b / 1024);

        BenchmarkResult {
            strategy: strategy.into(),
            size,
            avg_wall_secs,
            avg_cpu_secs,
            peak_memory_kb,
            samples,
            threads: None,
            speedup: None,
            efficiency: None,
            note: None,
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self.efficiency = self.speedup.map(|s| s / threads as f64);
        self
    }

    /// Sets `speedup = baseline.avg_wall / self.avg_wall`, and
    /// `efficiency = speedup / threads` when a thread count is known.
    pub fn with_baseline(mut self, baseline: &BenchmarkResult) -> Self {
        if self.avg_wall_secs > 0.0 {
            let speedup = baseline.avg_wall_secs / self.avg_wall_secs;
            self.speedup = Some(speedup);
            self.efficiency = self.threads.map(|t| speedup / t as f64);
        }
        self
    }

    /// Renames the row, e.g. `ParallelRows_4t` is reported as `ParallelRows`
    /// once the thread count has its own column.
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = strategy.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn avg_wall_secs(&self) -> f64 {
        self.avg_wall_secs
    }

    pub fn avg_cpu_secs(&self) -> Option<f64> {
        self.avg_cpu_secs
    }

    pub fn peak_memory_kb(&self) -> Option<u64> {
        self.peak_memory_kb
    }

    pub fn samples(&self) -> &[RunSample] {
        &self.samples
    }

    pub fn threads(&self) -> Option<usize> {
        self.threads
    }

    pub fn speedup(&self) -> Option<f64> {
        self.speedup
    }

    pub fn efficiency(&self) -> Option<f64> {
        self.efficiency
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}
