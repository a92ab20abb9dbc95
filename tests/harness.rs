use approx::assert_relative_eq;
use matbench::harness::{HarnessConfig, RunSample};
use matbench::sink::CSV_HEADER;
use matbench::threaded::pool::{WorkerTask, run_tasks};
use matbench::{
    BenchmarkHarness, BenchmarkResult, CsvSink, MatbenchError, MatrixFactory, MetricsProbe,
    ResultSink, SystemProbe, multiply_naive,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn sample(wall_ms: u64, cpu_ms: Option<u64>, mem_kb: Option<u64>) -> RunSample {
    RunSample {
        wall: Duration::from_millis(wall_ms),
        cpu: cpu_ms.map(Duration::from_millis),
        memory_bytes: mem_kb.map(|kb| kb * 1024),
    }
}

// ============================================================
// Harness
// ============================================================

#[test]
fn test_run_counts_calls() {
    let harness = BenchmarkHarness::new(SystemProbe::new(), HarnessConfig { runs: 5, warmup: 1 }).unwrap();
    let mut factory = MatrixFactory::new(1);
    let a = factory.dense(16).unwrap();
    let b = factory.dense(16).unwrap();

    let mut calls = 0;
    let result = harness
        .run("x", 16, || {
            calls += 1;
            multiply_naive(&a, &b)
        })
        .unwrap();

    assert_eq!(calls, 6);
    assert_eq!(result.samples().len(), 5);
    assert_eq!(result.strategy(), "x");
    assert_eq!(result.size(), 16);
    assert!(result.avg_wall_secs() >= 0.0);
}

#[test]
fn test_system_probe_matches_capabilities() {
    let probe = SystemProbe::new();
    let caps = probe.capabilities();
    assert_eq!(caps.cpu_time, probe.thread_cpu_time().is_some());
    assert_eq!(caps.memory, probe.memory_snapshot().is_some());

    let harness = BenchmarkHarness::new(probe, HarnessConfig { runs: 2, warmup: 0 }).unwrap();
    let result = harness.run("x", 1, || Ok(())).unwrap();
    assert_eq!(result.avg_cpu_secs().is_some(), caps.cpu_time);
    assert_eq!(result.peak_memory_kb().is_some(), caps.memory);
}

#[test]
fn test_averages_and_peak() {
    let r = BenchmarkResult::from_samples(
        "Basic",
        64,
        vec![
            sample(100, Some(90), Some(300)),
            sample(200, Some(180), Some(500)),
            sample(300, Some(270), Some(400)),
        ],
    );
    assert_relative_eq!(r.avg_wall_secs(), 0.2, epsilon = 1e-12);
    assert_relative_eq!(r.avg_cpu_secs().unwrap(), 0.18, epsilon = 1e-12);
    assert_eq!(r.peak_memory_kb(), Some(500));
}

#[test]
fn test_cpu_unsupported_if_any_sample_lacks_it() {
    let r = BenchmarkResult::from_samples(
        "Basic",
        64,
        vec![sample(100, Some(90), None), sample(100, None, None)],
    );
    assert_eq!(r.avg_cpu_secs(), None);
    assert_eq!(r.peak_memory_kb(), None);
}

#[test]
fn test_speedup_and_efficiency() {
    let base = BenchmarkResult::from_samples("Basic", 64, vec![sample(800, None, None)]);
    let r = BenchmarkResult::from_samples("ParallelRows_4t", 64, vec![sample(200, None, None)])
        .with_strategy("ParallelRows")
        .with_baseline(&base)
        .with_threads(4);
    assert_eq!(r.strategy(), "ParallelRows");
    assert_relative_eq!(r.speedup().unwrap(), 4.0);
    assert_relative_eq!(r.efficiency().unwrap(), 1.0);

    let single = BenchmarkResult::from_samples("Blocked", 64, vec![sample(400, None, None)])
        .with_baseline(&base);
    assert_relative_eq!(single.speedup().unwrap(), 2.0);
    assert_eq!(single.efficiency(), None);
    assert_eq!(single.threads(), None);
}

// ============================================================
// Worker pool failures
// ============================================================

struct Job<'a> {
    fail: bool,
    done: &'a AtomicUsize,
}

impl WorkerTask for Job<'_> {
    fn run(self) -> matbench::Result<()> {
        self.done.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            panic!("job exploded");
        }
        Ok(())
    }
}

#[test]
fn test_one_failing_worker_one_error() {
    let done = AtomicUsize::new(0);
    let tasks: Vec<Job> = (0..12)
        .map(|i| Job {
            fail: i == 7,
            done: &done,
        })
        .collect();

    let err = run_tasks(tasks, 4).unwrap_err();
    match err {
        MatbenchError::ComputationFailed { failed, total, .. } => {
            assert_eq!(failed, 1);
            assert_eq!(total, 12);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(done.load(Ordering::SeqCst), 12);
}

#[test]
fn test_pool_failure_inside_harness_stops_the_run() {
    let harness = BenchmarkHarness::new(SystemProbe::new(), HarnessConfig { runs: 3, warmup: 0 }).unwrap();
    let done = AtomicUsize::new(0);
    let mut calls = 0;

    let err = harness
        .run("BlockedParallel_4t", 8, || {
            calls += 1;
            let tasks: Vec<Job> = (0..6)
                .map(|i| Job {
                    fail: i == 2,
                    done: &done,
                })
                .collect();
            run_tasks(tasks, 4)
        })
        .unwrap_err();

    assert!(matches!(
        err,
        MatbenchError::ComputationFailed {
            failed: 1,
            total: 6,
            ..
        }
    ));
    assert_eq!(calls, 1);
    assert_eq!(done.load(Ordering::SeqCst), 6);
}

// ============================================================
// CSV output
// ============================================================

#[test]
fn test_csv_file_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("results.csv");

    let base = BenchmarkResult::from_samples("Basic", 128, vec![sample(500, Some(500), Some(2048))]);
    let base = base.with_threads(1);
    let rows = BenchmarkResult::from_samples("BlockedParallel", 128, vec![sample(250, None, None)])
        .with_threads(2)
        .with_baseline(&base)
        .with_note("block_size=64");

    let mut sink = CsvSink::create(&path).unwrap();
    sink.write(&base).unwrap();
    sink.write(&rows).unwrap();
    sink.flush().unwrap();
    drop(sink);

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            CSV_HEADER,
            "Basic,128,0.500000,0.500000,2048,1,,,",
            "BlockedParallel,128,0.250000,,,2,2.000,1.000,block_size=64",
        ]
    );
}

#[test]
fn test_note_with_comma_is_quoted() {
    let r = BenchmarkResult::from_samples("Sparse", 10, vec![sample(1, None, None)])
        .with_note("a,b");
    let mut sink = CsvSink::new(Vec::new()).unwrap();
    sink.write(&r).unwrap();
    let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    assert_eq!(text.lines().nth(1), Some("Sparse,10,0.001000,,,,,,\"a,b\""));
}

#[test]
fn test_vec_sink_collects() {
    let mut sink: Vec<BenchmarkResult> = Vec::new();
    let r = BenchmarkResult::from_samples("Basic", 4, vec![sample(1, None, None)]);
    sink.write(&r).unwrap();
    sink.write(&r).unwrap();
    assert_eq!(sink.len(), 2);
}
