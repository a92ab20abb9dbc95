//! Benchmark runner for the multiplication strategies.

use clap::Parser;
use log::{error, info, warn};
use matbench::config::Cli;
use matbench::distributed::{DistributedStores, LocalExecutor, TransferReport, multiply_distributed};
use matbench::sparse::load_market;
use matbench::{
    BenchmarkHarness, BenchmarkResult, CsvSink, MatrixFactory, MetricsProbe, ResultSink, SystemProbe,
    is_power_of_two, multiply_blocked, multiply_blocked_parallel, multiply_naive,
    multiply_parallel_rows, multiply_strassen, multiply_vectorized,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        error!("benchmark aborted: {}", e);
        return Err(e.into());
    }
    Ok(())
}

fn run(cli: &Cli) -> matbench::Result<()> {
    cli.validate()?;

    let harness = BenchmarkHarness::new(SystemProbe::new(), cli.harness_config())?;
    let caps = harness.probe().capabilities();
    info!(
        "probe: CPU time {}, memory {}",
        if caps.cpu_time { "supported" } else { "unsupported" },
        if caps.memory { "supported" } else { "unsupported" }
    );

    let mut factory = MatrixFactory::new(cli.seed);
    let mut sink = CsvSink::create(&cli.output)?;
    let mut all_results = Vec::new();

    for &n in &cli.sizes {
        println!("\nDense matrix {}×{}", n, n);
        println!("{}", "-".repeat(50));
        let results = bench_dense(cli, &harness, &mut factory, n)?;
        for r in &results {
            sink.write(r)?;
        }
        all_results.extend(results);
    }

    println!("\nSparse matrices");
    println!("{}", "-".repeat(50));
    for r in bench_sparse(cli, &harness, &mut factory)? {
        sink.write(&r)?;
        all_results.push(r);
    }
    sink.flush()?;

    print_summary_table(&all_results, &cli.sizes);
    println!("Results written to {}", cli.output.display());
    Ok(())
}

fn bench_dense(
    cli: &Cli,
    harness: &BenchmarkHarness,
    factory: &mut MatrixFactory,
    n: usize,
) -> matbench::Result<Vec<BenchmarkResult>> {
    let a = factory.dense(n)?;
    let b = factory.dense(n)?;
    let bs = cli.block_size;
    let block_note = format!("block_size={}", bs);

    let base = harness.run("Basic", n, || multiply_naive(&a, &b))?;
    let base = base.with_threads(1);
    let mut results = vec![base.clone()];

    if is_power_of_two(n) {
        let r = harness.run("Strassen", n, || multiply_strassen(&a, &b))?;
        results.push(r.with_baseline(&base));
    } else {
        warn!("skipping Strassen for n={}: not a power of two", n);
    }

    let r = harness.run("Blocked", n, || multiply_blocked(&a, &b, bs))?;
    results.push(r.with_baseline(&base).with_note(block_note.as_str()));

    for &t in &cli.threads {
        let r = harness.run(&format!("ParallelRows_{}t", t), n, || {
            multiply_parallel_rows(&a, &b, t)
        })?;
        results.push(r.with_strategy("ParallelRows").with_threads(t).with_baseline(&base));
    }

    for &t in &cli.threads {
        let r = harness.run(&format!("BlockedParallel_{}t", t), n, || {
            multiply_blocked_parallel(&a, &b, bs, t)
        })?;
        results.push(
            r.with_strategy("BlockedParallel")
                .with_threads(t)
                .with_baseline(&base)
                .with_note(block_note.as_str()),
        );
    }

    let r = harness.run("Vectorized", n, || multiply_vectorized(&a, &b))?;
    results.push(r.with_baseline(&base).with_note("transpose+tight-loops"));

    if n % bs == 0 {
        let mut stores = DistributedStores::local();
        let mut report: Option<TransferReport> = None;
        let r = harness.run("BlockDistributed", n, || {
            let (c, rep) = multiply_distributed(&a, &b, bs, &mut stores, &LocalExecutor)?;
            report = Some(rep);
            Ok(c)
        })?;
        let note = match report {
            Some(rep) => format!(
                "block_size={} blocks={} transferred_mb={:.3}",
                bs,
                rep.result_blocks,
                rep.bytes_transferred as f64 / 1_000_000.0
            ),
            None => block_note,
        };
        results.push(r.with_baseline(&base).with_note(note));
    } else {
        warn!("skipping BlockDistributed for n={}: block size {} does not divide it", n, bs);
    }

    for r in &results {
        println!(
            "{:18} {:>4} {:10.6} s  {}",
            r.strategy(),
            r.threads().map_or(String::new(), |t| format!("{}t", t)),
            r.avg_wall_secs(),
            r.speedup().map_or(String::new(), |s| format!("({:.2}×)", s))
        );
    }
    Ok(results)
}

fn bench_sparse(
    cli: &Cli,
    harness: &BenchmarkHarness,
    factory: &mut MatrixFactory,
) -> matbench::Result<Vec<BenchmarkResult>> {
    let mut results = Vec::new();

    if let Some(path) = &cli.mtx {
        match load_market(path) {
            Ok(m) => {
                let x = factory.vector(m.cols());
                let name = format!(
                    "Sparse_{}",
                    path.file_stem().map_or("file".into(), |s| s.to_string_lossy())
                );
                info!("loaded {}: {}x{}, {} nonzeros", path.display(), m.rows(), m.cols(), m.nnz());
                results.push(harness.run(&name, m.rows(), || m.multiply(&x))?);
            }
            Err(e) => warn!("could not load {}: {}", path.display(), e),
        }
    }

    let threads = std::thread::available_parallelism().map_or(1, |n| n.get());
    for &density in &cli.densities {
        let m = factory.sparse(cli.sparse_size, cli.sparse_size, density)?;
        let x = factory.vector(m.cols());
        let name = format!("SparseSynthetic_{}pctZeros", (density * 100.0) as u32);
        info!("{}: {} nonzeros", name, m.nnz());
        results.push(harness.run(&name, m.rows(), || m.multiply_parallel(&x, threads))?);
    }

    for r in &results {
        println!("{:32} {:10.6} s", r.strategy(), r.avg_wall_secs());
    }
    Ok(results)
}

fn print_summary_table(results: &[BenchmarkResult], sizes: &[usize]) {
    let width = 24 + 14 * sizes.len();
    println!("\n{}", "=".repeat(width));
    println!("SUMMARY (average wall seconds, dense strategies)");
    println!("{}", "=".repeat(width));

    print!("\n{:<24}", "Method");
    for n in sizes {
        print!(" {:>13}", format!("{}×{}", n, n));
    }
    println!();
    println!("{}", "-".repeat(width));

    let mut labels: Vec<(String, Option<usize>)> = Vec::new();
    for r in results.iter().filter(|r| sizes.contains(&r.size())) {
        let key = (r.strategy().to_string(), r.threads());
        if r.strategy().starts_with("Sparse") || labels.contains(&key) {
            continue;
        }
        labels.push(key);
    }

    for (strategy, threads) in &labels {
        let label = match threads {
            Some(t) if strategy != "Basic" => format!("{} ({}t)", strategy, t),
            _ => strategy.clone(),
        };
        print!("{:<24}", label);
        for &n in sizes {
            let cell = results
                .iter()
                .find(|r| r.size() == n && r.strategy() == strategy.as_str() && r.threads() == *threads)
                .map_or("-".to_string(), |r| format!("{:.6}", r.avg_wall_secs()));
            print!(" {:>13}", cell);
        }
        println!();
    }

    println!("{}", "=".repeat(width));
    println!("\nSpeed-up and efficiency per run are in the CSV, relative to Basic.\n");
}
