use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use matbench::distributed::{DistributedStores, LocalExecutor, multiply_distributed};
use matbench::{
    MatrixFactory, multiply_blocked, multiply_blocked_parallel, multiply_naive,
    multiply_parallel_rows, multiply_strassen, multiply_vectorized,
};
use std::hint::black_box;

const BLOCK: usize = 32;

fn dense_benchmark(cr: &mut Criterion) {
    let mut factory = MatrixFactory::new(42);
    let mut group = cr.benchmark_group("dense");

    for n in [64, 128, 256] {
        let a = factory.dense(n).unwrap();
        let b = factory.dense(n).unwrap();

        group.bench_with_input(BenchmarkId::new("naive", n), &n, |bencher, _| {
            bencher.iter(|| multiply_naive(black_box(&a), black_box(&b)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("blocked", n), &n, |bencher, _| {
            bencher.iter(|| multiply_blocked(black_box(&a), black_box(&b), BLOCK).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("strassen", n), &n, |bencher, _| {
            bencher.iter(|| multiply_strassen(black_box(&a), black_box(&b)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("vectorized", n), &n, |bencher, _| {
            bencher.iter(|| multiply_vectorized(black_box(&a), black_box(&b)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("rows_4t", n), &n, |bencher, _| {
            bencher.iter(|| multiply_parallel_rows(black_box(&a), black_box(&b), 4).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("blocked_4t", n), &n, |bencher, _| {
            bencher.iter(|| multiply_blocked_parallel(black_box(&a), black_box(&b), BLOCK, 4).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("distributed", n), &n, |bencher, _| {
            let mut stores = DistributedStores::local();
            bencher.iter(|| {
                multiply_distributed(black_box(&a), black_box(&b), BLOCK, &mut stores, &LocalExecutor)
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn sparse_benchmark(cr: &mut Criterion) {
    let mut factory = MatrixFactory::new(42);
    let mut group = cr.benchmark_group("spmv");

    for density in [0.1, 0.5, 0.9] {
        let m = factory.sparse(500, 500, density).unwrap();
        let x = factory.vector(500);
        let label = format!("{}pct_zeros", (density * 100.0) as u32);

        group.bench_function(BenchmarkId::new("sequential", &label), |bencher| {
            bencher.iter(|| m.multiply(black_box(&x)).unwrap())
        });
        group.bench_function(BenchmarkId::new("parallel_4t", &label), |bencher| {
            bencher.iter(|| m.multiply_parallel(black_box(&x), 4).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, dense_benchmark, sparse_benchmark);
criterion_main!(benches);
