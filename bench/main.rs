use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use timed_dense_mm::kernel::{build_pool, multiply, multiply_sequential};
use timed_dense_mm::matrix::MatrixGenerator;

const MEASUREMENT_SECS: u64 = 10;

fn mul_run(crit: &mut Criterion) {
    let pool = build_pool(None).expect("worker pool");
    let mut generator = MatrixGenerator::new(Some(0));

    let mut group = crit.benchmark_group("mul");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(MEASUREMENT_SECS));

    let ns = [64usize, 128, 256];
    for &n in ns.iter() {
        let m = generator.generate(n).expect("inputs");
        group.throughput(Throughput::Elements((n * n * n) as u64));

        group.bench_with_input(BenchmarkId::new("parallel", n), &n, |ben, _| {
            ben.iter(|| {
                let mut c = m.c.clone();
                pool.install(|| multiply(&m.a, &m.b, &mut c));
                black_box(c)
            })
        });
        group.bench_with_input(BenchmarkId::new("sequential", n), &n, |ben, _| {
            ben.iter(|| {
                let mut c = m.c.clone();
                multiply_sequential(&m.a, &m.b, &mut c);
                black_box(c)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, mul_run);
criterion_main!(benches);
