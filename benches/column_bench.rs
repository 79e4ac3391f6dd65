// In chronocol-core/benches/column_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use chronocol::{
    ArithmeticDispatch, DatetimeTzArray, Duration, ExtensionColumn, Operand, TimeZoneId, NAT,
};

// --- Mock Data Generation ---

/// Sorted instants one second apart, starting at 2000-01-01 UTC.
fn generate_regular(size: usize) -> Vec<i64> {
    let start = 946_684_800_000_000_000_i64;
    (0..size as i64).map(|i| start + i * 1_000_000_000).collect()
}

/// Random instants within one year, with roughly 5% NaT.
fn generate_random_with_nat(size: usize, rng: &mut StdRng) -> Vec<i64> {
    let start = 946_684_800_000_000_000_i64;
    let year = 365 * 86_400 * 1_000_000_000_i64;
    (0..size)
        .map(|_| {
            if rng.random_bool(0.05) {
                NAT
            } else {
                start + rng.random_range(0..year)
            }
        })
        .collect()
}

// --- Benchmark Suite ---

const BENCH_DATA_SIZE: usize = 100_000;

fn bench_column_ops(c: &mut Criterion) {
    // --- Setup Data ---
    let mut rng = StdRng::seed_from_u64(42);
    let tz = TimeZoneId::parse("US/Central").unwrap();
    let regular = DatetimeTzArray::from_i64(generate_regular(BENCH_DATA_SIZE), Some(tz));
    let random = DatetimeTzArray::from_i64(generate_random_with_nat(BENCH_DATA_SIZE, &mut rng), Some(tz));

    let progression: Vec<i64> = (0..BENCH_DATA_SIZE as i64 / 2).map(|i| i * 2).collect();
    let scattered: Vec<i64> = (0..BENCH_DATA_SIZE / 2)
        .map(|_| rng.random_range(0..BENCH_DATA_SIZE as i64))
        .collect();

    // --- Create a Benchmark Group ---
    let mut group = c.benchmark_group("DatetimeTzArray Operations");
    group.throughput(criterion::Throughput::Elements(BENCH_DATA_SIZE as u64));

    // --- Take: progression fast path vs. general gather ---
    group.bench_function("Take [1] Progression (slice path)", |b| {
        b.iter(|| black_box(regular.take_with(black_box(&progression), false, None, true)))
    });
    group.bench_function("Take [2] Progression (gather path)", |b| {
        b.iter(|| black_box(regular.take_with(black_box(&progression), false, None, false)))
    });
    group.bench_function("Take [3] Scattered", |b| {
        b.iter(|| black_box(ExtensionColumn::take(&random, black_box(&scattered), false, None)))
    });

    // --- Ordering & reductions ---
    group.bench_function("Sort (random, 5% NaT)", |b| b.iter(|| black_box(random.sort(true))));
    group.bench_function("Min (monotonic fast path)", |b| {
        b.iter(|| black_box(DatetimeTzArray::from_i64(regular.asi8().to_vec(), Some(tz)).min()))
    });
    group.bench_function("Min (general path)", |b| b.iter(|| black_box(random.min())));

    // --- Arithmetic & wall-clock work ---
    let hour = Duration::from_nanos(3_600_000_000_000);
    group.bench_function("Add Duration scalar", |b| {
        b.iter(|| black_box(random.add(Operand::Duration(black_box(hour)))))
    });
    group.bench_function("Field accessor (hour, US/Central)", |b| {
        b.iter(|| black_box(random.hour()))
    });

    group.finish();
}

criterion_group!(benches, bench_column_ops);
criterion_main!(benches);
