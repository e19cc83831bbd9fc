//! Benchmark for FrozenMap vs standard BTreeMap.
//!
//! Compares FrozenMap against Rust's standard BTreeMap for construction,
//! lookup, derivation and range iteration.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use frozenmap::FrozenMap;
use std::collections::BTreeMap;
use std::hint::black_box;

const SIZES: [i32; 3] = [100, 1000, 10000];

// =============================================================================
// from_entries Benchmark
// =============================================================================

fn benchmark_from_entries(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("from_entries");

    for size in SIZES {
        group.bench_with_input(
            BenchmarkId::new("FrozenMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let map =
                        FrozenMap::from_entries((0..size).map(|index| (index, index * 2)), []);
                    black_box(map)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let map: BTreeMap<i32, i32> =
                        (0..size).map(|index| (index, index * 2)).collect();
                    black_box(map)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in SIZES {
        let frozen_map: FrozenMap<i32, i32> = (0..size).map(|index| (index, index * 2)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|index| (index, index * 2)).collect();

        group.bench_with_input(
            BenchmarkId::new("FrozenMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0_i64;
                    for key in 0..size {
                        if let Some(&value) = frozen_map.get(&black_box(key)) {
                            sum += i64::from(value);
                        }
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0_i64;
                    for key in 0..size {
                        if let Some(&value) = standard_map.get(&black_box(key)) {
                            sum += i64::from(value);
                        }
                    }
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// Derivation Benchmark
// =============================================================================

/// One derived version per iteration: FrozenMap shares structure, BTreeMap
/// has to clone the whole map to keep the original.
fn benchmark_derive_one(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("derive_one");

    for size in SIZES {
        let frozen_map: FrozenMap<i32, i32> = (0..size).map(|index| (index, index * 2)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|index| (index, index * 2)).collect();

        group.bench_with_input(BenchmarkId::new("FrozenMap", size), &size, |bencher, _| {
            bencher.iter(|| black_box(frozen_map.insert(black_box(size / 2), -1)));
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, _| {
            bencher.iter(|| {
                let mut copy = standard_map.clone();
                copy.insert(black_box(size / 2), -1);
                black_box(copy)
            });
        });

        group.bench_with_input(
            BenchmarkId::new("FrozenMap::remove", size),
            &size,
            |bencher, _| {
                bencher.iter(|| black_box(frozen_map.remove(&black_box(size / 2))));
            },
        );
    }

    group.finish();
}

// =============================================================================
// Iteration Benchmark
// =============================================================================

fn benchmark_range(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("range");

    for size in SIZES {
        let frozen_map: FrozenMap<i32, i32> = (0..size).map(|index| (index, index * 2)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|index| (index, index * 2)).collect();
        let low = size / 4;
        let high = size / 2;

        group.bench_with_input(BenchmarkId::new("FrozenMap", size), &size, |bencher, _| {
            bencher.iter(|| {
                let sum: i64 = frozen_map
                    .range(black_box(low)..black_box(high))
                    .map(|(_, value)| i64::from(*value))
                    .sum();
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, _| {
            bencher.iter(|| {
                let sum: i64 = standard_map
                    .range(black_box(low)..black_box(high))
                    .map(|(_, value)| i64::from(*value))
                    .sum();
                black_box(sum)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_from_entries,
    benchmark_get,
    benchmark_derive_one,
    benchmark_range
);
criterion_main!(benches);
