//! Criterion micro-benchmarks for append, positional insert/erase and sort,
//! with `Vec` and `SmallVec` as baselines.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use smallvec::SmallVec;
use tessera_array::DynamicArray;
use tessera_bench::scrambled;

const N: usize = 10_000;

fn bench_push_back(c: &mut Criterion) {
    let values = scrambled(N);
    let mut group = c.benchmark_group("push_back_10k");
    group.bench_function("dynamic_array", |b| {
        b.iter(|| {
            let mut v = DynamicArray::new();
            for &x in &values {
                v.push_back(x).unwrap();
            }
            black_box(v)
        });
    });
    group.bench_function("vec", |b| {
        b.iter(|| {
            let mut v = Vec::new();
            for &x in &values {
                v.push(x);
            }
            black_box(v)
        });
    });
    group.bench_function("smallvec_16", |b| {
        b.iter(|| {
            let mut v: SmallVec<[u64; 16]> = SmallVec::new();
            for &x in &values {
                v.push(x);
            }
            black_box(v)
        });
    });
    group.finish();
}

fn bench_insert_front(c: &mut Criterion) {
    let values = scrambled(1_000);
    let mut group = c.benchmark_group("insert_front_1k");
    group.bench_function("dynamic_array", |b| {
        b.iter(|| {
            let mut v = DynamicArray::new();
            for &x in &values {
                v.insert(0, x).unwrap();
            }
            black_box(v)
        });
    });
    group.bench_function("vec", |b| {
        b.iter(|| {
            let mut v = Vec::new();
            for &x in &values {
                v.insert(0, x);
            }
            black_box(v)
        });
    });
    group.finish();
}

fn bench_erase_front(c: &mut Criterion) {
    let values = scrambled(1_000);
    c.bench_function("erase_front_1k", |b| {
        b.iter_batched(
            || DynamicArray::try_from_iter(values.iter().copied()).unwrap(),
            |mut v| {
                while !v.is_empty() {
                    v.erase(0).unwrap();
                }
                black_box(v)
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_sort(c: &mut Criterion) {
    let values = scrambled(N);
    c.bench_function("sort_10k", |b| {
        b.iter_batched(
            || DynamicArray::from_slice(&values).unwrap(),
            |mut v| {
                v.sort_unstable();
                black_box(v)
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_push_back,
    bench_insert_front,
    bench_erase_front,
    bench_sort
);
criterion_main!(benches);
