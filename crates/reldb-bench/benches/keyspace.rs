//! Keyspace benchmarks for reldb.
//!
//! Benchmarks for:
//! - Sequential and random puts
//! - Point lookups
//! - Full cursor walks
//! - Deleting through a cursor while walking

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use reldb_bench::utils::{generate_kv_pairs, generate_sequential_keys};
use reldb_common::types::{Key, Value};
use reldb_kv::{Environment, OpenMode};

fn sequential_pairs(count: usize) -> Vec<(Key, Value)> {
    generate_sequential_keys(count, "key_")
        .into_iter()
        .map(|k| (Key::from(k), Value::from(vec![7u8; 64])))
        .collect()
}

/// Benchmark sequential puts.
fn bench_put_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyspace/put_sequential");

    for size in [1000, 10_000].iter() {
        let pairs = sequential_pairs(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let env = Environment::new();
                let ks = env.open_keyspace("bench", OpenMode::OpenOrCreate).unwrap();
                for (key, value) in &pairs {
                    ks.put(key.clone(), value.clone()).unwrap();
                }
                black_box(ks.count())
            });
        });
    }

    group.finish();
}

/// Benchmark random puts.
fn bench_put_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyspace/put_random");

    for size in [1000, 10_000].iter() {
        let pairs = generate_kv_pairs(*size, 16, 64);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let env = Environment::new();
                let ks = env.open_keyspace("bench", OpenMode::OpenOrCreate).unwrap();
                for (key, value) in &pairs {
                    ks.put(key.clone(), value.clone()).unwrap();
                }
                black_box(ks.count())
            });
        });
    }

    group.finish();
}

/// Benchmark point lookups in shuffled order.
fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyspace/get");

    for size in [1000, 10_000].iter() {
        let pairs = sequential_pairs(*size);
        let env = Environment::new();
        let ks = env.open_keyspace("bench", OpenMode::OpenOrCreate).unwrap();
        for (key, value) in &pairs {
            ks.put(key.clone(), value.clone()).unwrap();
        }
        let mut keys: Vec<Key> = pairs.into_iter().map(|(k, _)| k).collect();
        keys.shuffle(&mut StdRng::seed_from_u64(42));

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                for key in &keys {
                    black_box(ks.get(key));
                }
            });
        });
    }

    group.finish();
}

/// Benchmark a full forward cursor walk.
fn bench_cursor_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyspace/cursor_walk");

    for size in [1000, 10_000].iter() {
        let env = Environment::new();
        let ks = env.open_keyspace("bench", OpenMode::OpenOrCreate).unwrap();
        for (key, value) in sequential_pairs(*size) {
            ks.put(key, value).unwrap();
        }

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut cursor = ks.cursor();
                let mut seen = 0usize;
                let mut entry = cursor.first();
                while let Some(e) = entry {
                    seen += e.value.as_bytes().len();
                    entry = cursor.next();
                }
                black_box(seen)
            });
        });
    }

    group.finish();
}

/// Benchmark deleting every other entry through a cursor.
fn bench_cursor_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyspace/cursor_delete");

    for size in [1000, 10_000].iter() {
        let pairs = sequential_pairs(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let env = Environment::new();
                let ks = env.open_keyspace("bench", OpenMode::OpenOrCreate).unwrap();
                for (key, value) in &pairs {
                    ks.put(key.clone(), value.clone()).unwrap();
                }
                let mut cursor = ks.cursor();
                let mut entry = cursor.first();
                let mut odd = false;
                while entry.is_some() {
                    if odd {
                        cursor.delete().unwrap();
                    }
                    odd = !odd;
                    entry = cursor.next();
                }
                black_box(ks.count())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_put_sequential,
    bench_put_random,
    bench_get,
    bench_cursor_walk,
    bench_cursor_delete,
);
criterion_main!(benches);
