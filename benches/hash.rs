//! Criterion benchmarks for the CDB hash function.
//!
//! Run with:
//!   cargo bench --bench hash

use cdb::hash::hash;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn synthetic_key(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i as u32).wrapping_mul(2654435761).to_le_bytes()[0]).collect()
}

fn bench_hash_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash");

    for &len in &[8usize, 64, 256, 4096, 65536] {
        let key = synthetic_key(len);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("hash", len), &key, |b, key| {
            b.iter(|| hash(key))
        });
    }

    group.finish();
}

fn bench_hash_small_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_small_keys");
    // Typical lookup-key sizes dominate real workloads far more than the
    // throughput curve above; benchmark them directly at fixed iteration count.
    for &len in &[1usize, 4, 16, 32] {
        let key = synthetic_key(len);
        group.bench_with_input(BenchmarkId::new("hash", len), &key, |b, key| {
            b.iter(|| hash(key))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hash_throughput, bench_hash_small_keys);
criterion_main!(benches);
