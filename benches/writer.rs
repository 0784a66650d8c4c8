//! Criterion benchmarks for writer append + finalize throughput.
//!
//! Run with:
//!   cargo bench --bench writer

use cdb::Writer;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tempfile::NamedTempFile;

fn build_and_finish(num_records: usize, value_len: usize) {
    let tmp = NamedTempFile::new().unwrap();
    let mut w = Writer::create(tmp.path()).unwrap();
    let value = vec![0x5au8; value_len];
    for i in 0..num_records {
        let key = format!("key-{i}");
        w.append(key.as_bytes(), &value).unwrap();
    }
    w.finish().unwrap();
}

fn bench_append_and_finish(c: &mut Criterion) {
    let mut group = c.benchmark_group("writer_append_and_finish");
    group.sample_size(20);

    for &num_records in &[1_000usize, 10_000] {
        let value_len = 64;
        group.throughput(Throughput::Elements(num_records as u64));
        group.bench_with_input(
            BenchmarkId::new("records", num_records),
            &num_records,
            |b, &num_records| b.iter(|| build_and_finish(num_records, value_len)),
        );
    }

    group.finish();
}

fn bench_finalize_bucket_density(c: &mut Criterion) {
    let mut group = c.benchmark_group("writer_finalize_bucket_density");
    group.sample_size(20);

    // Fixed record count, varying value size — isolates the record-region
    // write cost from the bucket-table materialization cost in `finish`.
    for &value_len in &[16usize, 256, 4096] {
        group.throughput(Throughput::Bytes((5_000 * value_len) as u64));
        group.bench_with_input(
            BenchmarkId::new("value_len", value_len),
            &value_len,
            |b, &value_len| b.iter(|| build_and_finish(5_000, value_len)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_append_and_finish, bench_finalize_bucket_density);
criterion_main!(benches);
