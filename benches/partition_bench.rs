//! Benchmarks for partitionrs.
//!
//! Run with:
//!     cargo bench

use std::io::{BufReader, Cursor};
use std::sync::Arc;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use partitionrs::{PartitionConfig, PartitionSource, decode};

fn bench_backings(c: &mut Criterion) {
    let mut group = c.benchmark_group("backings");

    for len in [10_000usize, 1_000_000] {
        let data: Arc<[u64]> = (0..len as u64).collect();
        group.throughput(Throughput::Elements(len as u64));

        // Zero-copy views over shared storage
        group.bench_function(format!("list_{}", len), |b| {
            b.iter(|| {
                let mut source =
                    PartitionSource::from_shared(Arc::clone(&data), PartitionConfig::default())
                        .unwrap();
                let count = source.traversal().unwrap().map(|p| p.unwrap().len()).sum::<usize>();
                black_box(count)
            });
        });

        // Pulling one element at a time into owned partitions
        group.bench_function(format!("cursor_{}", len), |b| {
            b.iter(|| {
                let upstream = black_box(0..len as u64);
                let mut source =
                    PartitionSource::from_cursor(upstream, PartitionConfig::default()).unwrap();
                let count = source.traversal().unwrap().map(|p| p.unwrap().len()).sum::<usize>();
                black_box(count)
            });
        });
    }

    group.finish();
}

fn bench_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("sizes");
    let len = 1_000_000u64;

    for size in [1usize, 16, 1024] {
        group.bench_function(format!("cursor_size_{}", size), |b| {
            let config = PartitionConfig::new(size).unwrap();
            b.iter(|| {
                let mut source = PartitionSource::from_cursor(black_box(0..len), config).unwrap();
                black_box(source.traversal().unwrap().count())
            });
        });
    }

    group.finish();
}

fn bench_resource(c: &mut Criterion) {
    let mut group = c.benchmark_group("resource");
    let lines = 100_000;
    let data: Vec<u8> = (0..lines)
        .flat_map(|i| format!("record-{}\n", i).into_bytes())
        .collect();

    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("delimited", |b| {
        b.iter(|| {
            let source = PartitionSource::from_resource(
                Cursor::new(black_box(data.clone())),
                PartitionConfig::new(256).unwrap(),
                |reader| Ok::<_, std::io::Error>(decode::delimited(BufReader::new(reader), b'\n')),
            )
            .unwrap();
            let count = source.scoped(|source| source.traversal().unwrap().count());
            black_box(count)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_backings, bench_sizes, bench_resource);
criterion_main!(benches);
