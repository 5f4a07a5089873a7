//! Query benchmarks over a prebuilt store.
//!
//! # Groups
//!
//! | Group | What it measures |
//! |-------|-----------------|
//! | `bucket` | Requests and 4xx bucketing at 1m/1h periods |
//! | `paths` | Path counting, top-N ranking and prefix partitioning |
//!
//! # Viewing results
//!
//! ```sh
//! cargo bench --bench query_bench
//! ```

use chrono::TimeDelta;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use digest_core::query;
use digest_core::{ChronoStore, IgnoredIps};
use std::hint::black_box;

const PATHS: &[&str] = &[
    "/", "/feed/", "/xmlrpc.php", "/old/xmlrpc.php", "/wp/xmlrpc.php",
    "/static/js/menu_populators.js", "/blog/", "/robots.txt",
];

fn store(n: usize) -> ChronoStore {
    let mut dump = String::with_capacity(n * 120);
    for i in 0..n {
        let status = if i % 3 == 0 { 404 } else { 200 };
        dump.push_str(&format!(
            "10.1.{}.{} - - [19/Sep/2022:{:02}:{:02}:{:02} +0000] \"GET {} HTTP/1.1\" {status} 100 \"-\" \"bench\" \"-\"\n",
            (i / 200) % 200,
            i % 200,
            (i / 3600) % 24,
            (i / 60) % 60,
            i % 60,
            PATHS[i % PATHS.len()],
        ));
    }
    ChronoStore::from_text(&dump, &IgnoredIps::new())
}

fn bucket_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucket");
    let store = store(50_000);

    for minutes in [1i64, 60] {
        let period = TimeDelta::minutes(minutes);
        group.bench_with_input(BenchmarkId::new("requests", minutes), &period, |b, &period| {
            b.iter(|| query::bucket_by_period(black_box(store.records()), period))
        });
        group.bench_with_input(BenchmarkId::new("failures", minutes), &period, |b, &period| {
            b.iter(|| query::failures_per_period(black_box(store.records()), period))
        });
    }
    group.finish();
}

fn paths_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("paths");
    let store = store(50_000);
    let prefixes = ["/old/", "/new/", "/blog/", "/feed/", "/static/", "/wordpress/", "/wp/", "/"];

    group.bench_function("most_common_10", |b| {
        b.iter(|| query::path_counts(black_box(store.records())).most_common(10))
    });
    group.bench_function("partition_8_prefixes", |b| {
        b.iter(|| query::partition_by_prefix(&prefixes, black_box(store.records())).unmatched.len())
    });
    group.finish();
}

criterion_group!(benches, bucket_bench, paths_bench);
criterion_main!(benches);
