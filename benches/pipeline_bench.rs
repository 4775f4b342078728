// Criterion benchmarks for the local stages of the request pipeline.
//
// Run benchmarks with:
//   cargo bench --bench pipeline_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use integrations_dataforseo::cache::{CacheConfig, CacheManager};
use integrations_dataforseo::resilience::{RateLimitConfig, RateLimiter};
use integrations_dataforseo::{detect_query_type, extract_entities};
use serde_json::json;
use std::time::Duration;

fn bench_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache");

    for size in [100usize, 1000] {
        let cache: CacheManager = CacheManager::new(CacheConfig::new().with_max_entries(size));
        for i in 0..size {
            cache.set(format!("key_{i}"), json!({"n": i}), None);
        }

        group.bench_with_input(BenchmarkId::new("get_hit", size), &size, |b, _| {
            b.iter(|| cache.get(black_box("key_42")));
        });

        group.bench_with_input(BenchmarkId::new("set_evicting", size), &size, |b, _| {
            let mut i = size;
            b.iter(|| {
                cache.set(format!("key_{i}"), json!({"n": i}), None);
                i += 1;
            });
        });
    }

    group.finish();
}

fn bench_rate_limiter(c: &mut Criterion) {
    let mut group = c.benchmark_group("rate_limiter");

    let limiter = RateLimiter::new(RateLimitConfig::new(100, Duration::from_millis(1)));
    group.bench_function("check_limit", |b| {
        b.iter(|| black_box(limiter.check_limit()));
    });

    group.finish();
}

fn bench_query_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_analysis");
    let question = r#"¿Qué tendencia tiene "zapatillas running" en Buenos Aires frente a www.example.com?"#;

    group.bench_function("detect_query_type", |b| {
        b.iter(|| detect_query_type(black_box(question)));
    });

    group.bench_function("extract_entities", |b| {
        b.iter(|| extract_entities(black_box(question)));
    });

    group.finish();
}

criterion_group!(benches, bench_cache, bench_rate_limiter, bench_query_analysis);
criterion_main!(benches);
