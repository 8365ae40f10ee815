use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use logtree::{Config, Field, LogRegistry};
use std::sync::Arc;
use std::thread;

fn discard_registry(level: &str) -> LogRegistry {
    let registry = LogRegistry::new();
    registry.set_default(&Config {
        level: level.to_string(),
        handler: "discard".to_string(),
        ..Default::default()
    });
    registry
}

/// Benchmark emission through the discard backend (measures the logger path,
/// not the output)
fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit");
    group.throughput(Throughput::Elements(1));

    let registry = discard_registry("debug");
    let logger = registry.get("/bench");

    group.bench_function("enabled_no_fields", |b| {
        b.iter(|| logger.info(black_box("benchmark message"), &[]))
    });

    group.bench_function("enabled_with_fields", |b| {
        let fields = [Field::new("user", "alice"), Field::new("attempt", 3)];
        b.iter(|| logger.info(black_box("benchmark message"), black_box(&fields)))
    });

    let quiet = discard_registry("error");
    let filtered = quiet.get("/bench");
    group.bench_function("filtered_out", |b| {
        b.iter(|| filtered.debug(black_box("dropped"), &[]))
    });

    group.finish();
}

/// Benchmark registry lookups: the hot path is a hit on an existing handle
fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_get");

    let registry = discard_registry("info");
    registry.get("/svc/db");

    group.bench_function("existing_path", |b| {
        b.iter(|| registry.get(black_box("/svc/db")))
    });

    group.finish();
}

/// Benchmark the throttle gate in its suppressing state
fn bench_throttle(c: &mut Criterion) {
    let mut group = c.benchmark_group("throttle");
    group.throughput(Throughput::Elements(1));

    let registry = discard_registry("info");
    let logger = registry.get("/bench");
    let throttled = logger.throttle("bench-key");
    throttled.info("prime the gate", &[]);

    group.bench_function("suppressed", |b| {
        b.iter(|| throttled.info(black_box("recurring"), &[]))
    });

    group.finish();
}

/// Benchmark concurrent emission from multiple threads sharing one logger
fn bench_concurrent_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");

    let registry = discard_registry("debug");
    let logger = registry.get("/bench");

    group.bench_function("emit_4_threads", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let logger = Arc::clone(&logger);
                    thread::spawn(move || {
                        for _ in 0..250 {
                            logger.info(black_box("concurrent message"), &[]);
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_emit,
    bench_get,
    bench_throttle,
    bench_concurrent_emit
);
criterion_main!(benches);
