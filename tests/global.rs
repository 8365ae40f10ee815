use logtree::infrastructure::handlers::memory::MemoryHandler;
use logtree::{Config, Field, MetricsObserver};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct CountingMetrics {
    info: AtomicUsize,
    warn: AtomicUsize,
}

impl MetricsObserver for CountingMetrics {
    fn info(&self, _logger: &str) {
        self.info.fetch_add(1, Ordering::Relaxed);
    }
    fn warn(&self, _logger: &str) {
        self.warn.fetch_add(1, Ordering::Relaxed);
    }
}

// The process-wide registry and observer are shared state, so this file holds
// a single test that exercises the module-level API end to end.
#[test]
fn test_global_facade() {
    let config = Config {
        level: "debug".to_string(),
        handler: "memory".to_string(),
        ..Default::default()
    };
    logtree::set_default(&config);

    let metrics = Arc::new(CountingMetrics::default());
    logtree::set_metrics(Some(metrics.clone()));

    logtree::info("root message", &[Field::new("k", "v")]);
    logtree::warn("root warning", &[]);

    let db = logtree::get("/db");
    db.debug("db message", &[]);

    let entries = logtree::root()
        .handler()
        .as_any()
        .downcast_ref::<MemoryHandler>()
        .expect("memory handler")
        .entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].message, "root message");
    assert_eq!(entries[0].field("logger"), Some(&Value::from("/")));
    assert_eq!(entries[0].field("k"), Some(&Value::from("v")));
    assert_eq!(entries[2].field("logger"), Some(&Value::from("/db")));

    // emission counters saw the two root calls (debug is counted separately)
    assert_eq!(metrics.info.load(Ordering::Relaxed), 1);
    assert_eq!(metrics.warn.load(Ordering::Relaxed), 1);

    logtree::set_metrics(None);
    logtree::info("uncounted", &[]);
    assert_eq!(metrics.info.load(Ordering::Relaxed), 1);

    // level predicates follow the active configuration
    assert!(logtree::root().is_debug());
    logtree::root().set_level("warn");
    assert!(!logtree::root().is_debug());
    assert!(!db.is_debug());

    logtree::close_log_files();
}
