//! Log metrics observer.
//!
//! A swappable global observer receives counters for log calls (per level and
//! logger name) and for created logger instances and log files. The default
//! observer is a no-op. Observer callbacks are fire-and-forget: a panicking
//! observer never aborts the log call that triggered it.

use arc_swap::ArcSwap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};

use crate::domain::level::Level;

/// Observer interface for collecting log metrics (counters for log calls).
pub trait MetricsObserver: Send + Sync {
    /// Increments the counter for created log files.
    fn file_created(&self) {}
    /// Increments the counter for created logger instances.
    fn instance_created(&self) {}
    /// Increments the counter for messages logged at the Error level.
    fn error(&self, _logger: &str) {}
    /// Increments the counter for messages logged at the Warn level.
    fn warn(&self, _logger: &str) {}
    /// Increments the counter for messages logged at the Info level.
    fn info(&self, _logger: &str) {}
    /// Increments the counter for messages logged at the Debug (or Trace) level.
    fn debug(&self, _logger: &str) {}
}

/// No-op observer used until a real one is installed.
#[derive(Debug, Default)]
struct NoopMetrics;

impl MetricsObserver for NoopMetrics {}

// ArcSwap gives readers a consistent snapshot of the observer while it is
// being replaced; the cell indirection keeps the trait object sized.
struct ObserverCell(Arc<dyn MetricsObserver>);

fn slot() -> &'static ArcSwap<ObserverCell> {
    static SLOT: OnceLock<ArcSwap<ObserverCell>> = OnceLock::new();
    SLOT.get_or_init(|| ArcSwap::from_pointee(ObserverCell(Arc::new(NoopMetrics))))
}

/// Install a new global metrics observer. `None` restores the no-op observer.
pub fn set_metrics(observer: Option<Arc<dyn MetricsObserver>>) {
    let observer = observer.unwrap_or_else(|| Arc::new(NoopMetrics));
    slot().store(Arc::new(ObserverCell(observer)));
}

/// Run a callback against the current observer, isolating panics.
pub(crate) fn with_observer(f: impl FnOnce(&dyn MetricsObserver)) {
    let cell = slot().load_full();
    let _ = panic::catch_unwind(AssertUnwindSafe(|| f(&*cell.0)));
}

/// Count an emission attempt against the observer.
///
/// Trace counts as debug; fatal is not counted.
pub(crate) fn observe_emit(level: Level, logger: &str) {
    with_observer(|obs| match level {
        Level::Trace | Level::Debug => obs.debug(logger),
        Level::Info => obs.info(logger),
        Level::Warn => obs.warn(logger),
        Level::Error => obs.error(logger),
        Level::Fatal => {}
    });
}
