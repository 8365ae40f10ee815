//! # logtree
//!
//! Hierarchical, hot-reconfigurable structured logging.
//!
//! Loggers live in a path hierarchy (`/`, `/svc`, `/svc/db`) managed by a
//! [`LogRegistry`]. A logger's effective configuration is resolved by walking
//! its path from the root and merging the config entries found along the way,
//! so one root [`Config`] describes the whole tree and children override only
//! what they set. Handles are stable: reconfiguring the registry updates every
//! handle in place, atomically, without the holders re-looking anything up.
//!
//! ## Quick Start
//!
//! ```rust
//! use logtree::{Config, Field};
//!
//! // one config for the whole tree; /db gets debug, everything else info
//! let mut config = Config::new();
//! config.named.insert("/db".to_string(), Config {
//!     level: "debug".to_string(),
//!     ..Default::default()
//! });
//! logtree::set_default(&config);
//!
//! logtree::info("starting up", &[Field::new("port", 8080)]);
//!
//! let db = logtree::get("/db");
//! db.debug("connected", &[Field::new("host", "db1")]);
//! ```
//!
//! ## Features
//!
//! - **Hierarchical configuration**: child loggers inherit their ancestors'
//!   settings and override only what their own entry sets
//! - **Stable handles**: `set_default` rebuilds every registered logger in
//!   place; emission never takes a lock
//! - **Rendering backends**: `json`, `text`, `raw`, `console`, `memory`,
//!   `discard`, with size-rotated log files or stdout underneath
//! - **Throttling**: [`Logger::throttle`] caps repeated messages per key and
//!   period, reporting how many were suppressed
//! - **Metrics**: a swappable [`MetricsObserver`] counts emissions per level
//!   and logger
//!
//! ## Throttling
//!
//! ```rust
//! let log = logtree::get("/poller");
//! for _ in 0..1000 {
//!     // at most one of these per 5 seconds; the next one that passes
//!     // carries a `suppressed` count
//!     log.throttle("poll-fail").warn("poll failed", &[]);
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::handle::Logger;
pub use application::metrics::{set_metrics, MetricsObserver};
pub use application::registry::LogRegistry;
pub use application::throttle::{Throttled, DEFAULT_THROTTLE_PERIOD};
pub use domain::config::{Config, FileConfig};
pub use domain::field::{Entry, Field};
pub use domain::level::Level;

use std::panic::Location;
use std::sync::{Arc, OnceLock};

/// The process-wide registry backing the module-level functions.
pub fn registry() -> &'static LogRegistry {
    static REGISTRY: OnceLock<LogRegistry> = OnceLock::new();
    REGISTRY.get_or_init(LogRegistry::new)
}

/// Get or create the logger for `path` in the process-wide registry.
pub fn get(path: &str) -> Arc<Logger> {
    registry().get(path)
}

/// The root logger of the process-wide registry.
pub fn root() -> Arc<Logger> {
    registry().root()
}

/// Replace the process-wide root configuration. See
/// [`LogRegistry::set_default`].
pub fn set_default(config: &Config) {
    registry().set_default(config);
}

/// Close the log files of all loggers in the process-wide registry.
pub fn close_log_files() {
    registry().close_all();
}

/// Logs the given message at the Trace level using the root logger.
#[track_caller]
pub fn trace(msg: &str, fields: &[Field]) {
    root().emit(Level::Trace, msg, fields, Location::caller());
}

/// Logs the given message at the Debug level using the root logger.
#[track_caller]
pub fn debug(msg: &str, fields: &[Field]) {
    root().emit(Level::Debug, msg, fields, Location::caller());
}

/// Logs the given message at the Info level using the root logger.
#[track_caller]
pub fn info(msg: &str, fields: &[Field]) {
    root().emit(Level::Info, msg, fields, Location::caller());
}

/// Logs the given message at the Warn level using the root logger.
#[track_caller]
pub fn warn(msg: &str, fields: &[Field]) {
    root().emit(Level::Warn, msg, fields, Location::caller());
}

/// Logs the given message at the Error level using the root logger.
#[track_caller]
pub fn error(msg: &str, fields: &[Field]) {
    root().emit(Level::Error, msg, fields, Location::caller());
}

/// Logs the given message at the Fatal level using the root logger. The entry
/// is forwarded regardless of the configured level.
#[track_caller]
pub fn fatal(msg: &str, fields: &[Field]) {
    root().emit(Level::Fatal, msg, fields, Location::caller());
}
