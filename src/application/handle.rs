//! Logger handle with an atomically swappable snapshot.
//!
//! A `Logger` is a thin wrapper around an immutable `LoggerState` snapshot.
//! Emitting and level queries read the snapshot without locking; configuration
//! changes replace the snapshot pointer as a whole. Live snapshots are never
//! mutated in place, so a level change that happens-before an emission is
//! always visible to it.

use arc_swap::ArcSwap;
use serde_json::Value;
use std::panic::Location;
use std::sync::{Arc, OnceLock, Weak};
use std::time::Duration;

use crate::application::metrics;
use crate::application::ports::{Clock, Handler, LogWriter};
use crate::application::registry::RegistryInner;
use crate::application::throttle::{ThrottleCache, Throttled, DEFAULT_THROTTLE_PERIOD};
use crate::domain::config::Config;
use crate::domain::field::{Entry, Field};
use crate::domain::level::Level;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::handlers;
use crate::infrastructure::rotate::RotatingFile;
use crate::infrastructure::stdout::StdoutWriter;

/// Immutable resolved state of one logger.
///
/// Replaced wholesale on reconfiguration; the rotation writer, if owned,
/// transfers to the replacement snapshot when the output target is unchanged.
pub(crate) struct LoggerState {
    pub(crate) name: String,
    pub(crate) level: Level,
    pub(crate) config: Config,
    pub(crate) sink: Sink,
    pub(crate) writer: Option<Arc<RotatingFile>>,
}

/// The emission capability bound to a snapshot, resolved once at construction:
/// either the bare backend handler, or the handler plus fields attached to
/// every entry (normally the `logger` path field).
#[derive(Clone)]
pub(crate) enum Sink {
    Bare(Arc<dyn Handler>),
    Bound {
        handler: Arc<dyn Handler>,
        fields: Vec<Field>,
    },
}

impl Sink {
    pub(crate) fn handler(&self) -> &Arc<dyn Handler> {
        match self {
            Sink::Bare(h) => h,
            Sink::Bound { handler, .. } => handler,
        }
    }

    fn send(&self, level: Level, message: &str, extra: Vec<Field>) {
        let (handler, mut fields) = match self {
            Sink::Bare(h) => (h, Vec::with_capacity(extra.len())),
            Sink::Bound { handler, fields } => (handler, fields.clone()),
        };
        fields.extend(extra);
        let entry = Entry::new(level, message, fields);
        // a failing backend call only fails this one emission
        let _ = handler.handle(&entry);
    }
}

/// Build a snapshot for `path` from a resolved config.
///
/// `parent` enables sink reuse: when the parent selects the same backend kind
/// and file target, its handler is shared instead of opening a duplicate
/// backend. `previous` enables writer reuse across reconfiguration: an
/// unchanged output target keeps the already-open rotation writer, avoiding
/// truncation and rotation churn.
pub(crate) fn build_state(
    config: &Config,
    path: &str,
    parent: Option<&LoggerState>,
    previous: Option<&LoggerState>,
) -> LoggerState {
    let level = Level::parse(&config.level).unwrap_or(Level::Info);

    let mut config = config.clone();
    if config.effective_file().is_none() {
        // no filename is equivalent to logging to stdout
        config.file = None;
    }
    // named entries only have meaning on the root configuration
    config.named.clear();

    let reusable_previous = previous.filter(|p| p.config.same_output(&config));
    let reusable_parent = parent.filter(|p| p.config.same_output(&config));

    let (handler, writer) = if let Some(prev) = reusable_previous {
        (prev.sink.handler().clone(), prev.writer.clone())
    } else if let Some(par) = reusable_parent {
        // share the ancestor's backend; the writer stays owned by the ancestor
        (par.sink.handler().clone(), None)
    } else {
        metrics::with_observer(|obs| obs.instance_created());
        let mut owned = None;
        let output: Arc<dyn LogWriter> = match config.effective_file() {
            Some(file) => {
                metrics::with_observer(|obs| obs.file_created());
                let rotating = Arc::new(RotatingFile::new(file));
                owned = Some(rotating.clone());
                rotating
            }
            None => Arc::new(StdoutWriter),
        };
        (handlers::for_kind(&config.handler, output), owned)
    };

    let bound = match config.handler.as_str() {
        "console" => false,
        "memory" if level != Level::Debug => false,
        _ => true,
    };
    let sink = if bound {
        Sink::Bound {
            handler,
            fields: vec![Field::new("logger", path)],
        }
    } else {
        Sink::Bare(handler)
    };

    LoggerState {
        name: path.to_string(),
        level,
        config,
        sink,
        writer,
    }
}

/// A named logger handle.
///
/// Handles are cheap to share (`Arc`) and stable: reconfiguration through the
/// registry replaces the handle's snapshot in place, so holders never need to
/// re-lookup a logger after `set_default`.
pub struct Logger {
    state: ArcSwap<LoggerState>,
    throttles: ThrottleCache,
    pub(crate) clock: Arc<dyn Clock>,
    registry: OnceLock<Weak<RegistryInner>>,
}

impl Logger {
    /// Create a standalone root logger from the given configuration.
    pub fn new(config: &Config) -> Arc<Logger> {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create a standalone logger with an explicit clock, used to drive the
    /// throttle deterministically in tests.
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Arc<Logger> {
        Arc::new(Self::from_state(
            build_state(config, "/", None, None),
            clock,
        ))
    }

    pub(crate) fn from_state(state: LoggerState, clock: Arc<dyn Clock>) -> Logger {
        Logger {
            state: ArcSwap::from_pointee(state),
            throttles: ThrottleCache::new(),
            clock,
            registry: OnceLock::new(),
        }
    }

    pub(crate) fn attach_registry(&self, registry: &Arc<RegistryInner>) {
        let _ = self.registry.set(Arc::downgrade(registry));
    }

    pub(crate) fn snapshot(&self) -> Arc<LoggerState> {
        self.state.load_full()
    }

    pub(crate) fn replace_state(&self, state: LoggerState) {
        self.state.store(Arc::new(state));
    }

    /// Re-snapshot with only the level changed; every other resolved field,
    /// the sink and the writer are carried over untouched.
    pub(crate) fn replace_level(&self, level: Level) {
        let current = self.state.load_full();
        let mut config = current.config.clone();
        config.level = level.to_string();
        self.state.store(Arc::new(LoggerState {
            name: current.name.clone(),
            level,
            config,
            sink: current.sink.clone(),
            writer: current.writer.clone(),
        }));
    }

    /// The hierarchical path of this logger (`/` for the root).
    pub fn name(&self) -> String {
        self.state.load().name.clone()
    }

    /// The current level threshold.
    pub fn level(&self) -> Level {
        self.state.load().level
    }

    /// The backend handler of this logger. Mainly useful for retrieving the
    /// capturing `memory` handler in tests.
    pub fn handler(&self) -> Arc<dyn Handler> {
        self.state.load().sink.handler().clone()
    }

    /// Whether an entry at `level` would currently be forwarded.
    pub(crate) fn enabled(&self, level: Level) -> bool {
        level == Level::Fatal || self.state.load().level <= level
    }

    // --- emission ---

    /// Logs the given message at the Trace level.
    #[track_caller]
    pub fn trace(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Trace, msg, fields, Location::caller());
    }

    /// Logs the given message at the Debug level.
    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Debug, msg, fields, Location::caller());
    }

    /// Logs the given message at the Info level.
    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Info, msg, fields, Location::caller());
    }

    /// Logs the given message at the Warn level.
    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Warn, msg, fields, Location::caller());
    }

    /// Logs the given message at the Error level.
    #[track_caller]
    pub fn error(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Error, msg, fields, Location::caller());
    }

    /// Logs the given message at the Fatal level.
    ///
    /// Fatal entries are forwarded unconditionally. Terminating the process is
    /// the backend sink's contract; this crate's bundled handlers only write.
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Fatal, msg, fields, Location::caller());
    }

    pub(crate) fn emit(
        &self,
        level: Level,
        msg: &str,
        fields: &[Field],
        caller: &'static Location<'static>,
    ) {
        let state = self.state.load();
        metrics::observe_emit(level, &state.name);
        if level != Level::Fatal && state.level > level {
            return;
        }
        let mut extra = fields.to_vec();
        if state.config.include_thread_id() {
            extra.push(Field::new("tid", current_thread_id()));
        }
        if state.config.include_caller() {
            extra.push(Field::new("caller", format_caller(caller)));
        }
        state.sink.send(level, msg, extra);
    }

    // --- level predicates ---

    /// True if the logger logs at the Trace level.
    pub fn is_trace(&self) -> bool {
        self.state.load().level <= Level::Trace
    }

    /// True if the logger logs at the Debug level.
    pub fn is_debug(&self) -> bool {
        self.state.load().level <= Level::Debug
    }

    /// True if the logger logs at the Info level.
    pub fn is_info(&self) -> bool {
        self.state.load().level <= Level::Info
    }

    /// True if the logger logs at the Warn level.
    pub fn is_warn(&self) -> bool {
        self.state.load().level <= Level::Warn
    }

    /// True if the logger logs at the Error level.
    pub fn is_error(&self) -> bool {
        self.state.load().level <= Level::Error
    }

    /// True if the logger logs at the Fatal level.
    pub fn is_fatal(&self) -> bool {
        self.state.load().level <= Level::Fatal
    }

    // --- level changes ---

    /// Set the level from its string form. Unknown strings are a no-op.
    ///
    /// For registered loggers the change also applies to every descendant
    /// logger (path-segment prefix match), but never to ancestors, unrelated
    /// siblings, or any other resolved field.
    pub fn set_level(&self, level: &str) {
        if let Some(level) = Level::parse(level) {
            self.apply_level(level);
        }
    }

    /// Set the level to Trace.
    pub fn set_trace(&self) {
        self.apply_level(Level::Trace);
    }

    /// Set the level to Debug.
    pub fn set_debug(&self) {
        self.apply_level(Level::Debug);
    }

    /// Set the level to Info.
    pub fn set_info(&self) {
        self.apply_level(Level::Info);
    }

    /// Set the level to Warn.
    pub fn set_warn(&self) {
        self.apply_level(Level::Warn);
    }

    /// Set the level to Error.
    pub fn set_error(&self) {
        self.apply_level(Level::Error);
    }

    /// Set the level to Fatal.
    pub fn set_fatal(&self) {
        self.apply_level(Level::Fatal);
    }

    fn apply_level(&self, level: Level) {
        match self.registry.get().and_then(Weak::upgrade) {
            Some(registry) => registry.set_level_scoped(self, level),
            None => self.replace_level(level),
        }
    }

    // --- throttling ---

    /// A throttled view of this logger using the default 5 second period.
    ///
    /// Repeated calls with the same key on this logger return the same
    /// decorator instance; suppression state is kept per (logger, key).
    pub fn throttle(self: &Arc<Self>, key: &str) -> Arc<Throttled> {
        self.throttles.get(self, key, DEFAULT_THROTTLE_PERIOD)
    }

    /// A throttled view with an explicit suppression period. The period only
    /// applies when the key is first seen on this logger.
    pub fn throttle_with_period(self: &Arc<Self>, key: &str, period: Duration) -> Arc<Throttled> {
        self.throttles.get(self, key, period)
    }
}

/// Numeric id of the calling thread, falling back to the debug form when the
/// id cannot be extracted.
fn current_thread_id() -> Value {
    let raw = format!("{:?}", std::thread::current().id());
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.parse::<u64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::from(raw),
    }
}

/// Call site as "file:line", keeping only the last path component.
fn format_caller(location: &Location<'_>) -> String {
    let file = location
        .file()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(location.file());
    format!("{}:{}", file, location.line())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::handlers::memory::MemoryHandler;

    fn memory_config(level: &str) -> Config {
        Config {
            level: level.to_string(),
            handler: "memory".to_string(),
            ..Default::default()
        }
    }

    fn captured(logger: &Arc<Logger>) -> Vec<Entry> {
        logger
            .handler()
            .as_any()
            .downcast_ref::<MemoryHandler>()
            .expect("memory handler")
            .entries()
    }

    #[test]
    fn test_level_predicates() {
        let cases: [(&str, [bool; 6]); 6] = [
            ("trace", [true, true, true, true, true, true]),
            ("debug", [false, true, true, true, true, true]),
            ("info", [false, false, true, true, true, true]),
            ("warn", [false, false, false, true, true, true]),
            ("error", [false, false, false, false, true, true]),
            ("fatal", [false, false, false, false, false, true]),
        ];
        for (level, expected) in cases {
            let logger = Logger::new(&memory_config(level));
            let got = [
                logger.is_trace(),
                logger.is_debug(),
                logger.is_info(),
                logger.is_warn(),
                logger.is_error(),
                logger.is_fatal(),
            ];
            assert_eq!(got, expected, "level {}", level);
        }
    }

    #[test]
    fn test_emit_respects_threshold() {
        let logger = Logger::new(&memory_config("info"));
        logger.debug("dropped", &[]);
        logger.info("kept", &[]);
        let entries = captured(&logger);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "kept");
    }

    #[test]
    fn test_fatal_is_unconditional() {
        let logger = Logger::new(&memory_config("error"));
        logger.fatal("going down", &[]);
        assert_eq!(captured(&logger).len(), 1);
    }

    #[test]
    fn test_logger_field_bound_at_debug() {
        let logger = Logger::new(&memory_config("debug"));
        logger.info("msg", &[Field::new("user", "me")]);
        let entries = captured(&logger);
        assert_eq!(entries[0].field("logger"), Some(&Value::from("/")));
        assert_eq!(entries[0].field("user"), Some(&Value::from("me")));
    }

    #[test]
    fn test_memory_handler_bare_above_debug() {
        let logger = Logger::new(&memory_config("info"));
        logger.info("msg", &[]);
        let entries = captured(&logger);
        assert_eq!(entries[0].field("logger"), None);
    }

    #[test]
    fn test_thread_id_field() {
        let mut config = memory_config("debug");
        config.thread_id = Some(true);
        let logger = Logger::new(&config);
        logger.info("msg", &[]);
        let entries = captured(&logger);
        assert!(entries[0].field("tid").is_some());
    }

    #[test]
    fn test_caller_field_points_at_call_site() {
        let mut config = memory_config("debug");
        config.caller = Some(true);
        let logger = Logger::new(&config);
        logger.info("msg", &[]);
        let entries = captured(&logger);
        let caller = entries[0].field("caller").and_then(|v| v.as_str()).unwrap();
        assert!(caller.starts_with("handle.rs:"), "caller was {}", caller);
    }

    #[test]
    fn test_set_level_on_standalone_logger() {
        let logger = Logger::new(&memory_config("info"));
        assert!(!logger.is_debug());
        logger.set_debug();
        assert!(logger.is_debug());

        // invalid strings leave the prior level untouched
        logger.set_level("verbose");
        assert_eq!(logger.level(), Level::Debug);
    }

    #[test]
    fn test_set_level_keeps_other_fields() {
        let mut config = memory_config("debug");
        config.thread_id = Some(true);
        let logger = Logger::new(&config);
        let handler_before = logger.handler();
        logger.set_warn();
        assert!(Arc::ptr_eq(&handler_before, &logger.handler()));
        assert_eq!(logger.snapshot().config.thread_id, Some(true));
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let logger = Logger::new(&memory_config("normal"));
        assert_eq!(logger.level(), Level::Info);
    }

    #[test]
    fn test_concurrent_emit_and_set_level() {
        use std::thread;

        let logger = Logger::new(&memory_config("debug"));
        let mut handles = vec![];
        for i in 0..4 {
            let logger = Arc::clone(&logger);
            handles.push(thread::spawn(move || {
                for j in 0..100 {
                    if i == 0 && j % 10 == 0 {
                        logger.set_info();
                        logger.set_debug();
                    }
                    logger.info("spin", &[]);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(captured(&logger).len(), 400);
    }
}
