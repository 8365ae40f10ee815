//! Rate-limited logging decorator.
//!
//! A `Throttled` wraps a logger and forwards at most one entry per key and
//! period; everything in between is counted, not written. When an entry passes
//! after a suppression window, the dropped count and the window length are
//! attached as `suppressed` and `throttle_period` fields so readers can tell
//! how much was elided.

use dashmap::DashMap;
use std::panic::Location;
use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, Instant};

use crate::application::handle::Logger;
use crate::application::ports::Clock;
use crate::domain::field::Field;
use crate::domain::level::Level;

/// Period used by `Logger::throttle` when none is given.
pub const DEFAULT_THROTTLE_PERIOD: Duration = Duration::from_secs(5);

/// Per-logger cache of throttle decorators, keyed by the caller-chosen key.
///
/// The first call for a key fixes the decorator (and its period); later calls
/// with the same key share its suppression state.
pub(crate) struct ThrottleCache {
    map: DashMap<String, Arc<Throttled>, ahash::RandomState>,
}

impl ThrottleCache {
    pub(crate) fn new() -> Self {
        ThrottleCache {
            map: DashMap::with_hasher(ahash::RandomState::new()),
        }
    }

    pub(crate) fn get(&self, owner: &Arc<Logger>, key: &str, period: Duration) -> Arc<Throttled> {
        self.map
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Throttled::new(owner, period)))
            .clone()
    }
}

#[derive(Default)]
struct ThrottleState {
    suppressed: u64,
    last_pass: Option<Instant>,
}

/// A throttled view of a logger.
///
/// Holds a weak reference to its owner so that cached decorators never keep a
/// dropped logger alive; calls on an orphaned decorator are no-ops.
pub struct Throttled {
    owner: Weak<Logger>,
    clock: Arc<dyn Clock>,
    period: Duration,
    state: Mutex<ThrottleState>,
}

impl Throttled {
    fn new(owner: &Arc<Logger>, period: Duration) -> Self {
        Throttled {
            owner: Arc::downgrade(owner),
            clock: owner.clock.clone(),
            period,
            state: Mutex::new(ThrottleState::default()),
        }
    }

    /// The suppression period of this decorator.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Logs the given message at the Trace level, subject to throttling.
    #[track_caller]
    pub fn trace(&self, msg: &str, fields: &[Field]) {
        self.throttle(Level::Trace, msg, fields, Location::caller());
    }

    /// Logs the given message at the Debug level, subject to throttling.
    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[Field]) {
        self.throttle(Level::Debug, msg, fields, Location::caller());
    }

    /// Logs the given message at the Info level, subject to throttling.
    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[Field]) {
        self.throttle(Level::Info, msg, fields, Location::caller());
    }

    /// Logs the given message at the Warn level, subject to throttling.
    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[Field]) {
        self.throttle(Level::Warn, msg, fields, Location::caller());
    }

    /// Logs the given message at the Error level, subject to throttling.
    #[track_caller]
    pub fn error(&self, msg: &str, fields: &[Field]) {
        self.throttle(Level::Error, msg, fields, Location::caller());
    }

    /// Logs the given message at the Fatal level. Fatal entries bypass
    /// throttling entirely and do not touch the suppression state.
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: &[Field]) {
        if let Some(owner) = self.owner.upgrade() {
            owner.emit(Level::Fatal, msg, fields, Location::caller());
        }
    }

    fn throttle(
        &self,
        level: Level,
        msg: &str,
        fields: &[Field],
        caller: &'static Location<'static>,
    ) {
        let Some(owner) = self.owner.upgrade() else {
            return;
        };
        // level filtering happens before the gate: a call the logger would
        // drop anyway neither passes nor counts as suppressed
        if !owner.enabled(level) {
            return;
        }

        let now = self.clock.now();
        let mut suppressed = None;
        let pass = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            match state.last_pass {
                None => {
                    state.last_pass = Some(now);
                    true
                }
                Some(last) if now.duration_since(last) >= self.period => {
                    suppressed = Some(state.suppressed);
                    state.suppressed = 0;
                    state.last_pass = Some(now);
                    true
                }
                Some(_) => {
                    state.suppressed += 1;
                    false
                }
            }
        };
        if !pass {
            return;
        }

        match suppressed {
            Some(count) => {
                let mut all = fields.to_vec();
                all.push(Field::new("suppressed", count));
                all.push(Field::new("throttle_period", format!("{:?}", self.period)));
                owner.emit(level, msg, &all, caller);
            }
            None => owner.emit(level, msg, fields, caller),
        }
    }
}
