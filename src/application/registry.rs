//! Hierarchical logger registry.
//!
//! The registry owns the root configuration and a map of named loggers keyed
//! by absolute rooted path (`/a/b/c`). Resolution walks the path from the root
//! and merges the config entries found along the way, so a logger inherits
//! every setting its ancestors pin down and overrides only what its own entry
//! sets. All structural changes happen under one mutex; emission never takes
//! it.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::application::handle::{build_state, Logger, LoggerState};
use crate::application::ports::{Clock, LogWriter};
use crate::domain::config::Config;
use crate::domain::level::Level;
use crate::infrastructure::clock::SystemClock;

/// Registry of hierarchically named loggers.
///
/// Cloning is cheap and yields a handle to the same registry.
#[derive(Clone)]
pub struct LogRegistry {
    inner: Arc<RegistryInner>,
}

pub(crate) struct RegistryInner {
    state: Mutex<Registered>,
    clock: Arc<dyn Clock>,
}

struct Registered {
    default_config: Config,
    root: Arc<Logger>,
    named: BTreeMap<String, Arc<Logger>>,
}

impl LogRegistry {
    /// Create a registry with the built-in default configuration: `info`
    /// level, `text` backend, stdout.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    /// Create a registry with an explicit clock for the throttle decorators of
    /// its loggers.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let default_config = Config {
            level: "info".to_string(),
            handler: "text".to_string(),
            ..Default::default()
        };
        let root = Arc::new(Logger::from_state(
            build_state(&default_config, "/", None, None),
            clock.clone(),
        ));
        let inner = Arc::new(RegistryInner {
            state: Mutex::new(Registered {
                default_config,
                root: root.clone(),
                named: BTreeMap::new(),
            }),
            clock,
        });
        root.attach_registry(&inner);
        LogRegistry { inner }
    }

    /// The root logger (path `/`).
    pub fn root(&self) -> Arc<Logger> {
        self.inner.lock().root.clone()
    }

    /// Get or create the logger for the given path.
    ///
    /// Paths are normalized to rooted form (`"a/b"` resolves as `"/a/b"`);
    /// empty and `"/"` return the root. Repeated calls with the same path
    /// return the identical handle. Resolution materializes intermediate
    /// loggers for ancestors that have their own config entry, so their
    /// handles exist for later scoped level changes.
    pub fn get(&self, path: &str) -> Arc<Logger> {
        if path.is_empty() || path == "/" {
            return self.root();
        }
        let rooted;
        let path = if path.starts_with('/') {
            path
        } else {
            rooted = format!("/{}", path);
            &rooted
        };

        let mut st = self.inner.lock();
        if let Some(existing) = st.named.get(path) {
            return existing.clone();
        }

        // walk the path from the root, merging config entries as we go and
        // tracking the nearest ancestor logger for sink sharing
        let mut conf = st.default_config.clone();
        let mut nearest = st.root.clone();
        let mut nearest_path = String::from("/");
        let mut prefix = String::new();

        for segment in path[1..].split('/').filter(|s| !s.is_empty()) {
            prefix.push('/');
            prefix.push_str(segment);

            if let Some(existing) = st.named.get(prefix.as_str()).cloned() {
                // adopt the resolved config of the existing ancestor
                conf = existing.snapshot().config.clone();
                nearest = existing;
                nearest_path.clone_from(&prefix);
            } else if let Some(entry) = st.default_config.named.get(prefix.as_str()).cloned() {
                conf.merge_from(&entry);
                let created = self.register(&mut st, &prefix, &conf, &nearest);
                nearest = created;
                nearest_path.clone_from(&prefix);
            }
        }

        if nearest_path == *path {
            return nearest;
        }
        let parent = nearest.clone();
        self.register(&mut st, path, &conf, &parent)
    }

    fn register(
        &self,
        st: &mut MutexGuard<'_, Registered>,
        path: &str,
        conf: &Config,
        parent: &Arc<Logger>,
    ) -> Arc<Logger> {
        let parent_state = parent.snapshot();
        let logger = Arc::new(Logger::from_state(
            build_state(conf, path, Some(&parent_state), None),
            self.inner.clock.clone(),
        ));
        logger.attach_registry(&self.inner);
        st.named.insert(path.to_string(), logger.clone());
        logger
    }

    /// Replace the root configuration and rebuild every registered logger
    /// against it.
    ///
    /// A config deep-equal to the current one is a complete no-op: no handle
    /// is touched and no file is reopened. Otherwise each handle keeps its
    /// identity and atomically receives its newly resolved snapshot; an
    /// unchanged output target keeps its open writer, a changed one has the
    /// old writer closed best-effort.
    pub fn set_default(&self, config: &Config) {
        let mut st = self.inner.lock();
        if st.default_config == *config {
            return;
        }

        let old_root = st.root.snapshot();
        st.root
            .replace_state(build_state(config, "/", None, Some(&old_root)));
        close_replaced_writer(&old_root, &st.root.snapshot());
        st.default_config = config.clone();

        // sorted iteration keeps parents ahead of children, so a child can
        // share the handler its parent just built
        let paths: Vec<String> = st.named.keys().cloned().collect();
        for path in paths {
            let logger = st.named[&path].clone();

            let mut conf = config.clone();
            let mut parent = st.root.clone();
            let mut prefix = String::new();
            for segment in path[1..].split('/').filter(|s| !s.is_empty()) {
                prefix.push('/');
                prefix.push_str(segment);
                if let Some(entry) = config.named.get(prefix.as_str()) {
                    conf.merge_from(entry);
                }
                if prefix != path {
                    if let Some(ancestor) = st.named.get(prefix.as_str()) {
                        parent = ancestor.clone();
                    }
                }
            }

            let old = logger.snapshot();
            let parent_state = parent.snapshot();
            logger.replace_state(build_state(&conf, &path, Some(&parent_state), Some(&old)));
            close_replaced_writer(&old, &logger.snapshot());
        }
    }

    /// The current root configuration, including its named entries.
    pub fn default_config(&self) -> Config {
        self.inner.lock().default_config.clone()
    }

    /// Close the log files of all registered loggers, best-effort.
    pub fn close_all(&self) {
        let st = self.inner.lock();
        for logger in st.named.values() {
            close_writer(logger);
        }
        close_writer(&st.root);
    }
}

impl Default for LogRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryInner {
    fn lock(&self) -> MutexGuard<'_, Registered> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply a level change to `origin` and every registered descendant.
    ///
    /// Scoping is by path segment: `/ab` covers `/ab` and `/ab/x` but not
    /// `/abc`. The root covers everything.
    pub(crate) fn set_level_scoped(&self, origin: &Logger, level: Level) {
        let st = self.lock();
        let origin_path = origin.snapshot().name.clone();
        for (path, logger) in st.named.iter() {
            if is_path_prefix(&origin_path, path) {
                logger.replace_level(level);
            }
        }
        if !st.named.contains_key(origin_path.as_str()) {
            origin.replace_level(level);
        }
    }
}

fn is_path_prefix(prefix: &str, path: &str) -> bool {
    if prefix.is_empty() || prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

fn close_writer(logger: &Arc<Logger>) {
    if let Some(writer) = &logger.snapshot().writer {
        let _ = writer.close();
    }
}

/// Close the old snapshot's writer if the rebuild did not carry it over.
fn close_replaced_writer(old: &LoggerState, new: &LoggerState) {
    if let Some(old_writer) = &old.writer {
        let kept = new
            .writer
            .as_ref()
            .is_some_and(|w| Arc::ptr_eq(w, old_writer));
        if !kept {
            let _ = old_writer.close();
        }
    }
}
