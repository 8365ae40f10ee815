//! Logger configuration.
//!
//! `Config` is a plain data description of a logger: level, rendering backend,
//! optional file-rotation settings, per-call feature flags, and configuration
//! entries for named child loggers. Unset fields (`""` / `None`) mean "inherit
//! from the parent" when configs are merged along a logger path.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Recursive logger configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Log level. Empty means inherit; unparseable values fall back to `info`.
    #[serde(default)]
    pub level: String,

    /// Rendering backend kind: `text`, `console`, `raw`, `json`, `discard`,
    /// `memory`. Unknown kinds fall back to `json`.
    #[serde(default)]
    pub handler: String,

    /// Log file settings. `None` (or an empty filename) logs to stdout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileConfig>,

    /// Include the calling thread id as a `tid` field. Defaults on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<bool>,

    /// Include the call site as a `caller` field (`file:line`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<bool>,

    /// Configuration of named loggers, keyed by absolute rooted path
    /// (e.g. `/service/db`). Nested `named` entries inside a child config
    /// are ignored; only this map is consulted during path resolution.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub named: BTreeMap<String, Config>,
}

impl Config {
    /// A config initialized with default values: `info` level, `json` backend,
    /// thread id field enabled.
    pub fn new() -> Self {
        Self {
            level: "info".to_string(),
            handler: "json".to_string(),
            thread_id: Some(true),
            ..Default::default()
        }
    }

    /// Merge the explicitly-set fields of `other` into `self`.
    ///
    /// Partial override: empty / `None` fields of `other` leave the current
    /// value untouched. The `named` map is never merged; it only has meaning
    /// on the root configuration.
    pub fn merge_from(&mut self, other: &Config) {
        if !other.level.is_empty() {
            self.level = other.level.clone();
        }
        if !other.handler.is_empty() {
            self.handler = other.handler.clone();
        }
        if other.file.is_some() {
            self.file = other.file.clone();
        }
        if other.thread_id.is_some() {
            self.thread_id = other.thread_id;
        }
        if other.caller.is_some() {
            self.caller = other.caller;
        }
    }

    /// File settings with the "empty filename means stdout" rule applied.
    pub fn effective_file(&self) -> Option<&FileConfig> {
        self.file.as_ref().filter(|f| !f.filename.is_empty())
    }

    /// Whether this config selects the same output as `other`: same backend
    /// kind and same effective file target. Used for sink reuse.
    pub fn same_output(&self, other: &Config) -> bool {
        self.handler == other.handler && self.effective_file() == other.effective_file()
    }

    pub fn include_thread_id(&self) -> bool {
        self.thread_id.unwrap_or(false)
    }

    pub fn include_caller(&self) -> bool {
        self.caller.unwrap_or(false)
    }
}

/// Rotation policy for file-backed loggers.
///
/// Mirrors the conventional rotating-file settings: size-triggered rotation
/// with a bounded number of time-stamped backups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    /// The file to write logs to. Backups are kept in the same directory.
    /// An empty filename is equivalent to no file settings (stdout).
    #[serde(default)]
    pub filename: String,

    /// Maximum size in megabytes before the file gets rotated. 0 means the
    /// default of 100 megabytes.
    #[serde(default, rename = "maxsize")]
    pub max_size: u64,

    /// Maximum number of days to retain old log files. 0 disables age-based
    /// removal.
    #[serde(default, rename = "maxage")]
    pub max_age: u32,

    /// Maximum number of old log files to retain. 0 retains all.
    #[serde(default, rename = "maxbackups")]
    pub max_backups: u32,

    /// Use local time instead of UTC in backup file names.
    #[serde(default, rename = "localtime")]
    pub local_time: bool,

    /// Compress rotated files. Accepted for config compatibility; the bundled
    /// writer does not gzip backups.
    #[serde(default)]
    pub compress: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = Config::new();
        assert_eq!(c.level, "info");
        assert_eq!(c.handler, "json");
        assert_eq!(c.thread_id, Some(true));
        assert_eq!(c.caller, None);
        assert!(c.file.is_none());
        assert!(c.named.is_empty());
    }

    #[test]
    fn test_merge_partial_override() {
        let mut target = Config::new();
        let over = Config {
            level: "debug".to_string(),
            ..Default::default()
        };
        target.merge_from(&over);
        assert_eq!(target.level, "debug");
        // unset fields inherit
        assert_eq!(target.handler, "json");
        assert_eq!(target.thread_id, Some(true));
    }

    #[test]
    fn test_merge_does_not_touch_named() {
        let mut target = Config::new();
        let mut over = Config::default();
        over.named.insert("/a".to_string(), Config::default());
        target.merge_from(&over);
        assert!(target.named.is_empty());
    }

    #[test]
    fn test_empty_filename_is_stdout() {
        let c = Config {
            file: Some(FileConfig::default()),
            ..Config::new()
        };
        assert!(c.effective_file().is_none());

        let stdout_config = Config::new();
        assert!(c.same_output(&stdout_config));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut c = Config::new();
        c.file = Some(FileConfig {
            filename: "/var/log/app.log".to_string(),
            max_size: 10,
            max_backups: 1,
            compress: true,
            ..Default::default()
        });
        c.named.insert(
            "/db".to_string(),
            Config {
                level: "debug".to_string(),
                ..Default::default()
            },
        );

        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"maxsize\":10"));
        assert!(json.contains("\"thread_id\":true"));
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
