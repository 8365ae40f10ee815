//! Structured log fields and the log entry record.
//!
//! A log entry carries a static message plus named fields (key-value pairs).
//! Field values use `serde_json::Value` so that any serializable data can be
//! attached and rendered uniformly by all backends.

use crate::domain::level::Level;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// A named field attached to a log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

impl Field {
    /// Create a field from a name and any value convertible to a JSON value.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Render the value the way the textual backends print it: strings are
    /// printed bare, everything else in its JSON form.
    pub fn display_value(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// A single log record as handed to a rendering backend.
#[derive(Debug, Clone)]
pub struct Entry {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    pub fields: Vec<Field>,
}

impl Entry {
    /// Create an entry timestamped now.
    pub fn new(level: Level, message: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            fields,
        }
    }

    /// Look up a field value by name. First match wins.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }
}
