//! Rendering backends.
//!
//! Each handler turns a log entry into bytes for a `LogWriter`:
//! - `json`: one JSON object per line (the fallback for unknown kinds)
//! - `text`: aligned human-readable lines
//! - `raw`: like `text`, with an embedded `raw` payload printed verbatim
//! - `console`: colored output for interactive use
//! - `memory`: captures entries in memory, mainly for tests
//! - `discard`: drops everything

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::application::ports::{Handler, LogWriter};

pub mod console;
pub mod discard;
pub mod json;
pub mod memory;
pub mod raw;
pub mod text;

/// Construct the handler for a backend kind. Unknown kinds get `json`.
pub fn for_kind(kind: &str, writer: Arc<dyn LogWriter>) -> Arc<dyn Handler> {
    match kind {
        "text" => Arc::new(text::TextHandler::new(writer)),
        "raw" => Arc::new(raw::RawHandler::new(writer)),
        "console" => Arc::new(console::ConsoleHandler::new(writer)),
        "memory" => Arc::new(memory::MemoryHandler::new()),
        "discard" => Arc::new(discard::DiscardHandler),
        _ => Arc::new(json::JsonHandler::new(writer)),
    }
}

/// Timestamp form shared by the plain-text backends.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::stdout::StdoutWriter;

    fn writer() -> Arc<dyn LogWriter> {
        Arc::new(StdoutWriter)
    }

    #[test]
    fn test_unknown_kind_falls_back_to_json() {
        let handler = for_kind("syslog", writer());
        assert!(handler.as_any().is::<json::JsonHandler>());
    }

    #[test]
    fn test_known_kinds() {
        assert!(for_kind("text", writer()).as_any().is::<text::TextHandler>());
        assert!(for_kind("raw", writer()).as_any().is::<raw::RawHandler>());
        assert!(for_kind("console", writer())
            .as_any()
            .is::<console::ConsoleHandler>());
        assert!(for_kind("memory", writer())
            .as_any()
            .is::<memory::MemoryHandler>());
        assert!(for_kind("discard", writer())
            .as_any()
            .is::<discard::DiscardHandler>());
    }
}
