//! Text backend with verbatim payloads.

use std::fmt::Write as _;
use std::io;
use std::sync::Arc;

use crate::application::ports::{Handler, LogWriter};
use crate::domain::field::Entry;
use crate::infrastructure::handlers::format_timestamp;

/// Like the text backend, but a `raw` field is printed verbatim on its own
/// lines below the record instead of inline. Useful for dumping multi-line
/// payloads (request bodies, stack traces) without escaping. The `logger`
/// field is omitted to keep the record short.
pub struct RawHandler {
    writer: Arc<dyn LogWriter>,
}

impl RawHandler {
    pub fn new(writer: Arc<dyn LogWriter>) -> Self {
        RawHandler { writer }
    }
}

impl Handler for RawHandler {
    fn handle(&self, entry: &Entry) -> io::Result<()> {
        let mut line = String::new();
        let _ = write!(
            line,
            "{} {:<25}",
            format_timestamp(&entry.timestamp),
            entry.message
        );
        let mut raw = None;
        for field in &entry.fields {
            match field.name.as_str() {
                "raw" => raw = field.value.as_str().filter(|s| !s.is_empty()),
                "logger" => {}
                _ => {
                    let _ = write!(line, " {}={}", field.name, field.display_value());
                }
            }
        }
        line.push('\n');
        if let Some(payload) = raw {
            line.push_str(payload);
            line.push('\n');
        }
        self.writer.write(line.as_bytes())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
