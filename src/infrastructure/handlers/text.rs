//! Human-readable text backend.

use std::fmt::Write as _;
use std::io;
use std::sync::Arc;

use crate::application::ports::{Handler, LogWriter};
use crate::domain::field::Entry;
use crate::infrastructure::handlers::format_timestamp;

/// Renders aligned single-line records:
///
/// ```text
/// 2023-01-12T14:35:44.854Z INFO  starting up              logger=/svc tid=1
/// ```
///
/// An `error` field is moved to the end of the line so the message and the
/// regular fields stay aligned.
pub struct TextHandler {
    writer: Arc<dyn LogWriter>,
}

impl TextHandler {
    pub fn new(writer: Arc<dyn LogWriter>) -> Self {
        TextHandler { writer }
    }
}

impl Handler for TextHandler {
    fn handle(&self, entry: &Entry) -> io::Result<()> {
        let mut line = String::new();
        let _ = write!(
            line,
            "{} {:<5} {:<25}",
            format_timestamp(&entry.timestamp),
            entry.level,
            entry.message
        );
        let mut error_field = None;
        for field in &entry.fields {
            if field.name == "error" {
                error_field = Some(field);
                continue;
            }
            let _ = write!(line, " {}={}", field.name, field.display_value());
        }
        if let Some(field) = error_field {
            let _ = write!(line, " {}={}", field.name, field.display_value());
        }
        line.push('\n');
        self.writer.write(line.as_bytes())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
