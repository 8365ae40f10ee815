//! Colored console backend for interactive use.

use std::fmt::Write as _;
use std::io;
use std::sync::Arc;
use std::time::Instant;

use crate::application::ports::{Handler, LogWriter};
use crate::domain::field::Entry;
use crate::domain::level::Level;

const RESET: &str = "\x1b[0m";

/// Renders compact colored lines with the elapsed time since the handler was
/// created instead of wall-clock timestamps:
///
/// ```text
///    2.417 WARN retrying                 attempt=2
/// ```
pub struct ConsoleHandler {
    writer: Arc<dyn LogWriter>,
    start: Instant,
}

impl ConsoleHandler {
    pub fn new(writer: Arc<dyn LogWriter>) -> Self {
        ConsoleHandler {
            writer,
            start: Instant::now(),
        }
    }

    fn label(level: Level) -> (&'static str, &'static str) {
        // (ansi color, padded label)
        match level {
            Level::Trace => ("\x1b[90m", "TRCE"),
            Level::Debug => ("\x1b[36m", "DBG "),
            Level::Info => ("\x1b[32m", "    "),
            Level::Warn => ("\x1b[33m", "WARN"),
            Level::Error => ("\x1b[31m", "ERR!"),
            Level::Fatal => ("\x1b[35m", "FATL"),
        }
    }
}

impl Handler for ConsoleHandler {
    fn handle(&self, entry: &Entry) -> io::Result<()> {
        let elapsed = self.start.elapsed();
        let (color, label) = Self::label(entry.level);

        let mut line = String::new();
        let _ = write!(
            line,
            "{:>4}.{:03} {}{}{} {:<25}",
            elapsed.as_secs(),
            elapsed.subsec_millis(),
            color,
            label,
            RESET,
            entry.message
        );
        for field in &entry.fields {
            let _ = write!(
                line,
                " {}{}={}{}",
                color,
                field.name,
                field.display_value(),
                RESET
            );
        }
        line.push('\n');
        self.writer.write(line.as_bytes())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
