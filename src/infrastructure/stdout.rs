//! Standard output writer.

use crate::application::ports::LogWriter;
use std::io::{self, Write};

/// Writer that appends records to stdout. The process-wide stdout lock makes
/// concurrent records come out whole.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutWriter;

impl LogWriter for StdoutWriter {
    fn write(&self, buf: &[u8]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(buf)
    }
}
