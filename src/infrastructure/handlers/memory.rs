//! In-memory capturing backend.

use std::io;
use std::sync::Mutex;

use crate::application::ports::Handler;
use crate::domain::field::Entry;

/// Captures entries in memory instead of writing them anywhere. Used by tests
/// to assert on what was logged; retrieve it through `Logger::handler` and
/// `as_any` downcasting.
#[derive(Debug, Default)]
pub struct MemoryHandler {
    entries: Mutex<Vec<Entry>>,
}

impl MemoryHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of all captured entries, in emission order.
    pub fn entries(&self) -> Vec<Entry> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of captured entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all captured entries.
    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl Handler for MemoryHandler {
    fn handle(&self, entry: &Entry) -> io::Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry.clone());
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
