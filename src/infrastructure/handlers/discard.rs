//! Backend that drops everything.

use std::io;

use crate::application::ports::Handler;
use crate::domain::field::Entry;

/// Discards every entry. Level filtering still happens upstream, so this is
/// the cheapest way to disable a logger's output entirely.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardHandler;

impl Handler for DiscardHandler {
    fn handle(&self, _entry: &Entry) -> io::Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
