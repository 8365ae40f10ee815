//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use crate::domain::field::Entry;
use std::any::Any;
use std::fmt::Debug;
use std::io;
use std::time::Instant;

/// Port for obtaining current time.
///
/// This abstraction allows the application layer to work with time
/// without depending on system clock implementation details.
/// Infrastructure provides concrete implementations (SystemClock, MockClock).
pub trait Clock: Send + Sync + Debug {
    /// Get the current instant.
    fn now(&self) -> Instant;
}

/// Port for the backend log sink: renders and writes one log entry.
///
/// A handler receives the fully-assembled entry (level, message, fields) and
/// is responsible for formatting and output. Handlers must be safe for
/// concurrent calls; a failing call only fails that one emission.
pub trait Handler: Send + Sync {
    /// Render and write a single entry.
    fn handle(&self, entry: &Entry) -> io::Result<()>;

    /// Downcast support, mainly for retrieving the capturing `memory` handler
    /// in tests.
    fn as_any(&self) -> &dyn Any;
}

/// Port for the byte sink underneath a rendering backend.
///
/// Infrastructure provides a plain stdout implementation and a rotating file
/// writer. `close` is best-effort and called during shutdown.
pub trait LogWriter: Send + Sync {
    /// Append one formatted record to the output.
    fn write(&self, buf: &[u8]) -> io::Result<()>;

    /// Flush and release the underlying resource.
    fn close(&self) -> io::Result<()> {
        Ok(())
    }
}
