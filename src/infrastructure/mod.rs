//! Infrastructure layer - external adapters and integrations.
//!
//! This layer provides adapters for:
//! - Clock abstraction (system time vs mock)
//! - Rendering backends (text, raw, console, json, memory, discard)
//! - Byte sinks (stdout, size-rotated files)

pub mod clock;
pub mod handlers;
pub mod mocks;
pub mod rotate;
pub mod stdout;
