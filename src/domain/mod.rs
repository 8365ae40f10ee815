//! Domain layer - pure data types with no external integrations.
//!
//! This layer contains the core concepts of the logging system:
//! - Severity levels and their ordering
//! - Structured fields and log entries
//! - The recursive logger configuration and its merge rules
//!
//! All types in this layer are plain data and easily testable.

pub mod config;
pub mod field;
pub mod level;
