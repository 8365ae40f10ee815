//! Application layer - the logger registry and its use cases.
//!
//! This layer orchestrates the domain types: resolving hierarchical logger
//! configurations, emitting entries through backend handlers, throttling
//! repeated messages, and reporting metrics. It depends on infrastructure only
//! through ports.

pub mod handle;
pub mod metrics;
pub mod ports;
pub mod registry;
pub mod throttle;
