//! Mock implementations for testing.
//!
//! This module provides test doubles for infrastructure adapters, enabling
//! deterministic testing of time-based behavior such as throttling. It is
//! always compiled so that integration tests and downstream crates can use it.

pub mod clock;

pub use clock::MockClock;
