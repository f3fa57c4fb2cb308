//! Mock implementations for testing.
//!
//! Controllable test doubles used by this crate's own test suites and
//! available to downstream integration tests.

mod clock;

pub use clock::MockClock;
