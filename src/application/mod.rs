//! Application layer - orchestration.
//!
//! Binds the pure domain window to clocks and concurrency (counters), fans
//! one ingress stream out to several counters (multiplexer), and tracks
//! ingress metrics. Depends only on the domain layer and its own ports.

pub mod counter;
pub mod metrics;
pub mod multiplexer;
pub mod ports;
