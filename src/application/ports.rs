//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the
//! application layer needs. Infrastructure adapters implement or consume
//! these ports.

use crate::domain::point::RequestPoint;
use std::fmt::Debug;
use std::time::Instant;

/// Port for obtaining current time.
///
/// This abstraction allows the application layer to work with time without
/// depending on system clock implementation details. Infrastructure provides
/// concrete implementations (SystemClock, MockClock).
pub trait Clock: Send + Sync + Debug {
    /// Get the current instant.
    fn now(&self) -> Instant;
}

/// Port for components that accept request-completion points.
///
/// The ingress adapter pushes every valid datagram through this interface.
/// Both leaf counters and the fan-out multiplexer implement it, so sinks
/// compose: a multiplexer can feed counters and other multiplexers alike.
pub trait PointSink: Send + Sync {
    /// Accept one point.
    ///
    /// Never fails: malformed input is rejected upstream at the ingress
    /// boundary, and sinks must tolerate being called arbitrarily fast from
    /// concurrent tasks.
    fn accept(&self, point: RequestPoint);
}
