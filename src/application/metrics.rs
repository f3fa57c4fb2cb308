//! Observability metrics for the ingress path.
//!
//! Datagram loss is expected and untracked (fire-and-forget transport), but
//! what does arrive is counted so rejection spikes are visible.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking ingress behavior.
///
/// All metrics use atomic operations for thread-safe updates and reads, and
/// the handle is cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct IngressMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Total number of datagrams received
    datagrams_received: AtomicU64,
    /// Total number of points forwarded to the sink
    points_accepted: AtomicU64,
    /// Total number of datagrams dropped as malformed
    datagrams_rejected: AtomicU64,
}

impl IngressMetrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                datagrams_received: AtomicU64::new(0),
                points_accepted: AtomicU64::new(0),
                datagrams_rejected: AtomicU64::new(0),
            }),
        }
    }

    /// Record an arriving datagram.
    pub(crate) fn record_received(&self) {
        self.inner.datagrams_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a datagram that parsed and validated.
    pub(crate) fn record_accepted(&self) {
        self.inner.points_accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a malformed datagram that was dropped.
    pub(crate) fn record_rejected(&self) {
        self.inner.datagrams_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the total number of datagrams received.
    pub fn datagrams_received(&self) -> u64 {
        self.inner.datagrams_received.load(Ordering::Relaxed)
    }

    /// Get the total number of points forwarded to the sink.
    pub fn points_accepted(&self) -> u64 {
        self.inner.points_accepted.load(Ordering::Relaxed)
    }

    /// Get the total number of datagrams dropped as malformed.
    pub fn datagrams_rejected(&self) -> u64 {
        self.inner.datagrams_rejected.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> IngressSnapshot {
        IngressSnapshot {
            datagrams_received: self.datagrams_received(),
            points_accepted: self.points_accepted(),
            datagrams_rejected: self.datagrams_rejected(),
        }
    }
}

impl Default for IngressMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of ingress metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngressSnapshot {
    /// Total number of datagrams received
    pub datagrams_received: u64,
    /// Total number of points forwarded to the sink
    pub points_accepted: u64,
    /// Total number of datagrams dropped as malformed
    pub datagrams_rejected: u64,
}

impl IngressSnapshot {
    /// Calculate the rejection rate (0.0 to 1.0).
    ///
    /// Returns 0.0 if no datagrams have been received.
    pub fn rejection_rate(&self) -> f64 {
        if self.datagrams_received == 0 {
            0.0
        } else {
            self.datagrams_rejected as f64 / self.datagrams_received as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_start_at_zero() {
        let metrics = IngressMetrics::new();
        assert_eq!(metrics.datagrams_received(), 0);
        assert_eq!(metrics.points_accepted(), 0);
        assert_eq!(metrics.datagrams_rejected(), 0);
    }

    #[test]
    fn test_metrics_recording() {
        let metrics = IngressMetrics::new();

        metrics.record_received();
        metrics.record_received();
        metrics.record_accepted();
        metrics.record_rejected();

        assert_eq!(metrics.datagrams_received(), 2);
        assert_eq!(metrics.points_accepted(), 1);
        assert_eq!(metrics.datagrams_rejected(), 1);
    }

    #[test]
    fn test_rejection_rate() {
        let metrics = IngressMetrics::new();
        assert_eq!(metrics.snapshot().rejection_rate(), 0.0);

        for _ in 0..4 {
            metrics.record_received();
        }
        metrics.record_rejected();

        assert_eq!(metrics.snapshot().rejection_rate(), 0.25);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = IngressMetrics::new();
        let clone = metrics.clone();

        metrics.record_received();
        clone.record_received();

        assert_eq!(metrics.datagrams_received(), 2);
    }
}
