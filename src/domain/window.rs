//! The sliding-window event buffer.
//!
//! [`Window`] is the pure aggregation core: a time-ordered buffer of recent
//! events that self-expires without a background sweep. Time is always passed
//! in as an argument, so the type has no clock dependency and tests drive it
//! deterministically.

use crate::domain::point::{RequestPoint, SummaryEntry};
use crate::domain::transform::TransformPolicy;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Error returned when constructing a window fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowError {
    /// Window duration must be greater than zero
    ZeroWindow,
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::ZeroWindow => {
                write!(f, "window duration must be greater than 0")
            }
        }
    }
}

impl std::error::Error for WindowError {}

/// A point plus the instant it was recorded.
///
/// The timestamp is assigned at ingest time, not event-generation time, so
/// clock skew or network delay on the sender side cannot distort the window.
#[derive(Debug, Clone)]
struct StampedPoint {
    point: RequestPoint,
    recorded_at: Instant,
}

/// A self-pruning sliding window of request points under one transform policy.
///
/// Entries are appended at the tail with non-decreasing timestamps, and every
/// public operation first discards entries that have aged out. This makes the
/// buffer self-bounding with O(window churn) amortized cost and no separate
/// scheduler to manage or race against.
pub struct Window {
    duration: Duration,
    policy: Box<dyn TransformPolicy>,
    buffer: VecDeque<StampedPoint>,
}

impl Window {
    /// Create a window retaining events for `duration`.
    ///
    /// # Errors
    /// Returns [`WindowError::ZeroWindow`] if `duration` is zero; a window
    /// that retains nothing is not meaningful.
    pub fn new(duration: Duration, policy: Box<dyn TransformPolicy>) -> Result<Self, WindowError> {
        if duration.is_zero() {
            return Err(WindowError::ZeroWindow);
        }

        Ok(Self {
            duration,
            policy,
            buffer: VecDeque::new(),
        })
    }

    /// Drop entries that have aged out of the window.
    ///
    /// Entries are time-ordered, so the scan stops at the first entry still
    /// inside the window; when nothing is still valid the loop drains the
    /// buffer entirely. An entry recorded at `t` is expired at `t + duration`.
    fn prune(&mut self, now: Instant) {
        while let Some(oldest) = self.buffer.front() {
            if now.saturating_duration_since(oldest.recorded_at) >= self.duration {
                self.buffer.pop_front();
            } else {
                break;
            }
        }
    }

    /// Record a point, stamped with `now`.
    ///
    /// Total for well-formed input; expired entries are pruned first so the
    /// ordering invariant holds even under arbitrarily fast insertion.
    pub fn record(&mut self, point: RequestPoint, now: Instant) {
        self.prune(now);
        self.buffer.push_back(StampedPoint {
            point,
            recorded_at: now,
        });
    }

    /// Aggregate the surviving entries into summary buckets.
    ///
    /// Maps every entry through the policy, accumulates weight per distinct
    /// (endpoint, success) bucket in first-occurrence order, then reduces
    /// each accumulated weight into its reported count. Beyond pruning this
    /// does not mutate the buffer, so repeated calls at the same instant
    /// return identical results. An empty window yields an empty vec.
    pub fn summarize(&mut self, now: Instant) -> Vec<SummaryEntry> {
        self.prune(now);

        let mut buckets: Vec<(String, bool, f64)> = Vec::new();
        for stamped in &self.buffer {
            let mapped = self.policy.bucket(&stamped.point);
            match buckets
                .iter_mut()
                .find(|(endpoint, success, _)| *endpoint == mapped.endpoint && *success == mapped.success)
            {
                Some((_, _, weight)) => *weight += mapped.weight,
                None => buckets.push((mapped.endpoint, mapped.success, mapped.weight)),
            }
        }

        buckets
            .into_iter()
            .map(|(endpoint, success, weight)| SummaryEntry {
                endpoint,
                success,
                count: self.policy.reduce(weight),
            })
            .collect()
    }

    /// Number of entries currently buffered, including not-yet-pruned ones.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check whether the buffer holds no entries.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The retention duration this window was constructed with.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("duration", &self.duration)
            .field("entries", &self.buffer.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transform::{RedactingPolicy, UncensoredPolicy};

    fn uncensored_window(duration: Duration) -> Window {
        Window::new(duration, Box::new(UncensoredPolicy::new())).unwrap()
    }

    #[test]
    fn test_zero_window_rejected() {
        let result = Window::new(Duration::ZERO, Box::new(UncensoredPolicy::new()));
        assert_eq!(result.err(), Some(WindowError::ZeroWindow));
    }

    #[test]
    fn test_empty_window_summary() {
        let mut window = uncensored_window(Duration::from_secs(5));
        assert!(window.summarize(Instant::now()).is_empty());
    }

    #[test]
    fn test_event_visible_within_window() {
        let mut window = uncensored_window(Duration::from_millis(5000));
        let start = Instant::now();

        window.record(RequestPoint::new("processJob", true, 50.0), start);

        let summary = window.summarize(start + Duration::from_millis(4999));
        assert_eq!(
            summary,
            vec![SummaryEntry {
                endpoint: "processJob".to_string(),
                success: true,
                count: 1,
            }]
        );
    }

    #[test]
    fn test_event_expired_at_window_boundary() {
        let mut window = uncensored_window(Duration::from_millis(5000));
        let start = Instant::now();

        window.record(RequestPoint::new("processJob", true, 50.0), start);

        // At exactly start + window the entry is gone.
        assert!(window
            .summarize(start + Duration::from_millis(5000))
            .is_empty());
    }

    #[test]
    fn test_partial_expiry_keeps_newer_entries() {
        let mut window = uncensored_window(Duration::from_millis(1000));
        let start = Instant::now();

        window.record(RequestPoint::new("old", true, 1.0), start);
        window.record(
            RequestPoint::new("new", true, 1.0),
            start + Duration::from_millis(800),
        );

        let summary = window.summarize(start + Duration::from_millis(1100));
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].endpoint, "new");
    }

    #[test]
    fn test_record_prunes_before_append() {
        let mut window = uncensored_window(Duration::from_millis(100));
        let start = Instant::now();

        window.record(RequestPoint::new("a", true, 1.0), start);
        window.record(
            RequestPoint::new("b", true, 1.0),
            start + Duration::from_millis(200),
        );

        // The first entry was pruned during the second record call.
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_success_and_failure_are_distinct_buckets() {
        let mut window = uncensored_window(Duration::from_secs(60));
        let now = Instant::now();

        for _ in 0..3 {
            window.record(RequestPoint::new("processJob", true, 10.0), now);
        }
        for _ in 0..2 {
            window.record(RequestPoint::new("processJob", false, 10.0), now);
        }

        let mut summary = window.summarize(now);
        summary.sort_by_key(|entry| entry.success);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].success, false);
        assert_eq!(summary[0].count, 2);
        assert_eq!(summary[1].success, true);
        assert_eq!(summary[1].count, 3);
    }

    #[test]
    fn test_summary_idempotent_without_new_points() {
        let mut window = uncensored_window(Duration::from_secs(60));
        let now = Instant::now();

        window.record(RequestPoint::new("a", true, 1.0), now);
        window.record(RequestPoint::new("b", false, 1.0), now);

        let first = window.summarize(now);
        let second = window.summarize(now);
        let third = window.summarize(now);

        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn test_redacting_window_accumulates_duration_weight() {
        let mut window = Window::new(
            Duration::from_secs(5),
            Box::new(RedactingPolicy::new(["processJob"])),
        )
        .unwrap();
        let now = Instant::now();

        // Two unknown-endpoint successes summing to 400ms of duration.
        window.record(RequestPoint::new("hiddenA", true, 250.0), now);
        window.record(RequestPoint::new("hiddenB", true, 150.0), now);

        let summary = window.summarize(now);
        assert_eq!(
            summary,
            vec![SummaryEntry {
                endpoint: "stuff".to_string(),
                success: true,
                count: 20, // round(sqrt(400))
            }]
        );
    }

    #[test]
    fn test_full_expiry_clears_buffer() {
        let mut window = uncensored_window(Duration::from_millis(10));
        let start = Instant::now();

        for i in 0..5 {
            window.record(
                RequestPoint::new("e", true, 1.0),
                start + Duration::from_millis(i),
            );
        }
        assert_eq!(window.len(), 5);

        assert!(window.summarize(start + Duration::from_secs(1)).is_empty());
        assert!(window.is_empty());
    }
}
