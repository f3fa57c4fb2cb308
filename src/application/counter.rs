//! Windowed counters: the sliding window bound to a clock.
//!
//! A [`WindowedCounter`] wraps the pure domain [`Window`] with a clock and a
//! mutex so that ingress tasks and summary requests can share it safely.

use crate::application::ports::{Clock, PointSink};
use crate::domain::point::{RequestPoint, SummaryEntry};
use crate::domain::transform::TransformPolicy;
use crate::domain::window::{Window, WindowError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// A thread-safe windowed counter for one aggregation policy.
///
/// Ingress and summarization may run on separate tasks, so a single mutex
/// guards the buffer; prune+append and prune+read are the only critical
/// sections and both are short and O(window size). Multiple counters are
/// fully independent and need no cross-instance coordination.
pub struct WindowedCounter {
    window: Mutex<Window>,
    clock: Arc<dyn Clock>,
}

impl WindowedCounter {
    /// Create a counter retaining events for `duration` under `policy`.
    ///
    /// # Errors
    /// Returns [`WindowError::ZeroWindow`] if `duration` is zero.
    pub fn new(
        duration: Duration,
        policy: Box<dyn TransformPolicy>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, WindowError> {
        Ok(Self {
            window: Mutex::new(Window::new(duration, policy)?),
            clock,
        })
    }

    /// Aggregate the current window contents into summary entries.
    ///
    /// Prunes expired entries first; an empty or fully aged-out window
    /// yields an empty vec, never an error.
    pub fn summary(&self) -> Vec<SummaryEntry> {
        let now = self.clock.now();
        self.lock_window().summarize(now)
    }

    /// Number of entries currently buffered.
    pub fn len(&self) -> usize {
        self.lock_window().len()
    }

    /// Check whether the buffer holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock_window().is_empty()
    }

    fn lock_window(&self) -> MutexGuard<'_, Window> {
        // A panic while holding the lock cannot leave the buffer in a
        // structurally invalid state, so a poisoned guard is still usable.
        self.window.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PointSink for WindowedCounter {
    fn accept(&self, point: RequestPoint) {
        let now = self.clock.now();
        self.lock_window().record(point, now);
    }
}

impl std::fmt::Debug for WindowedCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowedCounter")
            .field("window", &self.lock_window())
            .field("clock", &self.clock)
            .finish()
    }
}
