//! Transform policies mapping raw points into reporting buckets.
//!
//! A policy is a pure strategy pair: a per-event mapping from a
//! [`RequestPoint`] to a weighted reporting bucket, and a reduction from an
//! accumulated bucket weight to the publicly reported count. One policy
//! instance is bound to each windowed counter at construction and never
//! mutated afterwards.

use crate::domain::point::RequestPoint;
use std::collections::BTreeSet;

/// A reporting bucket with the weight one event contributes to it.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedBucket {
    /// Endpoint name under which the event is reported
    pub endpoint: String,
    /// Outcome under which the event is reported
    pub success: bool,
    /// Numeric contribution to the bucket's accumulator
    pub weight: f64,
}

/// Strategy for converting raw events into reported summary buckets.
///
/// Both methods are pure: they may not observe or mutate anything beyond
/// their arguments, so policies are trivially testable in isolation.
pub trait TransformPolicy: Send + Sync {
    /// Map one event to the bucket it contributes to and its weight.
    fn bucket(&self, point: &RequestPoint) -> WeightedBucket;

    /// Reduce an accumulated bucket weight into the reported count.
    fn reduce(&self, total_weight: f64) -> u64;
}

/// Identity policy: verbatim endpoint and outcome, one unit of weight per
/// event, reported count equal to the raw event count.
///
/// Suitable for internal or staging visibility where exact endpoint names
/// and traffic volumes are fine to expose.
#[derive(Debug, Clone, Copy, Default)]
pub struct UncensoredPolicy;

impl UncensoredPolicy {
    /// Create a new identity policy.
    pub fn new() -> Self {
        Self
    }
}

impl TransformPolicy for UncensoredPolicy {
    fn bucket(&self, point: &RequestPoint) -> WeightedBucket {
        WeightedBucket {
            endpoint: point.endpoint.clone(),
            success: point.success,
            weight: 1.0,
        }
    }

    fn reduce(&self, total_weight: f64) -> u64 {
        total_weight.round() as u64
    }
}

/// Redacting policy for publicly visible summaries.
///
/// The mapping is deliberately lossy:
/// - failures collapse into a single `("error", false)` bucket, weighted by
///   request duration rather than unit count, so the failure "count" is an
///   accumulated-latency proxy metric;
/// - successful events whose endpoint is not in the allow-list are remapped
///   to the [`FALLBACK_ENDPOINT`](Self::FALLBACK_ENDPOINT) bucket so internal
///   endpoint names never leak;
/// - the reduction is `round(sqrt(w))`, compressing large duration sums into
///   small coarse numbers that still convey relative magnitude and trend
///   while hiding exact traffic volume.
///
/// The allow-list is an explicit constructor argument, not a global, so each
/// deployment configures its own and policies stay independently testable.
#[derive(Debug, Clone)]
pub struct RedactingPolicy {
    allowed: BTreeSet<String>,
}

impl RedactingPolicy {
    /// Bucket name for successful events with a non-allow-listed endpoint.
    pub const FALLBACK_ENDPOINT: &'static str = "stuff";

    /// Bucket name for failed events.
    pub const ERROR_ENDPOINT: &'static str = "error";

    /// Create a redacting policy with the given endpoint allow-list.
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether an endpoint may appear verbatim in redacted output.
    pub fn is_allowed(&self, endpoint: &str) -> bool {
        self.allowed.contains(endpoint)
    }
}

impl TransformPolicy for RedactingPolicy {
    fn bucket(&self, point: &RequestPoint) -> WeightedBucket {
        if !point.success {
            return WeightedBucket {
                endpoint: Self::ERROR_ENDPOINT.to_string(),
                success: false,
                weight: point.duration_ms,
            };
        }

        let endpoint = if self.allowed.contains(&point.endpoint) {
            point.endpoint.clone()
        } else {
            Self::FALLBACK_ENDPOINT.to_string()
        };

        WeightedBucket {
            endpoint,
            success: true,
            weight: point.duration_ms,
        }
    }

    fn reduce(&self, total_weight: f64) -> u64 {
        // Half-up rounding on positive values, matching the numbers any
        // existing dashboard consumer expects.
        total_weight.max(0.0).sqrt().round() as u64
    }
}
