//! Request-completion events and summary entries.
//!
//! These are the values that flow through the whole pipeline: a
//! [`RequestPoint`] enters through the ingress boundary, and a list of
//! [`SummaryEntry`] values leaves through the publishing surface.

use serde::{Deserialize, Serialize};

/// A single request-completion observation.
///
/// Immutable once created. The ingress adapter constructs these from raw
/// datagrams; counters never see malformed input because validation happens
/// at that boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPoint {
    /// Name of the endpoint that served the request
    pub endpoint: String,
    /// Whether the request completed successfully
    pub success: bool,
    /// Wall-clock duration of the request in milliseconds
    pub duration_ms: f64,
}

impl RequestPoint {
    /// Create a new request point.
    pub fn new(endpoint: impl Into<String>, success: bool, duration_ms: f64) -> Self {
        Self {
            endpoint: endpoint.into(),
            success,
            duration_ms,
        }
    }
}

/// One aggregated bucket reported by a summary.
///
/// Exactly one entry exists per distinct (endpoint, success) pair present in
/// the window at summarization time. The `count` has already been through the
/// policy's reduction, so for a redacting policy it is a compressed magnitude
/// rather than a raw event count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    /// Reported endpoint name, possibly remapped by the policy
    pub endpoint: String,
    /// Reported outcome
    pub success: bool,
    /// Reduced bucket weight
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_point_construction() {
        let point = RequestPoint::new("processJob", true, 50.0);
        assert_eq!(point.endpoint, "processJob");
        assert!(point.success);
        assert_eq!(point.duration_ms, 50.0);
    }

    #[test]
    fn test_summary_entry_json_shape() {
        let entry = SummaryEntry {
            endpoint: "processJob".to_string(),
            success: true,
            count: 3,
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"endpoint": "processJob", "success": true, "count": 3})
        );
    }

    #[test]
    fn test_summary_entry_round_trip() {
        let json = r#"{"endpoint":"error","success":false,"count":12}"#;
        let entry: SummaryEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.endpoint, "error");
        assert!(!entry.success);
        assert_eq!(entry.count, 12);
    }
}
