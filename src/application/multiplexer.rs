//! Fan-out of one ingress stream to several independent counters.

use crate::application::ports::PointSink;
use crate::domain::point::RequestPoint;
use std::sync::Arc;

/// Broadcasts each incoming point to every registered receiver.
///
/// Receivers share no state and each maintains its own window and policy.
/// Dispatch is sequential; receivers are cheap in-memory operations, so a
/// slow receiver cannot meaningfully stall the others. Because the
/// multiplexer itself implements [`PointSink`], multiplexers compose.
pub struct Multiplexer {
    receivers: Vec<Arc<dyn PointSink>>,
}

impl Multiplexer {
    /// Create a multiplexer over the given receivers.
    pub fn new(receivers: Vec<Arc<dyn PointSink>>) -> Self {
        Self { receivers }
    }

    /// Number of receivers this multiplexer dispatches to.
    pub fn receiver_count(&self) -> usize {
        self.receivers.len()
    }
}

impl PointSink for Multiplexer {
    fn accept(&self, point: RequestPoint) {
        for receiver in &self.receivers {
            receiver.accept(point.clone());
        }
    }
}

impl std::fmt::Debug for Multiplexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Multiplexer")
            .field("receivers", &self.receivers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingSink {
        points: Mutex<Vec<RequestPoint>>,
    }

    impl RecordingSink {
        fn recorded(&self) -> Vec<RequestPoint> {
            self.points.lock().unwrap().clone()
        }
    }

    impl PointSink for RecordingSink {
        fn accept(&self, point: RequestPoint) {
            self.points.lock().unwrap().push(point);
        }
    }

    #[test]
    fn test_fan_out_reaches_all_receivers() {
        let first = Arc::new(RecordingSink::default());
        let second = Arc::new(RecordingSink::default());
        let mux = Multiplexer::new(vec![first.clone(), second.clone()]);

        let point = RequestPoint::new("processJob", true, 50.0);
        mux.accept(point.clone());

        assert_eq!(first.recorded(), vec![point.clone()]);
        assert_eq!(second.recorded(), vec![point]);
    }

    #[test]
    fn test_empty_multiplexer_is_a_no_op() {
        let mux = Multiplexer::new(Vec::new());
        mux.accept(RequestPoint::new("processJob", true, 1.0));
        assert_eq!(mux.receiver_count(), 0);
    }

    #[test]
    fn test_multiplexers_compose() {
        let leaf = Arc::new(RecordingSink::default());
        let inner = Arc::new(Multiplexer::new(vec![leaf.clone()]));
        let outer = Multiplexer::new(vec![inner]);

        outer.accept(RequestPoint::new("play", false, 3.0));

        assert_eq!(leaf.recorded().len(), 1);
        assert_eq!(leaf.recorded()[0].endpoint, "play");
    }
}
