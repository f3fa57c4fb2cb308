//! UDP ingress adapter.
//!
//! Receives fire-and-forget JSON datagrams, validates them, and forwards
//! valid points to a [`PointSink`]. No response is ever sent and packet loss
//! is an accepted property of the transport; malformed datagrams are dropped
//! with a diagnostic log line and never surface as a counter error.

use crate::application::metrics::IngressMetrics;
use crate::application::ports::PointSink;
use crate::domain::point::RequestPoint;
use serde::Deserialize;
use std::io;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, error, info};

/// Largest datagram the receive loop will accept.
pub const MAX_DATAGRAM_BYTES: usize = 64 * 1024;

/// Status value that marks a request as successful; anything else is a
/// failure.
const SUCCESS_STATUS: &str = "ok";

/// Wire shape of one ingress datagram.
#[derive(Debug, Deserialize)]
struct BeaconWire {
    endpoint: String,
    duration_ms: f64,
    #[serde(rename = "app.result.status")]
    status: String,
}

/// Parse and validate one datagram payload.
///
/// serde enforces the field presence and type requirements: `endpoint` must
/// be a string, `duration_ms` a number, and `app.result.status` a string.
fn parse_datagram(bytes: &[u8]) -> Result<RequestPoint, serde_json::Error> {
    let wire: BeaconWire = serde_json::from_slice(bytes)?;
    Ok(RequestPoint {
        endpoint: wire.endpoint,
        success: wire.status == SUCCESS_STATUS,
        duration_ms: wire.duration_ms,
    })
}

/// Bind an ingress socket on all interfaces.
pub async fn bind_ingress(port: u16) -> io::Result<UdpSocket> {
    let socket = UdpSocket::bind(("0.0.0.0", port)).await?;
    info!(port, "ingress socket listening");
    Ok(socket)
}

/// Run the receive loop until the socket fails.
///
/// A socket-level receive error is fatal for this ingress path: it is logged
/// and the loop returns, dropping (and thereby closing) the socket. The
/// summary-serving path is unaffected.
pub async fn run_ingress(socket: UdpSocket, sink: Arc<dyn PointSink>, metrics: IngressMetrics) {
    let mut buf = vec![0u8; MAX_DATAGRAM_BYTES];

    loop {
        let (len, peer) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(e) => {
                error!(error = %e, "ingress socket error, stopping listener");
                return;
            }
        };

        metrics.record_received();

        match parse_datagram(&buf[..len]) {
            Ok(point) => {
                metrics.record_accepted();
                sink.accept(point);
            }
            Err(e) => {
                metrics.record_rejected();
                debug!(%peer, error = %e, "dropping malformed datagram");
            }
        }
    }
}

/// Spawn the receive loop as a background task.
pub fn spawn_ingress(
    socket: UdpSocket,
    sink: Arc<dyn PointSink>,
    metrics: IngressMetrics,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(run_ingress(socket, sink, metrics))
}
