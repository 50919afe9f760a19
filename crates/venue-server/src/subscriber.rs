//! Ack-channel fan-out.
//!
//! Each subscriber connection gets an unbounded outbound channel and
//! a writer task; the session loop publishes by walking a snapshot of
//! the registry. A subscriber whose socket fails is dropped from the
//! registry without disturbing anyone else.

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::types::{OutboundRx, SubscriberId, SubscriberRegistry};

/// Send one line to every registered subscriber.
///
/// Failures here only mean the writer task already exited; cleanup
/// happens there.
pub async fn publish_line(subscribers: &SubscriberRegistry, line: &str) {
    let snapshot = {
        let guard = subscribers.read().await;
        guard.values().cloned().collect::<Vec<_>>()
    };
    for tx in snapshot {
        let _ = tx.send(line.to_string());
    }
}

/// Writer loop for one subscriber connection. Consumes outbound lines
/// until the channel closes or the socket errors, then deregisters.
pub async fn run_subscriber(
    subscriber_id: SubscriberId,
    mut stream: TcpStream,
    mut out_rx: OutboundRx,
    subscribers: SubscriberRegistry,
) {
    while let Some(line) = out_rx.recv().await {
        let framed = format!("{}\n", line);
        if let Err(e) = stream.write_all(framed.as_bytes()).await {
            debug!(id = subscriber_id.0, error = %e, "subscriber write failed");
            break;
        }
    }

    {
        let mut guard = subscribers.write().await;
        guard.remove(&subscriber_id);
    }
    info!(id = subscriber_id.0, "ack subscriber disconnected");
}
