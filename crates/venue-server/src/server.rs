//! TCP listeners and top-level server wiring.
//!
//! Three line-delimited endpoints, one per logical channel:
//! - market-data-in: the feed connects and writes quote lines;
//! - client-requests-in: clients connect and write request lines;
//! - acknowledgments-out: subscribers connect and receive every ack
//!   and query response the session loop publishes.
//!
//! Inbound connections funnel lines into single-consumer channels;
//! the session loop is the only consumer, so all engine mutation is
//! strictly ordered by arrival. A bind failure on any endpoint is
//! fatal and surfaced to the operator; per-connection failures only
//! end that connection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{info, warn};

use venue_core::MatchingEngine;

use crate::config::Config;
use crate::router;
use crate::subscriber;
use crate::types::{SubscriberId, SubscriberRegistry};

static NEXT_SUBSCRIBER_ID: AtomicU64 = AtomicU64::new(1);

fn next_subscriber_id() -> SubscriberId {
    SubscriberId(NEXT_SUBSCRIBER_ID.fetch_add(1, Ordering::Relaxed))
}

/// Bind all three endpoints and run the venue until the process is
/// stopped.
pub async fn run(config: Config) -> Result<()> {
    let md_listener = TcpListener::bind(config.md_addr())
        .await
        .with_context(|| format!("binding market-data endpoint {}", config.md_addr()))?;
    let order_listener = TcpListener::bind(config.order_addr())
        .await
        .with_context(|| format!("binding client-request endpoint {}", config.order_addr()))?;
    let ack_listener = TcpListener::bind(config.ack_addr())
        .await
        .with_context(|| format!("binding ack endpoint {}", config.ack_addr()))?;

    info!(
        md = %config.md_addr(),
        orders = %config.order_addr(),
        acks = %config.ack_addr(),
        instruments = ?config.instruments,
        "venue listening"
    );

    let subscribers: SubscriberRegistry = Arc::new(tokio::sync::RwLock::new(Default::default()));

    let (quote_tx, quote_rx) = mpsc::unbounded_channel();
    let (request_tx, request_rx) = mpsc::unbounded_channel();

    tokio::spawn(accept_inbound(md_listener, quote_tx, "market-data"));
    tokio::spawn(accept_inbound(order_listener, request_tx, "client-request"));
    tokio::spawn(accept_subscribers(ack_listener, subscribers.clone()));

    let engine = MatchingEngine::new(config.engine_config());
    router::run_session_loop(engine, quote_rx, request_rx, subscribers).await;

    Ok(())
}

/// Accept loop for an inbound endpoint: every connection gets a task
/// that forwards its lines into the shared channel.
async fn accept_inbound(
    listener: TcpListener,
    line_tx: mpsc::UnboundedSender<String>,
    channel_name: &'static str,
) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                info!(channel = channel_name, peer = %peer_addr, "inbound connection");
                let line_tx = line_tx.clone();
                tokio::spawn(async move {
                    read_lines(stream, line_tx).await;
                    info!(channel = channel_name, peer = %peer_addr, "inbound connection closed");
                });
            }
            Err(e) => {
                warn!(channel = channel_name, error = %e, "accept failed");
            }
        }
    }
}

/// Forward newline-delimited frames from one socket into the channel
/// until EOF or a read error.
async fn read_lines(stream: TcpStream, line_tx: mpsc::UnboundedSender<String>) {
    let mut lines = BufReader::new(stream).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                if line_tx.send(line).is_err() {
                    // Session loop is gone; nothing left to feed.
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "inbound read failed");
                break;
            }
        }
    }
}

/// Accept loop for the ack endpoint: register each connection and
/// hand it a writer task.
async fn accept_subscribers(listener: TcpListener, subscribers: SubscriberRegistry) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                let subscriber_id = next_subscriber_id();
                info!(id = subscriber_id.0, peer = %peer_addr, "ack subscriber connected");

                let (out_tx, out_rx) = mpsc::unbounded_channel();
                {
                    let mut guard = subscribers.write().await;
                    guard.insert(subscriber_id, out_tx);
                }

                let subscribers = subscribers.clone();
                tokio::spawn(subscriber::run_subscriber(
                    subscriber_id,
                    stream,
                    out_rx,
                    subscribers,
                ));
            }
            Err(e) => {
                warn!(error = %e, "ack accept failed");
            }
        }
    }
}
