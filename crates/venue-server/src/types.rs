//! Shared types for the venue server.
//!
//! This module defines:
//! - `SubscriberId`: a lightweight handle for ack-channel subscribers
//! - channel aliases between the transport tasks and the session loop
//!
//! Both inbound channels carry raw text lines; decoding happens once,
//! inside the session loop, so malformed frames are logged and
//! dropped in exactly one place.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::RwLock;

/// Identifier for a connected ack subscriber.
///
/// Opaque; unique over the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

/// Outbound lines from the session loop to one subscriber.
pub type OutboundTx = mpsc::UnboundedSender<String>;
pub type OutboundRx = mpsc::UnboundedReceiver<String>;

/// Registry of ack subscribers and their outbound channels.
pub type SubscriberRegistry = Arc<RwLock<HashMap<SubscriberId, OutboundTx>>>;

/// Quote lines from the market-data endpoint into the session loop.
pub type QuoteTx = mpsc::UnboundedSender<String>;
pub type QuoteRx = mpsc::UnboundedReceiver<String>;

/// Request lines from the client-request endpoint into the session
/// loop. Drained non-blockingly once per quote cycle.
pub type RequestTx = mpsc::UnboundedSender<String>;
pub type RequestRx = mpsc::UnboundedReceiver<String>;
