//! Message types used by the matching engine.
//!
//! These are **transport-agnostic** logical records:
//! - [`QuoteUpdate`]: what the market-data channel feeds the book set.
//! - [`AckMessage`]: what the engine emits back to subscribers.
//! - [`TradeRecord`]: a fill retained for trade-history queries.
//!
//! The semicolon-delimited wire forms live in the `venue-protocol`
//! crate; this module is purely logical.

use serde::{Deserialize, Serialize};

/// Kind carried on tag 35 of an order message.
///
/// This is a payload field, deliberately distinct from the envelope
/// opcode that selects the request handler.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    /// A client order entering the venue (`D` on the wire).
    New,
    /// A client cancel request (`F` on the wire).
    Cancel,
    /// A record synthesized from the quote feed (`Q` on the wire).
    QuoteDerived,
}

impl MessageKind {
    pub fn as_wire(self) -> &'static str {
        match self {
            MessageKind::New => "D",
            MessageKind::Cancel => "F",
            MessageKind::QuoteDerived => "Q",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "D" => Some(MessageKind::New),
            "F" => Some(MessageKind::Cancel),
            "Q" => Some(MessageKind::QuoteDerived),
            _ => None,
        }
    }
}

/// Kind carried on tag 35 of an acknowledgment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AckKind {
    /// Order admitted and resting.
    Queued,
    /// Order left the registry through a fill (crossing or timeout).
    Filled,
    /// Order removed on client request.
    Cancelled,
    /// Cancel/search target was not in the registry.
    NotFound,
    /// Order failed validation and was never admitted.
    Rejected,
}

impl AckKind {
    pub fn as_wire(self) -> &'static str {
        match self {
            AckKind::Queued => "3",
            AckKind::Filled => "4",
            AckKind::Cancelled => "5",
            AckKind::NotFound => "6",
            AckKind::Rejected => "7",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "3" => Some(AckKind::Queued),
            "4" => Some(AckKind::Filled),
            "5" => Some(AckKind::Cancelled),
            "6" => Some(AckKind::NotFound),
            "7" => Some(AckKind::Rejected),
            _ => None,
        }
    }
}

/// Acknowledgment / event record published to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckMessage {
    /// Sender the ack is addressed to (tag 56).
    pub target_id: String,

    pub ack_kind: AckKind,

    pub order_id: String,

    /// Filled quantity for fills; `-1.0` sentinel on a `queued` ack
    /// (nothing filled yet).
    pub quantity: f64,

    /// The order's own limit price.
    pub price: f64,

    /// Reference price that triggered a fill (tag 1000). Present only
    /// on fill acks.
    pub action_price: Option<f64>,
}

/// One top-of-book update from the market-data channel, already
/// parsed out of the wire form.
///
/// A side the feed did not quote is simply absent.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteUpdate {
    pub instrument: String,

    /// Feed sequence number, monotonically increasing per instrument.
    /// Used to drop stale updates.
    pub update_id: u64,

    pub best_bid: Option<(f64, f64)>,
    pub best_ask: Option<(f64, f64)>,

    pub transaction_time: u64,
    pub event_time: u64,
}

/// A fill retained for trade-history queries. Session-local only,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub instrument: String,
    pub order_id: String,
    pub sender_id: String,
    pub quantity: f64,
    pub price: f64,
    /// Reference price at the time of the fill.
    pub action_price: f64,
    pub executed_at_ms: u64,
}

// -----------------------------------------------------------------------------
// Convenience constructors
// -----------------------------------------------------------------------------

impl AckMessage {
    /// Admission ack. Quantity is the `-1` sentinel: not yet filled.
    pub fn queued(target_id: impl Into<String>, order_id: impl Into<String>, price: f64) -> Self {
        AckMessage {
            target_id: target_id.into(),
            ack_kind: AckKind::Queued,
            order_id: order_id.into(),
            quantity: -1.0,
            price,
            action_price: None,
        }
    }

    /// Fill ack, carrying the reference price that triggered it.
    pub fn filled(
        target_id: impl Into<String>,
        order_id: impl Into<String>,
        quantity: f64,
        price: f64,
        action_price: f64,
    ) -> Self {
        AckMessage {
            target_id: target_id.into(),
            ack_kind: AckKind::Filled,
            order_id: order_id.into(),
            quantity,
            price,
            action_price: Some(action_price),
        }
    }

    pub fn cancelled(
        target_id: impl Into<String>,
        order_id: impl Into<String>,
        price: f64,
    ) -> Self {
        AckMessage {
            target_id: target_id.into(),
            ack_kind: AckKind::Cancelled,
            order_id: order_id.into(),
            quantity: -1.0,
            price,
            action_price: None,
        }
    }

    pub fn not_found(target_id: impl Into<String>, order_id: impl Into<String>) -> Self {
        AckMessage {
            target_id: target_id.into(),
            ack_kind: AckKind::NotFound,
            order_id: order_id.into(),
            quantity: -1.0,
            price: 0.0,
            action_price: None,
        }
    }

    pub fn rejected(target_id: impl Into<String>, order_id: impl Into<String>, price: f64) -> Self {
        AckMessage {
            target_id: target_id.into(),
            ack_kind: AckKind::Rejected,
            order_id: order_id.into(),
            quantity: -1.0,
            price,
            action_price: None,
        }
    }
}
