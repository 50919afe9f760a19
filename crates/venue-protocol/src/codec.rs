//! Encode/decode for the semicolon-delimited `tag=value` grammar.
//!
//! A message is `segment (';' segment)*`; a segment is either
//! `tag '=' value` or a bare token (the envelope opcode, or a
//! query-kind word). Segments split on the **first** `=` only, so
//! values may themselves contain `=`.
//!
//! Encoding uses a fixed field order and no trailing separator;
//! `decode(encode(x)) == x` holds for every valid order and ack.
//!
//! All decoding is total over attacker-influenced input: a malformed
//! message yields a [`DecodeError`] for the caller to log and drop.
//! Payloads are data only and are never evaluated.

use std::collections::HashMap;

use thiserror::Error;

use venue_core::{AckKind, AckMessage, MessageKind, Order, OrderType, Side};

use crate::tags::{
    Opcode, KIND_EXECUTED_TRADES, KIND_ORDER_BOOK, KIND_SEARCH_ORDER, TAG_ACTION_PRICE,
    TAG_INSTRUMENT, TAG_MSG_KIND, TAG_ORDER_ID, TAG_ORDER_TYPE, TAG_PARTICIPATION, TAG_PRICE,
    TAG_QUANTITY, TAG_SENDER_ID, TAG_SENDING_TIME, TAG_SIDE, TAG_TARGET_ID,
};

/// Why a wire message could not be decoded.
///
/// Always contained per-message: the session loop logs the error and
/// drops the frame, it never terminates.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("required tag {0} missing")]
    MissingTag(u32),

    #[error("tag {tag} expected a number, got {value:?}")]
    BadNumber { tag: u32, value: String },

    #[error("tag {tag} carries unknown value {value:?}")]
    BadEnum { tag: u32, value: String },

    #[error("unknown envelope opcode {0:?}")]
    UnknownOpcode(String),

    #[error("malformed message: {0}")]
    Malformed(&'static str),
}

/// A decoded client request, dispatched on by the session loop.
///
/// Decoding happens exactly once, here; downstream code matches on
/// this closed enum instead of re-inspecting message prefixes.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientRequest {
    New(Order),
    Cancel {
        order_id: String,
        /// Sender of the cancel, when the request carried tag 49.
        /// Used to address a `not_found` response.
        requester: String,
    },
    BookQuery {
        instrument: String,
    },
    TradeHistoryQuery {
        instrument: String,
    },
    SearchQuery {
        sender_id: String,
    },
}

// -----------------------------------------------------------------------------
// Field map
// -----------------------------------------------------------------------------

/// `tag=value` segments of one message, keyed by numeric tag.
/// Bare segments (no `=`) are skipped.
fn field_map(msg: &str) -> HashMap<u32, &str> {
    msg.split(';')
        .filter_map(|segment| {
            let (tag, value) = segment.split_once('=')?;
            let tag = tag.trim().parse::<u32>().ok()?;
            Some((tag, value))
        })
        .collect()
}

fn required<'a>(fields: &HashMap<u32, &'a str>, tag: u32) -> Result<&'a str, DecodeError> {
    fields.get(&tag).copied().ok_or(DecodeError::MissingTag(tag))
}

fn required_f64(fields: &HashMap<u32, &str>, tag: u32) -> Result<f64, DecodeError> {
    let raw = required(fields, tag)?;
    raw.parse::<f64>().map_err(|_| DecodeError::BadNumber {
        tag,
        value: raw.to_string(),
    })
}

fn required_u64(fields: &HashMap<u32, &str>, tag: u32) -> Result<u64, DecodeError> {
    let raw = required(fields, tag)?;
    raw.parse::<u64>().map_err(|_| DecodeError::BadNumber {
        tag,
        value: raw.to_string(),
    })
}

// -----------------------------------------------------------------------------
// Orders
// -----------------------------------------------------------------------------

/// Encode an order in the fixed field sequence
/// `35;49;37;38;40;44;52;54;6404;55`.
pub fn encode_order(order: &Order) -> String {
    format!(
        "{}={};{}={};{}={};{}={};{}={};{}={};{}={};{}={};{}={};{}={}",
        TAG_MSG_KIND,
        order.message_kind.as_wire(),
        TAG_SENDER_ID,
        order.sender_id,
        TAG_ORDER_ID,
        order.order_id,
        TAG_QUANTITY,
        order.quantity,
        TAG_ORDER_TYPE,
        order.order_type.as_wire(),
        TAG_PRICE,
        order.limit_price,
        TAG_SENDING_TIME,
        order.sending_time,
        TAG_SIDE,
        order.side.as_wire(),
        TAG_PARTICIPATION,
        order.participation_target,
        TAG_INSTRUMENT,
        order.instrument,
    )
}

/// Decode an order payload. Every order field is required.
pub fn decode_order(msg: &str) -> Result<Order, DecodeError> {
    let fields = field_map(msg);

    let kind_raw = required(&fields, TAG_MSG_KIND)?;
    let message_kind = MessageKind::from_wire(kind_raw).ok_or_else(|| DecodeError::BadEnum {
        tag: TAG_MSG_KIND,
        value: kind_raw.to_string(),
    })?;

    let type_raw = required(&fields, TAG_ORDER_TYPE)?;
    let order_type = OrderType::from_wire(type_raw).ok_or_else(|| DecodeError::BadEnum {
        tag: TAG_ORDER_TYPE,
        value: type_raw.to_string(),
    })?;

    let side_raw = required(&fields, TAG_SIDE)?;
    let side = Side::from_wire(side_raw).ok_or_else(|| DecodeError::BadEnum {
        tag: TAG_SIDE,
        value: side_raw.to_string(),
    })?;

    Ok(Order {
        message_kind,
        order_id: required(&fields, TAG_ORDER_ID)?.to_string(),
        quantity: required_f64(&fields, TAG_QUANTITY)?,
        order_type,
        limit_price: required_f64(&fields, TAG_PRICE)?,
        sender_id: required(&fields, TAG_SENDER_ID)?.to_string(),
        sending_time: required_u64(&fields, TAG_SENDING_TIME)?,
        side,
        participation_target: required_f64(&fields, TAG_PARTICIPATION)?,
        instrument: required(&fields, TAG_INSTRUMENT)?.to_string(),
    })
}

// -----------------------------------------------------------------------------
// Acks
// -----------------------------------------------------------------------------

/// Encode an ack in the fixed field sequence `35;56;37;38;44[;1000]`.
/// Tag 1000 is emitted only when `action_price` is present.
pub fn encode_ack(ack: &AckMessage) -> String {
    let mut out = format!(
        "{}={};{}={};{}={};{}={};{}={}",
        TAG_MSG_KIND,
        ack.ack_kind.as_wire(),
        TAG_TARGET_ID,
        ack.target_id,
        TAG_ORDER_ID,
        ack.order_id,
        TAG_QUANTITY,
        ack.quantity,
        TAG_PRICE,
        ack.price,
    );
    if let Some(action_price) = ack.action_price {
        out.push_str(&format!(";{}={}", TAG_ACTION_PRICE, action_price));
    }
    out
}

pub fn decode_ack(msg: &str) -> Result<AckMessage, DecodeError> {
    let fields = field_map(msg);

    let kind_raw = required(&fields, TAG_MSG_KIND)?;
    let ack_kind = AckKind::from_wire(kind_raw).ok_or_else(|| DecodeError::BadEnum {
        tag: TAG_MSG_KIND,
        value: kind_raw.to_string(),
    })?;

    let action_price = match fields.get(&TAG_ACTION_PRICE) {
        Some(raw) => Some(raw.parse::<f64>().map_err(|_| DecodeError::BadNumber {
            tag: TAG_ACTION_PRICE,
            value: raw.to_string(),
        })?),
        None => None,
    };

    Ok(AckMessage {
        target_id: required(&fields, TAG_TARGET_ID)?.to_string(),
        ack_kind,
        order_id: required(&fields, TAG_ORDER_ID)?.to_string(),
        quantity: required_f64(&fields, TAG_QUANTITY)?,
        price: required_f64(&fields, TAG_PRICE)?,
        action_price,
    })
}

// -----------------------------------------------------------------------------
// Client requests
// -----------------------------------------------------------------------------

/// Encode a request as its envelope opcode followed by the payload.
pub fn encode_request(request: &ClientRequest) -> String {
    match request {
        ClientRequest::New(order) => {
            format!("{};{}", Opcode::NewOrder.as_wire(), encode_order(order))
        }
        ClientRequest::Cancel {
            order_id,
            requester,
        } => {
            if requester.is_empty() {
                format!(
                    "{};{}={}",
                    Opcode::CancelOrder.as_wire(),
                    TAG_ORDER_ID,
                    order_id
                )
            } else {
                format!(
                    "{};{}={};{}={}",
                    Opcode::CancelOrder.as_wire(),
                    TAG_ORDER_ID,
                    order_id,
                    TAG_SENDER_ID,
                    requester
                )
            }
        }
        ClientRequest::BookQuery { instrument } => format!(
            "{};{};{}",
            Opcode::BookQuery.as_wire(),
            KIND_ORDER_BOOK,
            instrument
        ),
        ClientRequest::TradeHistoryQuery { instrument } => format!(
            "{};{};{}",
            Opcode::TradeHistoryQuery.as_wire(),
            KIND_EXECUTED_TRADES,
            instrument
        ),
        ClientRequest::SearchQuery { sender_id } => format!(
            "{};{};{}",
            Opcode::SearchQuery.as_wire(),
            KIND_SEARCH_ORDER,
            sender_id
        ),
    }
}

/// Decode one client request frame.
///
/// The leading bare token is the envelope opcode; the rest of the
/// frame is interpreted per opcode. Queries use the positional form
/// `<opcode>;<query-kind>;<instrument-or-id>`.
pub fn decode_request(msg: &str) -> Result<ClientRequest, DecodeError> {
    let trimmed = msg.trim();
    let opcode_token = trimmed
        .split(';')
        .next()
        .ok_or(DecodeError::Malformed("empty message"))?
        .trim();

    let opcode = Opcode::from_wire(opcode_token)
        .ok_or_else(|| DecodeError::UnknownOpcode(opcode_token.to_string()))?;

    match opcode {
        Opcode::NewOrder => Ok(ClientRequest::New(decode_order(trimmed)?)),
        Opcode::CancelOrder => {
            // Cancels carry at least the target order id; the sender,
            // when present, addresses the not-found response.
            let fields = field_map(trimmed);
            let order_id = required(&fields, TAG_ORDER_ID)?.to_string();
            let requester = fields
                .get(&TAG_SENDER_ID)
                .copied()
                .unwrap_or_default()
                .to_string();
            Ok(ClientRequest::Cancel {
                order_id,
                requester,
            })
        }
        Opcode::BookQuery => Ok(ClientRequest::BookQuery {
            instrument: query_subject(trimmed)?,
        }),
        Opcode::TradeHistoryQuery => Ok(ClientRequest::TradeHistoryQuery {
            instrument: query_subject(trimmed)?,
        }),
        Opcode::SearchQuery => Ok(ClientRequest::SearchQuery {
            sender_id: query_subject(trimmed)?,
        }),
    }
}

/// Third positional segment of a query request. The second segment
/// (the query-kind word) is redundant with the opcode and ignored.
fn query_subject(msg: &str) -> Result<String, DecodeError> {
    let subject = msg
        .split(';')
        .nth(2)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(DecodeError::Malformed("query missing subject segment"))?;
    Ok(subject.to_string())
}
