//! Market-data message parsing and formatting.
//!
//! Wire form (named `key=value` segments, one message per line):
//!
//! ```text
//! instrument=BTCUSDT;update_id=7;best_bid_price=100.1;best_bid_qty=2;
//! best_ask_price=100.3;best_ask_qty=1.5;transaction_time=1700000000000;
//! event_time=1700000000001
//! ```
//!
//! A side the feed has nothing for is omitted (or sent as `NaN`,
//! which decodes to the same absence). `instrument` and `update_id`
//! are required; the timestamps default to zero when missing.

use std::collections::HashMap;

use venue_core::QuoteUpdate;

use crate::codec::DecodeError;

const KEY_INSTRUMENT: &str = "instrument";
const KEY_UPDATE_ID: &str = "update_id";
const KEY_BID_PRICE: &str = "best_bid_price";
const KEY_BID_QTY: &str = "best_bid_qty";
const KEY_ASK_PRICE: &str = "best_ask_price";
const KEY_ASK_QTY: &str = "best_ask_qty";
const KEY_TRANSACTION_TIME: &str = "transaction_time";
const KEY_EVENT_TIME: &str = "event_time";

/// Decode one quote message.
pub fn decode_quote(msg: &str) -> Result<QuoteUpdate, DecodeError> {
    let fields: HashMap<&str, &str> = msg
        .split(';')
        .filter_map(|segment| segment.split_once('='))
        .map(|(k, v)| (k.trim(), v.trim()))
        .collect();

    let instrument = fields
        .get(KEY_INSTRUMENT)
        .filter(|s| !s.is_empty())
        .ok_or(DecodeError::Malformed("quote missing instrument"))?
        .to_string();

    let update_id = fields
        .get(KEY_UPDATE_ID)
        .ok_or(DecodeError::Malformed("quote missing update_id"))?
        .parse::<u64>()
        .map_err(|_| DecodeError::Malformed("quote update_id is not an integer"))?;

    Ok(QuoteUpdate {
        instrument,
        update_id,
        best_bid: side_of(&fields, KEY_BID_PRICE, KEY_BID_QTY),
        best_ask: side_of(&fields, KEY_ASK_PRICE, KEY_ASK_QTY),
        transaction_time: u64_or_zero(&fields, KEY_TRANSACTION_TIME),
        event_time: u64_or_zero(&fields, KEY_EVENT_TIME),
    })
}

/// Format a quote message. Absent sides are omitted entirely.
pub fn encode_quote(update: &QuoteUpdate) -> String {
    let mut out = format!(
        "{}={};{}={}",
        KEY_INSTRUMENT, update.instrument, KEY_UPDATE_ID, update.update_id
    );
    if let Some((price, qty)) = update.best_bid {
        out.push_str(&format!(";{}={};{}={}", KEY_BID_PRICE, price, KEY_BID_QTY, qty));
    }
    if let Some((price, qty)) = update.best_ask {
        out.push_str(&format!(";{}={};{}={}", KEY_ASK_PRICE, price, KEY_ASK_QTY, qty));
    }
    out.push_str(&format!(
        ";{}={};{}={}",
        KEY_TRANSACTION_TIME, update.transaction_time, KEY_EVENT_TIME, update.event_time
    ));
    out
}

/// A quoted side, absent when either field is missing or non-finite.
fn side_of(fields: &HashMap<&str, &str>, price_key: &str, qty_key: &str) -> Option<(f64, f64)> {
    let price = fields.get(price_key)?.parse::<f64>().ok()?;
    let qty = fields.get(qty_key)?.parse::<f64>().ok()?;
    if price.is_finite() && qty.is_finite() {
        Some((price, qty))
    } else {
        None
    }
}

fn u64_or_zero(fields: &HashMap<&str, &str>, key: &str) -> u64 {
    fields
        .get(key)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0)
}
