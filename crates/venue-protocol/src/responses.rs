//! Structured query responses: `<kind>;<JSON payload>`.
//!
//! The payload is always a JSON document built with serde_json.
//! Receivers decode it as data; nothing in a response is ever
//! interpreted as an expression.

use venue_core::{BookSnapshot, Order, TradeRecord};

use crate::tags::{KIND_EXECUTED_TRADES, KIND_ORDER_BOOK, KIND_SEARCH_ORDER};

/// Response to a book / search / trade-history query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResponse {
    OrderBook(BookSnapshot),
    SearchOrders(Vec<Order>),
    ExecutedTrades(Vec<TradeRecord>),
}

impl QueryResponse {
    /// Wire form: the query-kind word, a semicolon, then JSON.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        let line = match self {
            QueryResponse::OrderBook(snapshot) => {
                format!("{};{}", KIND_ORDER_BOOK, serde_json::to_string(snapshot)?)
            }
            QueryResponse::SearchOrders(orders) => {
                format!("{};{}", KIND_SEARCH_ORDER, serde_json::to_string(orders)?)
            }
            QueryResponse::ExecutedTrades(trades) => {
                format!(
                    "{};{}",
                    KIND_EXECUTED_TRADES,
                    serde_json::to_string(trades)?
                )
            }
        };
        Ok(line)
    }

    /// Decode a response line back into its structured form, for
    /// clients and tools consuming the ack channel.
    pub fn decode(line: &str) -> Option<Result<QueryResponse, serde_json::Error>> {
        let (kind, payload) = line.split_once(';')?;
        match kind {
            KIND_ORDER_BOOK => Some(serde_json::from_str(payload).map(QueryResponse::OrderBook)),
            KIND_SEARCH_ORDER => {
                Some(serde_json::from_str(payload).map(QueryResponse::SearchOrders))
            }
            KIND_EXECUTED_TRADES => {
                Some(serde_json::from_str(payload).map(QueryResponse::ExecutedTrades))
            }
            _ => None,
        }
    }
}
