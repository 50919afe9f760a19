//! Order type (Market vs Limit).
//!
//! Every client order in this venue rests at a limit price; the
//! market variant is kept for quote-derived records, which carry the
//! exchange's own price and never rest in the registry.

use serde::{Deserialize, Serialize};

/// Wire values for tag 40: `"1"` market, `"2"` limit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Market,
    Limit,
}

impl OrderType {
    pub fn as_wire(self) -> &'static str {
        match self {
            OrderType::Market => "1",
            OrderType::Limit => "2",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "1" => Some(OrderType::Market),
            "2" => Some(OrderType::Limit),
            _ => None,
        }
    }
}
