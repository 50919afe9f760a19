//! Side (Buy / Sell) for orders and book levels.

use serde::{Deserialize, Serialize};

/// Order side: Buy or Sell.
///
/// On the wire (tag 54) this is `"1"` for buy and `"2"` for sell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Wire representation for tag 54.
    pub fn as_wire(self) -> &'static str {
        match self {
            Side::Buy => "1",
            Side::Sell => "2",
        }
    }

    /// Try to parse from the tag-54 wire value.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "1" => Some(Side::Buy),
            "2" => Some(Side::Sell),
            _ => None,
        }
    }
}
