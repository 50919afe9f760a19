//! Client order representation used inside the registry.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::messages::MessageKind;
use crate::order_type::OrderType;
use crate::side::Side;

/// A single resting client order.
///
/// Orders are removed from the registry on fill or cancel; an order
/// is never retained with zero quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub message_kind: MessageKind,

    /// Unique within the registry at any instant. Assigned by the
    /// engine when the client leaves it empty.
    pub order_id: String,

    /// Strictly positive while the order rests.
    pub quantity: f64,

    pub order_type: OrderType,

    /// Finite and strictly positive.
    pub limit_price: f64,

    pub sender_id: String,

    /// Milliseconds since the Unix epoch, stamped on admission.
    pub sending_time: u64,

    pub side: Side,

    /// Advisory participation target in `0.0..=1.0`; carried on the
    /// wire (tag 6404) but unused by matching.
    pub participation_target: f64,

    pub instrument: String,
}

impl Order {
    /// How long the order has been resting, given the current clock.
    /// Saturates at zero if the clock ran backwards.
    pub fn resting_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.sending_time)
    }

    /// Current wall-clock time in milliseconds since the Unix epoch.
    pub fn current_timestamp_ms() -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        now.as_millis() as u64
    }
}
