//! Error types for the matching engine.
//!
//! Only order admission can fail here; cancel and the query paths
//! report misses as normal outcomes rather than errors, and the
//! decode-level failures live in `venue-protocol`.

use thiserror::Error;

/// Why an order was refused admission.
///
/// Every variant maps to a `rejected` ack at the router; none of
/// them terminate the session.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("order quantity must be strictly positive, got {0}")]
    NonPositiveQuantity(f64),

    #[error("order price must be finite and strictly positive, got {0}")]
    InvalidPrice(f64),

    #[error("instrument {0:?} is not traded on this venue")]
    UnknownInstrument(String),

    #[error("order id {0:?} is already resting")]
    DuplicateOrderId(String),
}
