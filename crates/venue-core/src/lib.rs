//! venue-core
//!
//! Pure single-venue matching logic:
//! - messages (quote updates, acknowledgments, trade records)
//! - client order representation
//! - per-instrument top-of-book arena with reference-price tracking
//! - flat client-order registry
//! - matching engine (admission, cancel, search, fill/timeout sweeps)

pub mod side;
pub mod order_type;
pub mod messages;
pub mod order;
pub mod order_book;
pub mod registry;
pub mod matching_engine;
pub mod error;

pub use side::Side;
pub use order_type::OrderType;

pub use messages::{
    AckKind,
    AckMessage,
    MessageKind,
    QuoteUpdate,
    TradeRecord,
};

pub use order::Order;
pub use order_book::{BookLevel, BookSet, BookSnapshot, InstrumentBook};
pub use registry::ClientOrderRegistry;
pub use matching_engine::{EngineConfig, FillPolicy, MatchingEngine};
pub use error::EngineError;
