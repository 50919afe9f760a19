//! Wire constants: envelope opcodes and payload field tags.
//!
//! The two namespaces are deliberately distinct. The envelope opcode
//! is the bare leading token of a client request and selects the
//! handler; field tags live inside `tag=value` segments and describe
//! the payload. In particular, opcode `0` (new order) and field tag
//! `35` (message kind) must never be conflated.

/// Envelope opcode: the bare first segment of a client request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Opcode {
    NewOrder,
    CancelOrder,
    BookQuery,
    TradeHistoryQuery,
    SearchQuery,
}

impl Opcode {
    pub fn as_wire(self) -> &'static str {
        match self {
            Opcode::NewOrder => "0",
            Opcode::CancelOrder => "1",
            Opcode::BookQuery => "2",
            Opcode::TradeHistoryQuery => "3",
            Opcode::SearchQuery => "5",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "0" => Some(Opcode::NewOrder),
            "1" => Some(Opcode::CancelOrder),
            "2" => Some(Opcode::BookQuery),
            "3" => Some(Opcode::TradeHistoryQuery),
            "5" => Some(Opcode::SearchQuery),
            _ => None,
        }
    }
}

// Payload field tags. Numbering follows the FIX-style scheme the
// venue's clients already speak.
pub const TAG_MSG_KIND: u32 = 35;
pub const TAG_ORDER_ID: u32 = 37;
pub const TAG_QUANTITY: u32 = 38;
pub const TAG_ORDER_TYPE: u32 = 40;
pub const TAG_PRICE: u32 = 44;
pub const TAG_SENDER_ID: u32 = 49;
pub const TAG_SENDING_TIME: u32 = 52;
pub const TAG_SIDE: u32 = 54;
pub const TAG_INSTRUMENT: u32 = 55;
pub const TAG_TARGET_ID: u32 = 56;
pub const TAG_PARTICIPATION: u32 = 6404;

/// Reference price that triggered a fill; present on fill acks only.
pub const TAG_ACTION_PRICE: u32 = 1000;

/// Query-kind tokens used in the second segment of query requests
/// and as the prefix of structured query responses.
pub const KIND_ORDER_BOOK: &str = "order_book";
pub const KIND_EXECUTED_TRADES: &str = "executed_trades";
pub const KIND_SEARCH_ORDER: &str = "search_order";
