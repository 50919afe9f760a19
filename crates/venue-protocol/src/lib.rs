//! venue-protocol
//!
//! Wire-level encoding/decoding for the venue simulator.
//!
//! This crate turns logical `venue_core` records into text frames and
//! back again:
//!
//! - [`codec`]       : `tag=value` orders, acks, and client requests
//! - [`market_data`] : named-key quote messages from the feed
//! - [`responses`]   : `<kind>;<JSON>` query responses

pub mod tags;
pub mod codec;
pub mod market_data;
pub mod responses;

pub use codec::{
    ClientRequest,
    DecodeError,
    decode_ack,
    decode_order,
    decode_request,
    encode_ack,
    encode_order,
    encode_request,
};
pub use market_data::{decode_quote, encode_quote};
pub use responses::QueryResponse;
pub use tags::Opcode;
