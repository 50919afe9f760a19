//! venue-server
//!
//! Async TCP transport and session loop for the venue simulator.

pub mod config;
pub mod types;
pub mod server;
pub mod router;

mod subscriber;
