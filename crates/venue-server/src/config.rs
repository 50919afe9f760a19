//! Configuration for the venue server.
//!
//! Intentionally simple: defaults, overridable via environment
//! variables:
//!
//! - `VENUE_BIND_ADDR`      (default: "127.0.0.1")
//! - `VENUE_MD_PORT`        (default: "5556")  market-data-in
//! - `VENUE_ORDER_PORT`     (default: "5557")  client-requests-in
//! - `VENUE_ACK_PORT`       (default: "5558")  acknowledgments-out
//! - `VENUE_INSTRUMENTS`    (default: "BTCUSDT,ETHUSDT", comma-separated)
//! - `VENUE_TIMEOUT_FILL`   (default: "0"; "1" enables forced timeout fills)
//! - `VENUE_MAX_RESTING_MS` (default: "180000")

use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use venue_core::{EngineConfig, FillPolicy};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface all three endpoints bind to.
    pub bind_addr: String,

    /// Market-data-in endpoint port.
    pub md_port: u16,

    /// Client-requests-in endpoint port.
    pub order_port: u16,

    /// Acknowledgments-out endpoint port.
    pub ack_port: u16,

    /// Tradable instrument set.
    pub instruments: Vec<String>,

    /// Whether the forced timeout fill runs alongside price crossing.
    pub timeout_fill: bool,

    /// Age at which a resting order is force-filled, when enabled.
    pub max_resting_ms: u64,
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to defaults.
    pub fn from_env() -> Result<Self> {
        let bind_addr = env::var("VENUE_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
        let md_port = read_env_or_default("VENUE_MD_PORT", 5556u16)?;
        let order_port = read_env_or_default("VENUE_ORDER_PORT", 5557u16)?;
        let ack_port = read_env_or_default("VENUE_ACK_PORT", 5558u16)?;

        let instruments_raw =
            env::var("VENUE_INSTRUMENTS").unwrap_or_else(|_| "BTCUSDT,ETHUSDT".to_string());
        let instruments: Vec<String> = instruments_raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if instruments.is_empty() {
            bail!("VENUE_INSTRUMENTS must name at least one instrument");
        }

        let timeout_fill = read_env_or_default("VENUE_TIMEOUT_FILL", 0u8)? != 0;
        let max_resting_ms = read_env_or_default("VENUE_MAX_RESTING_MS", 180_000u64)?;

        Ok(Config {
            bind_addr,
            md_port,
            order_port,
            ack_port,
            instruments,
            timeout_fill,
            max_resting_ms,
        })
    }

    /// The engine configuration implied by this server configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            instruments: self.instruments.clone(),
            fill_policy: if self.timeout_fill {
                FillPolicy::CrossWithTimeout
            } else {
                FillPolicy::CrossOnly
            },
            max_resting_ms: self.max_resting_ms,
        }
    }

    pub fn md_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.md_port)
    }

    pub fn order_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.order_port)
    }

    pub fn ack_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.ack_port)
    }
}

fn read_env_or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .with_context(|| format!("invalid value for {}", key)),
        Err(_) => Ok(default),
    }
}
