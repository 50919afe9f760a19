//! Venue simulator server binary.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use venue_server::config::Config;
use venue_server::server;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    server::run(config).await
}
