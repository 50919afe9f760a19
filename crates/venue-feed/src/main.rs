//! Market-data replay feed.
//!
//! Reads one recorded quote CSV per instrument and streams the rows
//! onto the venue's market-data endpoint at a fixed interval, one
//! connection per file. The instrument is taken from the file-name
//! prefix (`BTCUSDT-quotes.csv` → `BTCUSDT`).
//!
//! CSV columns:
//! `update_id,best_bid_price,best_bid_qty,best_ask_price,best_ask_qty,transaction_time,event_time`
//! A side may be left empty to mark it absent. Lines starting with
//! `#` and a header row are skipped.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use venue_core::QuoteUpdate;
use venue_protocol::encode_quote;

#[derive(Debug, Parser)]
#[command(name = "venue-feed", about = "Replay recorded quotes onto the venue")]
struct Args {
    /// Quote CSV files, one per instrument; the instrument name is
    /// the file-name prefix before the first '-'.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Market-data endpoint to publish to.
    #[arg(long, default_value = "127.0.0.1:5556")]
    addr: String,

    /// Delay between consecutive quotes of one file.
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let mut tasks = Vec::new();
    for file in &args.files {
        let instrument = instrument_from_path(file)?;
        let addr = args.addr.clone();
        let file = file.clone();
        let interval = Duration::from_millis(args.interval_ms);
        tasks.push(tokio::spawn(async move {
            replay_file(&file, &instrument, &addr, interval).await
        }));
    }

    for task in tasks {
        task.await??;
    }
    Ok(())
}

/// Stream one file's quotes over its own connection.
async fn replay_file(
    path: &Path,
    instrument: &str,
    addr: &str,
    interval: Duration,
) -> Result<()> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;

    let mut stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("connecting to market-data endpoint {}", addr))?;

    info!(instrument, file = %path.display(), "replaying quotes");

    let mut sent = 0u64;
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("update_id") {
            continue;
        }

        let update = match parse_row(line, instrument) {
            Some(u) => u,
            None => {
                warn!(instrument, line_no = line_no + 1, "skipping malformed row");
                continue;
            }
        };

        let framed = format!("{}\n", encode_quote(&update));
        stream
            .write_all(framed.as_bytes())
            .await
            .context("writing quote")?;
        sent += 1;

        sleep(interval).await;
    }

    info!(instrument, sent, "replay finished");
    Ok(())
}

/// `BTCUSDT-quotes.csv` → `BTCUSDT`.
fn instrument_from_path(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let instrument = stem.split('-').next().unwrap_or_default();
    if instrument.is_empty() {
        bail!(
            "cannot derive an instrument name from {}",
            path.display()
        );
    }
    Ok(instrument.to_string())
}

fn parse_row(line: &str, instrument: &str) -> Option<QuoteUpdate> {
    let cols: Vec<&str> = line.split(',').map(str::trim).collect();
    if cols.len() != 7 {
        return None;
    }

    let update_id = cols[0].parse::<u64>().ok()?;
    let best_bid = parse_side(cols[1], cols[2])?;
    let best_ask = parse_side(cols[3], cols[4])?;
    let transaction_time = cols[5].parse::<u64>().ok()?;
    let event_time = cols[6].parse::<u64>().ok()?;

    Some(QuoteUpdate {
        instrument: instrument.to_string(),
        update_id,
        best_bid,
        best_ask,
        transaction_time,
        event_time,
    })
}

/// Empty columns mean the side is absent; anything non-numeric is a
/// malformed row.
#[allow(clippy::option_option)]
fn parse_side(price: &str, qty: &str) -> Option<Option<(f64, f64)>> {
    if price.is_empty() && qty.is_empty() {
        return Some(None);
    }
    let price = price.parse::<f64>().ok()?;
    let qty = qty.parse::<f64>().ok()?;
    Some(Some((price, qty)))
}
