//! Interactive line client for the venue.
//!
//! Writes requests to the client-request endpoint and prints
//! everything published on the ack endpoint. Commands:
//!
//! ```text
//! new <instrument> <buy|sell> <qty> <price>
//! cancel <order-id>
//! book <instrument>
//! trades <instrument>
//! search            (my open orders)
//! quit
//! ```

use std::env;
use std::io::{self, BufRead, Write as _};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use venue_core::{AckKind, MessageKind, Order, OrderType, Side};
use venue_protocol::{decode_ack, encode_request, ClientRequest, QueryResponse};

#[tokio::main]
async fn main() -> Result<()> {
    let order_addr =
        env::var("VENUE_ORDER_ADDR").unwrap_or_else(|_| "127.0.0.1:5557".to_string());
    let ack_addr = env::var("VENUE_ACK_ADDR").unwrap_or_else(|_| "127.0.0.1:5558".to_string());
    let sender_id = env::var("VENUE_SENDER_ID").unwrap_or_else(|_| format!("C{}", process::id()));

    let mut order_stream = TcpStream::connect(&order_addr).await?;
    let ack_stream = TcpStream::connect(&ack_addr).await?;
    println!("Connected (sender id {}).", sender_id);
    println!("Commands: new / cancel / book / trades / search / quit\n");

    // Print everything the venue publishes.
    tokio::spawn(async move {
        let mut lines = BufReader::new(ack_stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            print_published(&line);
        }
        println!("\nAck channel closed.");
    });

    let stdin = io::stdin();
    let mut next_order_id = 1u64;

    loop {
        print!(">> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if tokens[0].eq_ignore_ascii_case("quit") || tokens[0].eq_ignore_ascii_case("exit") {
            break;
        }

        let request = match build_request(&tokens, &sender_id, &mut next_order_id) {
            Some(r) => r,
            None => {
                eprintln!("Could not parse command. See the help at the top.");
                continue;
            }
        };

        let framed = format!("{}\n", encode_request(&request));
        order_stream.write_all(framed.as_bytes()).await?;
    }

    println!("Exiting client.");
    Ok(())
}

fn build_request(
    tokens: &[&str],
    sender_id: &str,
    next_order_id: &mut u64,
) -> Option<ClientRequest> {
    match tokens[0].to_ascii_lowercase().as_str() {
        "new" => {
            if tokens.len() != 5 {
                return None;
            }
            let side = match tokens[2].to_ascii_lowercase().as_str() {
                "buy" => Side::Buy,
                "sell" => Side::Sell,
                _ => return None,
            };
            let quantity = tokens[3].parse::<f64>().ok()?;
            let limit_price = tokens[4].parse::<f64>().ok()?;

            let order_id = format!("{}-{}", sender_id, *next_order_id);
            *next_order_id += 1;

            Some(ClientRequest::New(Order {
                message_kind: MessageKind::New,
                order_id,
                quantity,
                order_type: OrderType::Limit,
                limit_price,
                sender_id: sender_id.to_string(),
                sending_time: now_ms(),
                side,
                participation_target: 0.0,
                instrument: tokens[1].to_uppercase(),
            }))
        }
        "cancel" if tokens.len() == 2 => Some(ClientRequest::Cancel {
            order_id: tokens[1].to_string(),
            requester: sender_id.to_string(),
        }),
        "book" if tokens.len() == 2 => Some(ClientRequest::BookQuery {
            instrument: tokens[1].to_uppercase(),
        }),
        "trades" if tokens.len() == 2 => Some(ClientRequest::TradeHistoryQuery {
            instrument: tokens[1].to_uppercase(),
        }),
        "search" => Some(ClientRequest::SearchQuery {
            sender_id: sender_id.to_string(),
        }),
        _ => None,
    }
}

/// Render one published line: a structured query response, an ack,
/// or (for anything else) the raw text.
fn print_published(line: &str) {
    if let Some(decoded) = QueryResponse::decode(line) {
        match decoded {
            Ok(QueryResponse::OrderBook(book)) => {
                println!("\nBook: bids={:?} asks={:?}", book.bids, book.asks);
            }
            Ok(QueryResponse::SearchOrders(orders)) => {
                println!("\nOpen orders ({}):", orders.len());
                for o in orders {
                    println!(
                        "  {} {:?} {} @ {} on {}",
                        o.order_id, o.side, o.quantity, o.limit_price, o.instrument
                    );
                }
            }
            Ok(QueryResponse::ExecutedTrades(trades)) => {
                println!("\nExecuted trades ({}):", trades.len());
                for t in trades {
                    println!(
                        "  {} {} @ {} (ref {})",
                        t.order_id, t.quantity, t.price, t.action_price
                    );
                }
            }
            Err(e) => eprintln!("\nBad response payload: {}", e),
        }
        return;
    }

    match decode_ack(line) {
        Ok(ack) => {
            let label = match ack.ack_kind {
                AckKind::Queued => "queued",
                AckKind::Filled => "filled",
                AckKind::Cancelled => "cancelled",
                AckKind::NotFound => "not found",
                AckKind::Rejected => "rejected",
            };
            match ack.action_price {
                Some(action_price) => println!(
                    "\nAck: {} {} qty={} @ {} (ref {})",
                    label, ack.order_id, ack.quantity, ack.price, action_price
                ),
                None => println!(
                    "\nAck: {} {} @ {}",
                    label, ack.order_id, ack.price
                ),
            }
        }
        Err(_) => println!("\n{}", line),
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
