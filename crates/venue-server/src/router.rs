//! The session loop.
//!
//! One task owns the [`MatchingEngine`]; nothing else touches engine
//! state, so there are no locks around the registry. Each iteration
//! is driven by one quote update:
//!
//! 1. block until the next quote line arrives and apply it to the
//!    book, remembering the returned reference price;
//! 2. drain all client-request lines that are already queued, without
//!    blocking (arrivals during the drain wait for the next cycle);
//! 3. dispatch each request and publish exactly one ack or one
//!    structured response per request;
//! 4. sweep fills for the quoted instrument only, then timeouts when
//!    that policy is enabled, publishing one fill ack per transition.
//!
//! Requests drain before the sweep, so a cancel racing the quote that
//! would fill it always wins. Decode failures are logged and the
//! frame dropped; the loop never terminates over one bad message.

use tracing::{debug, error, info, warn};

use venue_core::{AckMessage, MatchingEngine, Order};
use venue_protocol::{
    codec, decode_quote, encode_ack, ClientRequest, QueryResponse,
};

use crate::subscriber::publish_line;
use crate::types::{QuoteRx, RequestRx, SubscriberRegistry};

/// Run the session loop until the quote channel closes.
pub async fn run_session_loop(
    mut engine: MatchingEngine,
    mut quote_rx: QuoteRx,
    mut request_rx: RequestRx,
    subscribers: SubscriberRegistry,
) {
    while let Some(quote_line) = quote_rx.recv().await {
        let quote = match decode_quote(&quote_line) {
            Ok(q) => q,
            Err(e) => {
                warn!(error = %e, line = %quote_line, "dropping malformed quote");
                continue;
            }
        };

        let now_ms = Order::current_timestamp_ms();
        let reference_price = engine.update_quote(&quote);

        // Drain everything already queued; new arrivals wait.
        loop {
            let request_line = match request_rx.try_recv() {
                Ok(line) => line,
                Err(_) => break,
            };
            for out in handle_request(&mut engine, &request_line, now_ms) {
                publish_line(&subscribers, &out).await;
            }
        }

        if let Some(reference_price) = reference_price {
            debug!(
                instrument = %quote.instrument,
                reference_price,
                "sweeping fills"
            );
            for ack in engine.sweep_fills(&quote.instrument, reference_price, now_ms) {
                publish_fill(&subscribers, &ack).await;
            }
        }

        for ack in engine.sweep_timeouts(now_ms) {
            publish_fill(&subscribers, &ack).await;
        }
    }

    info!("session loop shutting down (market-data channel closed)");
}

/// Dispatch one client-request line. Returns the lines to publish:
/// exactly one per well-formed request, none for frames that fail to
/// decode (logged and dropped).
pub fn handle_request(engine: &mut MatchingEngine, line: &str, now_ms: u64) -> Vec<String> {
    let request = match codec::decode_request(line) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, line = %line, "dropping malformed client request");
            return Vec::new();
        }
    };

    match request {
        ClientRequest::New(order) => {
            let sender_id = order.sender_id.clone();
            let order_id = order.order_id.clone();
            let limit_price = order.limit_price;

            let ack = match engine.place_order(order, now_ms) {
                Ok(ack) => ack,
                Err(e) => {
                    warn!(sender = %sender_id, error = %e, "order rejected");
                    AckMessage::rejected(sender_id, order_id, limit_price)
                }
            };
            vec![encode_ack(&ack)]
        }
        ClientRequest::Cancel {
            order_id,
            requester,
        } => {
            let ack = engine.cancel_order(&order_id, &requester);
            vec![encode_ack(&ack)]
        }
        ClientRequest::BookQuery { instrument } => {
            encode_response(QueryResponse::OrderBook(engine.get_book(&instrument)))
        }
        ClientRequest::TradeHistoryQuery { instrument } => encode_response(
            QueryResponse::ExecutedTrades(engine.executed_trades(&instrument)),
        ),
        ClientRequest::SearchQuery { sender_id } => {
            encode_response(QueryResponse::SearchOrders(engine.search_order(&sender_id)))
        }
    }
}

async fn publish_fill(subscribers: &SubscriberRegistry, ack: &AckMessage) {
    publish_line(subscribers, &encode_ack(ack)).await;
}

fn encode_response(response: QueryResponse) -> Vec<String> {
    match response.encode() {
        Ok(line) => vec![line],
        Err(e) => {
            error!(error = %e, "failed to encode query response");
            Vec::new()
        }
    }
}
