//! End-to-end scripted scenarios: wire lines in, wire acks out,
//! using the protocol crate the way the session loop does.

use venue_core::{AckKind, EngineConfig, MatchingEngine};
use venue_protocol::{decode_ack, decode_quote, decode_request, ClientRequest};

/// Replay a scripted session: `Q <quote-line>` applies a quote and
/// sweeps, anything else is a client-request line. Returns the
/// encoded ack lines in publish order.
fn replay(script: &[&str]) -> Vec<String> {
    let mut engine = MatchingEngine::new(EngineConfig::default());
    let mut published = Vec::new();
    let mut now_ms = 0u64;

    for line in script {
        now_ms += 1;
        if let Some(quote_line) = line.strip_prefix("Q ") {
            let quote = decode_quote(quote_line).expect("script quote must decode");
            if let Some(reference_price) = engine.update_quote(&quote) {
                for ack in engine.sweep_fills(&quote.instrument, reference_price, now_ms) {
                    published.push(venue_protocol::encode_ack(&ack));
                }
            }
            continue;
        }

        match decode_request(line).expect("script request must decode") {
            ClientRequest::New(order) => {
                let ack = engine.place_order(order, now_ms).expect("script order is valid");
                published.push(venue_protocol::encode_ack(&ack));
            }
            ClientRequest::Cancel {
                order_id,
                requester,
            } => {
                let ack = engine.cancel_order(&order_id, &requester);
                published.push(venue_protocol::encode_ack(&ack));
            }
            other => panic!("script does not use {:?}", other),
        }
    }

    published
}

fn kinds(lines: &[String]) -> Vec<AckKind> {
    lines
        .iter()
        .map(|l| decode_ack(l).expect("published acks decode").ack_kind)
        .collect()
}

#[test]
fn admission_ack_precedes_the_fill_ack_for_the_same_order() {
    let published = replay(&[
        "Q instrument=BTCUSDT;update_id=1;best_bid_price=99.5;best_bid_qty=1;best_ask_price=100.5;best_ask_qty=1;transaction_time=1;event_time=1",
        "0;35=D;49=TRADER1;37=W1;38=1;40=2;44=100;52=0;54=1;6404=0;55=BTCUSDT",
        "Q instrument=BTCUSDT;update_id=2;best_bid_price=98.5;best_bid_qty=1;best_ask_price=99.5;best_ask_qty=1;transaction_time=2;event_time=2",
    ]);

    assert_eq!(kinds(&published), vec![AckKind::Queued, AckKind::Filled]);

    let fill = decode_ack(&published[1]).unwrap();
    assert_eq!(fill.order_id, "W1");
    assert_eq!(fill.action_price, Some(99.0));
}

#[test]
fn cancel_arriving_with_the_triggering_quote_wins() {
    // The cancel line is processed before the crossing quote's sweep.
    let published = replay(&[
        "0;35=D;49=TRADER1;37=W1;38=1;40=2;44=100;52=0;54=1;6404=0;55=BTCUSDT",
        "1;37=W1;49=TRADER1",
        "Q instrument=BTCUSDT;update_id=1;best_bid_price=98.5;best_bid_qty=1;best_ask_price=99.5;best_ask_qty=1;transaction_time=1;event_time=1",
    ]);

    assert_eq!(kinds(&published), vec![AckKind::Queued, AckKind::Cancelled]);
}

#[test]
fn repeated_cancel_reports_not_found_once_cancelled() {
    let published = replay(&[
        "0;35=D;49=TRADER1;37=W1;38=1;40=2;44=100;52=0;54=1;6404=0;55=BTCUSDT",
        "1;37=W1;49=TRADER1",
        "1;37=W1;49=TRADER1",
    ]);

    assert_eq!(
        kinds(&published),
        vec![AckKind::Queued, AckKind::Cancelled, AckKind::NotFound]
    );
}
