//! Behavioral scenarios for the matching engine: admission,
//! crossing, cancellation ordering, timeouts, and top-of-book
//! replacement.

use venue_core::{
    AckKind, EngineConfig, EngineError, FillPolicy, MatchingEngine, MessageKind, Order, OrderType,
    QuoteUpdate, Side,
};

fn engine() -> MatchingEngine {
    MatchingEngine::new(EngineConfig::default())
}

fn engine_with_timeout(max_resting_ms: u64) -> MatchingEngine {
    MatchingEngine::new(EngineConfig {
        fill_policy: FillPolicy::CrossWithTimeout,
        max_resting_ms,
        ..EngineConfig::default()
    })
}

fn order(id: &str, instrument: &str, side: Side, quantity: f64, limit_price: f64) -> Order {
    Order {
        message_kind: MessageKind::New,
        order_id: id.to_string(),
        quantity,
        order_type: OrderType::Limit,
        limit_price,
        sender_id: "TRADER1".to_string(),
        sending_time: 0,
        side,
        participation_target: 0.0,
        instrument: instrument.to_string(),
    }
}

fn quote(instrument: &str, update_id: u64, bid: f64, ask: f64) -> QuoteUpdate {
    QuoteUpdate {
        instrument: instrument.to_string(),
        update_id,
        best_bid: Some((bid, 1.0)),
        best_ask: Some((ask, 1.0)),
        transaction_time: update_id,
        event_time: update_id,
    }
}

// -----------------------------------------------------------------------------
// Admission
// -----------------------------------------------------------------------------

#[test]
fn placing_a_valid_order_yields_one_queued_ack_and_is_searchable() {
    let mut eng = engine();
    let ack = eng
        .place_order(order("A1", "BTCUSDT", Side::Buy, 0.5, 100.0), 10)
        .unwrap();

    assert_eq!(ack.ack_kind, AckKind::Queued);
    assert_eq!(ack.order_id, "A1");
    assert_eq!(ack.quantity, -1.0);
    assert_eq!(ack.target_id, "TRADER1");

    let resting = eng.search_order("TRADER1");
    assert_eq!(resting.len(), 1);
    assert_eq!(resting[0].order_id, "A1");
    assert_eq!(resting[0].sending_time, 10);
}

#[test]
fn empty_order_id_gets_a_session_unique_assignment() {
    let mut eng = engine();
    let a = eng
        .place_order(order("", "BTCUSDT", Side::Buy, 1.0, 100.0), 0)
        .unwrap();
    let b = eng
        .place_order(order("", "BTCUSDT", Side::Buy, 1.0, 100.0), 0)
        .unwrap();
    assert!(!a.order_id.is_empty());
    assert!(!b.order_id.is_empty());
    assert_ne!(a.order_id, b.order_id);
}

#[test]
fn invalid_orders_are_rejected_not_admitted() {
    let mut eng = engine();

    assert_eq!(
        eng.place_order(order("A1", "BTCUSDT", Side::Buy, 0.0, 100.0), 0),
        Err(EngineError::NonPositiveQuantity(0.0))
    );
    assert_eq!(
        eng.place_order(order("A2", "BTCUSDT", Side::Buy, 1.0, -5.0), 0),
        Err(EngineError::InvalidPrice(-5.0))
    );
    assert!(matches!(
        eng.place_order(order("A3", "BTCUSDT", Side::Buy, 1.0, f64::NAN), 0),
        Err(EngineError::InvalidPrice(_))
    ));
    assert_eq!(
        eng.place_order(order("A4", "DOGEUSDT", Side::Buy, 1.0, 100.0), 0),
        Err(EngineError::UnknownInstrument("DOGEUSDT".to_string()))
    );
    assert_eq!(eng.resting_order_count(), 0);
}

#[test]
fn duplicate_order_id_is_rejected() {
    let mut eng = engine();
    eng.place_order(order("A1", "BTCUSDT", Side::Buy, 1.0, 100.0), 0)
        .unwrap();
    assert_eq!(
        eng.place_order(order("A1", "BTCUSDT", Side::Sell, 1.0, 200.0), 0),
        Err(EngineError::DuplicateOrderId("A1".to_string()))
    );
}

// -----------------------------------------------------------------------------
// Crossing
// -----------------------------------------------------------------------------

#[test]
fn buy_fills_on_the_first_favorable_reference_price_and_never_before() {
    let mut eng = engine();

    // Reference sequence 100, 99, 101 (midpoints).
    let r1 = eng.update_quote(&quote("BTCUSDT", 1, 99.5, 100.5)).unwrap();
    assert_eq!(r1, 100.0);

    eng.place_order(order("B1", "BTCUSDT", Side::Buy, 2.0, 100.0), 0)
        .unwrap();

    // Placement alone never fills; sweeps are quote-driven.
    assert_eq!(eng.resting_order_count(), 1);

    let r2 = eng.update_quote(&quote("BTCUSDT", 2, 98.5, 99.5)).unwrap();
    assert_eq!(r2, 99.0);
    let fills = eng.sweep_fills("BTCUSDT", r2, 5);
    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].ack_kind, AckKind::Filled);
    assert_eq!(fills[0].order_id, "B1");
    assert_eq!(fills[0].quantity, 2.0);
    assert_eq!(fills[0].price, 100.0);
    assert_eq!(fills[0].action_price, Some(99.0));

    // Whole-order fill: nothing rests at zero quantity.
    assert_eq!(eng.resting_order_count(), 0);

    let r3 = eng.update_quote(&quote("BTCUSDT", 3, 100.5, 101.5)).unwrap();
    assert_eq!(r3, 101.0);
    assert!(eng.sweep_fills("BTCUSDT", r3, 6).is_empty());
}

#[test]
fn sell_fills_when_reference_reaches_its_limit() {
    let mut eng = engine();
    eng.place_order(order("S1", "BTCUSDT", Side::Sell, 1.0, 100.0), 0)
        .unwrap();

    assert!(eng.sweep_fills("BTCUSDT", 99.0, 1).is_empty());

    let fills = eng.sweep_fills("BTCUSDT", 100.0, 2);
    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].action_price, Some(100.0));
}

#[test]
fn a_quote_for_one_instrument_never_sweeps_another() {
    let mut eng = engine();
    eng.place_order(order("E1", "ETHUSDT", Side::Buy, 1.0, 2000.0), 0)
        .unwrap();

    // A deeply favorable BTCUSDT reference leaves the ETH order alone.
    assert!(eng.sweep_fills("BTCUSDT", 1.0, 1).is_empty());
    assert_eq!(eng.resting_order_count(), 1);
}

#[test]
fn fills_are_recorded_for_trade_history() {
    let mut eng = engine();
    eng.place_order(order("B1", "BTCUSDT", Side::Buy, 2.0, 100.0), 0)
        .unwrap();
    eng.sweep_fills("BTCUSDT", 99.0, 7);

    let trades = eng.executed_trades("BTCUSDT");
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].order_id, "B1");
    assert_eq!(trades[0].quantity, 2.0);
    assert_eq!(trades[0].price, 100.0);
    assert_eq!(trades[0].action_price, 99.0);
    assert_eq!(trades[0].executed_at_ms, 7);

    assert!(eng.executed_trades("ETHUSDT").is_empty());
}

// -----------------------------------------------------------------------------
// Cancellation
// -----------------------------------------------------------------------------

#[test]
fn cancel_processed_before_the_sweep_always_wins() {
    let mut eng = engine();
    eng.place_order(order("X1", "BTCUSDT", Side::Buy, 1.0, 100.0), 0)
        .unwrap();

    // Same cycle: the cancel is handled first, then the sweep runs.
    let ack = eng.cancel_order("X1", "TRADER1");
    assert_eq!(ack.ack_kind, AckKind::Cancelled);

    let fills = eng.sweep_fills("BTCUSDT", 99.0, 1);
    assert!(fills.is_empty(), "cancelled order must not fill");
}

#[test]
fn cancelling_a_missing_or_spent_order_reports_not_found() {
    let mut eng = engine();

    // Never existed.
    let ack = eng.cancel_order("NOPE", "TRADER1");
    assert_eq!(ack.ack_kind, AckKind::NotFound);
    assert_eq!(ack.target_id, "TRADER1");

    // Already cancelled: no second cancelled ack.
    eng.place_order(order("X1", "BTCUSDT", Side::Buy, 1.0, 100.0), 0)
        .unwrap();
    assert_eq!(eng.cancel_order("X1", "TRADER1").ack_kind, AckKind::Cancelled);
    assert_eq!(eng.cancel_order("X1", "TRADER1").ack_kind, AckKind::NotFound);

    // Already filled.
    eng.place_order(order("X2", "BTCUSDT", Side::Buy, 1.0, 100.0), 0)
        .unwrap();
    eng.sweep_fills("BTCUSDT", 99.0, 1);
    assert_eq!(eng.cancel_order("X2", "TRADER1").ack_kind, AckKind::NotFound);
}

// -----------------------------------------------------------------------------
// Timeouts
// -----------------------------------------------------------------------------

#[test]
fn aged_orders_fill_at_their_own_limit_when_timeout_policy_is_on() {
    let mut eng = engine_with_timeout(1_000);
    eng.place_order(order("T1", "BTCUSDT", Side::Buy, 1.0, 100.0), 5_000)
        .unwrap();

    assert!(eng.sweep_timeouts(5_999).is_empty());

    let fills = eng.sweep_timeouts(6_000);
    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].ack_kind, AckKind::Filled);
    assert_eq!(fills[0].price, 100.0);
    assert_eq!(fills[0].action_price, Some(100.0));
    assert_eq!(eng.resting_order_count(), 0);
}

#[test]
fn timeout_sweep_is_a_no_op_under_cross_only_policy() {
    let mut eng = engine();
    eng.place_order(order("T1", "BTCUSDT", Side::Buy, 1.0, 100.0), 0)
        .unwrap();
    assert!(eng.sweep_timeouts(u64::MAX).is_empty());
    assert_eq!(eng.resting_order_count(), 1);
}

// -----------------------------------------------------------------------------
// Top-of-book replacement
// -----------------------------------------------------------------------------

#[test]
fn book_reflects_only_the_latest_quote_not_an_accumulation() {
    let mut eng = engine();

    let r1 = eng.update_quote(&quote("BTCUSDT", 1, 100.0, 102.0)).unwrap();
    assert_eq!(r1, 101.0);

    let r2 = eng.update_quote(&quote("BTCUSDT", 2, 99.0, 101.0)).unwrap();
    assert_eq!(r2, 100.0);

    let book = eng.get_book("BTCUSDT");
    assert_eq!(book.bids.len(), 1);
    assert_eq!(book.asks.len(), 1);
    assert_eq!(book.bids[0].price, 99.0);
    assert_eq!(book.asks[0].price, 101.0);
    assert_eq!(eng.reference_price("BTCUSDT"), Some(100.0));
}

#[test]
fn stale_quotes_are_ignored() {
    let mut eng = engine();
    eng.update_quote(&quote("BTCUSDT", 5, 100.0, 102.0)).unwrap();

    // Same sequence again, and an older one: both dropped.
    assert_eq!(eng.update_quote(&quote("BTCUSDT", 5, 1.0, 2.0)), None);
    assert_eq!(eng.update_quote(&quote("BTCUSDT", 4, 1.0, 2.0)), None);
    assert_eq!(eng.reference_price("BTCUSDT"), Some(101.0));
}

#[test]
fn sequence_zero_is_accepted_once_then_stale() {
    let mut eng = engine();

    // A feed may legitimately start at sequence 0; the first such
    // quote applies.
    assert_eq!(eng.update_quote(&quote("BTCUSDT", 0, 99.5, 100.5)), Some(100.0));

    // Replaying it must not re-trigger sweeps.
    assert_eq!(eng.update_quote(&quote("BTCUSDT", 0, 1.0, 2.0)), None);
    assert_eq!(eng.reference_price("BTCUSDT"), Some(100.0));
}

#[test]
fn single_sided_quotes_use_the_present_side_as_reference() {
    let mut eng = engine();
    let update = QuoteUpdate {
        instrument: "BTCUSDT".to_string(),
        update_id: 1,
        best_bid: Some((100.0, 1.0)),
        best_ask: None,
        transaction_time: 0,
        event_time: 0,
    };
    assert_eq!(eng.update_quote(&update), Some(100.0));

    let book = eng.get_book("BTCUSDT");
    assert_eq!(book.bids.len(), 1);
    assert!(book.asks.is_empty());
}

#[test]
fn unknown_instrument_queries_return_an_empty_book() {
    let eng = engine();
    let book = eng.get_book("DOGEUSDT");
    assert!(book.bids.is_empty());
    assert!(book.asks.is_empty());
}

#[test]
fn quotes_for_unconfigured_instruments_trigger_no_sweep() {
    let mut eng = engine();
    assert_eq!(eng.update_quote(&quote("DOGEUSDT", 1, 1.0, 2.0)), None);
}
