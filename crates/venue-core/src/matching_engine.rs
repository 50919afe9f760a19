//! Matching engine orchestrator.
//!
//! Owns the per-instrument book arena and the client-order registry;
//! nothing outside this type mutates either. The session loop in the
//! server is the only caller, so all mutation is single-threaded and
//! strictly ordered by message arrival.
//!
//! Matching model: resting orders cross against the instrument's
//! reference price, not against each other. A fill is always
//! whole-order, as if executed against an infinitely deep reference
//! market. When the timeout policy is enabled, an order that has
//! rested past the configured age is filled at its own limit price,
//! guaranteeing eventual execution.

use std::collections::HashMap;

use crate::error::EngineError;
use crate::messages::{AckMessage, MessageKind, QuoteUpdate, TradeRecord};
use crate::order::Order;
use crate::order_book::{BookSet, BookSnapshot};
use crate::registry::ClientOrderRegistry;
use crate::side::Side;

/// Which fill mechanisms run on a sweep.
///
/// Price-crossing against the reference price is always on; the
/// forced timeout fill is an explicit configuration choice, not an
/// inferred one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FillPolicy {
    /// Reference-price crossing only.
    CrossOnly,
    /// Crossing plus forced fills for orders older than
    /// [`EngineConfig::max_resting_ms`].
    CrossWithTimeout,
}

/// Static engine configuration, fixed for the session.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// The tradable instrument set. Orders for anything else are
    /// rejected at admission.
    pub instruments: Vec<String>,

    pub fill_policy: FillPolicy,

    /// Age at which a resting order is force-filled under
    /// [`FillPolicy::CrossWithTimeout`].
    pub max_resting_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            instruments: vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()],
            fill_policy: FillPolicy::CrossOnly,
            max_resting_ms: 180_000,
        }
    }
}

/// The venue's matching engine.
#[derive(Debug)]
pub struct MatchingEngine {
    config: EngineConfig,
    books: BookSet,
    registry: ClientOrderRegistry,

    /// Fills executed this session, per instrument, for the
    /// trade-history query.
    trades: HashMap<String, Vec<TradeRecord>>,

    /// Counter behind engine-assigned order ids.
    next_order_seq: u64,
}

impl MatchingEngine {
    pub fn new(config: EngineConfig) -> Self {
        let books = BookSet::new(config.instruments.iter().cloned());
        MatchingEngine {
            config,
            books,
            registry: ClientOrderRegistry::new(),
            trades: HashMap::new(),
            next_order_seq: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Quote path
    // -------------------------------------------------------------------------

    /// Apply a quote to the book arena. Returns the instrument's new
    /// reference price when the update changes it into a defined,
    /// fresher state; `None` means no sweep is due.
    pub fn update_quote(&mut self, update: &QuoteUpdate) -> Option<f64> {
        self.books.update_quote(update)
    }

    // -------------------------------------------------------------------------
    // Client-request path
    // -------------------------------------------------------------------------

    /// Admit a client order.
    ///
    /// On success the order rests with `sending_time = now_ms` and an
    /// engine-assigned id when the client left it empty; the returned
    /// ack is `queued` with the `-1` quantity sentinel.
    pub fn place_order(
        &mut self,
        mut order: Order,
        now_ms: u64,
    ) -> Result<AckMessage, EngineError> {
        if !(order.quantity > 0.0) {
            return Err(EngineError::NonPositiveQuantity(order.quantity));
        }
        if !order.limit_price.is_finite() || order.limit_price <= 0.0 {
            return Err(EngineError::InvalidPrice(order.limit_price));
        }
        if !self.books.contains(&order.instrument) {
            return Err(EngineError::UnknownInstrument(order.instrument));
        }

        if order.order_id.is_empty() {
            order.order_id = self.next_order_id();
        } else if self.registry.contains(&order.order_id) {
            return Err(EngineError::DuplicateOrderId(order.order_id));
        }

        order.message_kind = MessageKind::New;
        order.sending_time = now_ms;

        let ack = AckMessage::queued(
            order.sender_id.clone(),
            order.order_id.clone(),
            order.limit_price,
        );
        self.registry.insert(order);
        Ok(ack)
    }

    /// Cancel a resting order.
    ///
    /// A missing target is reported through a `not_found` ack
    /// addressed to the requester; cancelling an already-filled or
    /// already-cancelled id never produces a second `cancelled` ack.
    pub fn cancel_order(&mut self, order_id: &str, requester: &str) -> AckMessage {
        match self.registry.remove(order_id) {
            Some(order) => AckMessage::cancelled(order.sender_id, order.order_id, order.limit_price),
            None => AckMessage::not_found(requester, order_id),
        }
    }

    /// All currently-resting orders for one sender.
    pub fn search_order(&self, sender_id: &str) -> Vec<Order> {
        self.registry.by_sender(sender_id)
    }

    /// Top-of-book snapshot; empty for an unknown instrument.
    pub fn get_book(&self, instrument: &str) -> BookSnapshot {
        self.books.get_book(instrument)
    }

    /// Fills executed this session for one instrument.
    pub fn executed_trades(&self, instrument: &str) -> Vec<TradeRecord> {
        self.trades.get(instrument).cloned().unwrap_or_default()
    }

    pub fn reference_price(&self, instrument: &str) -> Option<f64> {
        self.books.reference_price(instrument)
    }

    pub fn resting_order_count(&self) -> usize {
        self.registry.len()
    }

    // -------------------------------------------------------------------------
    // Sweeps
    // -------------------------------------------------------------------------

    /// Evaluate every resting order of `instrument` against its new
    /// reference price.
    ///
    /// A buy crosses when `reference_price <= limit`, a sell when
    /// `reference_price >= limit`. Crossed orders leave the registry
    /// whole and yield one `filled` ack each, carrying the reference
    /// price as `action_price`. Orders on other instruments are never
    /// touched.
    pub fn sweep_fills(
        &mut self,
        instrument: &str,
        reference_price: f64,
        now_ms: u64,
    ) -> Vec<AckMessage> {
        let mut acks = Vec::new();

        for order_id in self.registry.ids_for_instrument(instrument) {
            let crossed = match self.registry.get(&order_id) {
                Some(order) => match order.side {
                    Side::Buy => reference_price <= order.limit_price,
                    Side::Sell => reference_price >= order.limit_price,
                },
                None => false,
            };
            if !crossed {
                continue;
            }

            if let Some(order) = self.registry.remove(&order_id) {
                acks.push(self.fill(order, reference_price, now_ms));
            }
        }

        acks
    }

    /// Force-fill every order resting at least `max_resting_ms`, at
    /// its own limit price. A no-op under [`FillPolicy::CrossOnly`].
    pub fn sweep_timeouts(&mut self, now_ms: u64) -> Vec<AckMessage> {
        if self.config.fill_policy != FillPolicy::CrossWithTimeout {
            return Vec::new();
        }

        let mut acks = Vec::new();

        for order_id in self.registry.all_ids() {
            let expired = self
                .registry
                .get(&order_id)
                .map(|o| o.resting_ms(now_ms) >= self.config.max_resting_ms)
                .unwrap_or(false);
            if !expired {
                continue;
            }

            if let Some(order) = self.registry.remove(&order_id) {
                let limit = order.limit_price;
                acks.push(self.fill(order, limit, now_ms));
            }
        }

        acks
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    /// Record a whole-order fill and build its ack.
    fn fill(&mut self, order: Order, action_price: f64, now_ms: u64) -> AckMessage {
        self.trades
            .entry(order.instrument.clone())
            .or_default()
            .push(TradeRecord {
                instrument: order.instrument.clone(),
                order_id: order.order_id.clone(),
                sender_id: order.sender_id.clone(),
                quantity: order.quantity,
                price: order.limit_price,
                action_price,
                executed_at_ms: now_ms,
            });

        AckMessage::filled(
            order.sender_id,
            order.order_id,
            order.quantity,
            order.limit_price,
            action_price,
        )
    }

    fn next_order_id(&mut self) -> String {
        // Session-unique; "V" keeps engine-assigned ids out of the
        // typical client id space.
        loop {
            self.next_order_seq += 1;
            let candidate = format!("V{}", self.next_order_seq);
            if !self.registry.contains(&candidate) {
                return candidate;
            }
        }
    }
}
