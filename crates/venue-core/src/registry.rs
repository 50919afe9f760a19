//! The set of currently-resting client orders.
//!
//! Deliberately not organized by price level: the venue matches
//! against the reference price, not against depth, so a flat map
//! keyed by order id is swept in full on every reference-price
//! change.

use std::collections::HashMap;

use crate::order::Order;

/// Live client orders, keyed by `order_id`.
///
/// Created empty at engine start; entries are added on admission and
/// removed on fill or cancel. Never persisted.
#[derive(Debug, Default)]
pub struct ClientOrderRegistry {
    orders: HashMap<String, Order>,
}

impl ClientOrderRegistry {
    pub fn new() -> Self {
        ClientOrderRegistry::default()
    }

    pub fn contains(&self, order_id: &str) -> bool {
        self.orders.contains_key(order_id)
    }

    /// Admit an order. The caller has already validated it and
    /// guaranteed a unique id.
    pub fn insert(&mut self, order: Order) {
        self.orders.insert(order.order_id.clone(), order);
    }

    /// Remove and return an order, if it is still resting.
    pub fn remove(&mut self, order_id: &str) -> Option<Order> {
        self.orders.remove(order_id)
    }

    /// All resting orders for one sender, for "my open orders"
    /// queries. Empty when the sender has none.
    pub fn by_sender(&self, sender_id: &str) -> Vec<Order> {
        self.orders
            .values()
            .filter(|o| o.sender_id == sender_id)
            .cloned()
            .collect()
    }

    /// Ids of resting orders for one instrument. Collected up front
    /// so a sweep can remove entries while iterating.
    pub fn ids_for_instrument(&self, instrument: &str) -> Vec<String> {
        self.orders
            .values()
            .filter(|o| o.instrument == instrument)
            .map(|o| o.order_id.clone())
            .collect()
    }

    /// Ids of every resting order, for timeout sweeps.
    pub fn all_ids(&self) -> Vec<String> {
        self.orders.keys().cloned().collect()
    }

    pub fn get(&self, order_id: &str) -> Option<&Order> {
        self.orders.get(order_id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
