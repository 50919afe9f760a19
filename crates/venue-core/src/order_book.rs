//! Per-instrument top-of-book state and reference-price tracking.
//!
//! Each instrument owns exactly one slot, overwritten in place on
//! every quote. Nothing is accumulated: the latest update fully
//! supersedes the previous top-of-book for that instrument.
//!
//! The slots live in a fixed arena indexed by instrument id, sized
//! once from the configured instrument set.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::messages::QuoteUpdate;

/// One side of the top-of-book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: f64,
    pub quantity: f64,
}

/// Read-only snapshot answering a book query.
///
/// Top-of-book only: each side holds at most one level, and a side
/// never observed is an empty list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
}

/// Top-of-book slot for a single instrument.
#[derive(Debug, Clone, Default)]
pub struct InstrumentBook {
    best_bid: Option<BookLevel>,
    best_ask: Option<BookLevel>,

    /// Midpoint when both sides are present, the single present side
    /// otherwise, `None` when neither side has been observed.
    reference_price: Option<f64>,

    /// Last applied feed sequence; quotes at or below it are stale.
    /// `None` until the first quote lands, so an initial sequence of
    /// zero is still accepted exactly once.
    update_sequence: Option<u64>,
}

impl InstrumentBook {
    pub fn reference_price(&self) -> Option<f64> {
        self.reference_price
    }

    pub fn update_sequence(&self) -> Option<u64> {
        self.update_sequence
    }

    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            bids: self.best_bid.into_iter().collect(),
            asks: self.best_ask.into_iter().collect(),
        }
    }

    fn apply(&mut self, update: &QuoteUpdate) {
        self.best_bid = update
            .best_bid
            .map(|(price, quantity)| BookLevel { price, quantity });
        self.best_ask = update
            .best_ask
            .map(|(price, quantity)| BookLevel { price, quantity });
        self.update_sequence = Some(update.update_id);

        self.reference_price = match (self.best_bid, self.best_ask) {
            (Some(bid), Some(ask)) => Some((bid.price + ask.price) / 2.0),
            (Some(bid), None) => Some(bid.price),
            (None, Some(ask)) => Some(ask.price),
            (None, None) => None,
        };
    }
}

/// The venue's book arena: one [`InstrumentBook`] per configured
/// instrument, indexed by instrument id.
#[derive(Debug)]
pub struct BookSet {
    /// Instrument name -> arena index.
    index: HashMap<String, usize>,
    slots: Vec<InstrumentBook>,
}

impl BookSet {
    /// Build the arena from the configured instrument set. The set is
    /// fixed for the session; unknown instruments are never added
    /// on demand.
    pub fn new<I, S>(instruments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = HashMap::new();
        let mut slots = Vec::new();
        for name in instruments {
            let name = name.into();
            if !index.contains_key(&name) {
                index.insert(name, slots.len());
                slots.push(InstrumentBook::default());
            }
        }
        BookSet { index, slots }
    }

    pub fn contains(&self, instrument: &str) -> bool {
        self.index.contains_key(instrument)
    }

    /// Replace the instrument's top-of-book with this quote and
    /// return the new reference price so the caller can immediately
    /// sweep for fills.
    ///
    /// Returns `None` (no sweep) when:
    /// - the instrument is not configured,
    /// - the quote is stale (`update_id` not beyond the last applied
    ///   sequence),
    /// - the quote leaves neither side present.
    pub fn update_quote(&mut self, update: &QuoteUpdate) -> Option<f64> {
        let slot = self.slot_mut(&update.instrument)?;

        if let Some(applied) = slot.update_sequence {
            if update.update_id <= applied {
                return None;
            }
        }

        slot.apply(update);
        slot.reference_price()
    }

    /// Snapshot of an instrument's top-of-book. Queries are advisory:
    /// an unknown instrument yields an empty book, never an error.
    pub fn get_book(&self, instrument: &str) -> BookSnapshot {
        match self.slot(instrument) {
            Some(slot) => slot.snapshot(),
            None => BookSnapshot::default(),
        }
    }

    pub fn reference_price(&self, instrument: &str) -> Option<f64> {
        self.slot(instrument).and_then(InstrumentBook::reference_price)
    }

    fn slot(&self, instrument: &str) -> Option<&InstrumentBook> {
        self.index.get(instrument).map(|&i| &self.slots[i])
    }

    fn slot_mut(&mut self, instrument: &str) -> Option<&mut InstrumentBook> {
        let idx = *self.index.get(instrument)?;
        Some(&mut self.slots[idx])
    }
}
