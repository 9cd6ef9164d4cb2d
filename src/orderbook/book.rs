//! Core per-symbol order book state.

use super::arena::{EntryArena, EntryHandle};
use super::level::BookSide;
use super::snapshot::{Bbo, ShadowBook};
use crate::order::{OrderId, Side};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::trace;

/// Where a resting order lives: which side, at which price, behind which handle.
///
/// The handle stays valid for as long as the entry rests, no matter what happens
/// to other entries on the same or other levels.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OrderLocation {
    pub side: Side,
    pub price: f64,
    pub handle: EntryHandle,
}

/// One symbol's two-sided book.
///
/// Owns the price-sorted level structures, the entry arena they thread through,
/// and a local `id -> location` map that makes cancellation O(log L) to find the
/// level plus O(1) to remove the entry. All mutation happens on the engine
/// thread; readers only ever touch the shadow.
pub struct OrderBook {
    pub(super) symbol: String,

    /// Bid levels, sorted highest price first.
    pub(super) bids: BookSide,

    /// Ask levels, sorted lowest price first.
    pub(super) asks: BookSide,

    /// Backing storage for every resting entry on either side.
    pub(super) arena: EntryArena,

    /// Direct route from an order id to its resting entry.
    pub(super) locations: HashMap<OrderId, OrderLocation>,

    /// Price of the most recent fill; 0.0 until the first trade.
    pub(super) last_trade_price: f64,

    /// Last published tops, for epsilon-safe delta suppression.
    pub(super) published_bid: Bbo,
    pub(super) published_ask: Bbo,

    pub(super) shadow: Arc<RwLock<ShadowBook>>,
}

impl OrderBook {
    /// Creates an empty book for `symbol`.
    pub fn new(symbol: &str) -> Self {
        trace!(symbol, "creating order book");
        Self {
            symbol: symbol.to_string(),
            bids: BookSide::new(Side::Buy),
            asks: BookSide::new(Side::Sell),
            arena: EntryArena::new(),
            locations: HashMap::new(),
            last_trade_price: 0.0,
            published_bid: Bbo::EMPTY,
            published_ask: Bbo::EMPTY,
            shadow: Arc::new(RwLock::new(ShadowBook::default())),
        }
    }

    /// The symbol this book manages.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Best bid price, if any.
    pub fn best_bid(&self) -> Option<f64> {
        self.bids.best().map(|level| level.price)
    }

    /// Best ask price, if any.
    pub fn best_ask(&self) -> Option<f64> {
        self.asks.best().map(|level| level.price)
    }

    /// Midpoint of the best bid and ask.
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            _ => None,
        }
    }

    /// Best ask minus best bid.
    pub fn spread(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Price of the most recent fill on this book; `None` before the first trade.
    ///
    /// This is the centre of the dynamic price corridor new LIMITs are validated
    /// against.
    pub fn last_trade_price(&self) -> Option<f64> {
        if self.last_trade_price > 0.0 {
            Some(self.last_trade_price)
        } else {
            None
        }
    }

    /// Unique price points across both sides, the quantity the per-book level
    /// cap guards.
    pub fn price_level_count(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    /// True if either side already has a level at `price` (epsilon-safe).
    ///
    /// An existing level can always absorb more volume without growing the
    /// structure, so the level cap does not apply to it.
    pub fn has_level(&self, price: f64) -> bool {
        self.bids.find(price).is_some() || self.asks.find(price).is_some()
    }

    /// Number of orders currently resting on this book.
    pub fn resting_orders(&self) -> usize {
        self.locations.len()
    }
}
