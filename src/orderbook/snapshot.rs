//! Shadow snapshot and top-of-book publication.
//!
//! The live price-sorted structures are owned by the matching path and are never
//! read directly by other threads. After every execution or cancellation the book
//! mirrors its depth into a sequenced shadow behind a reader-writer lock; snapshot
//! requests at any depth are served from that mirror alone.

use super::book::OrderBook;
use crate::order::Side;
use crate::utils::precision::{is_equal, is_positive};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::trace;

/// Best price and volume of one side of a book.
///
/// An empty side is the `-1.0 / 0.0` sentinel; comparisons are epsilon-safe so
/// float jitter deep in a fill chain cannot produce ghost top-of-book updates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bbo {
    pub price: f64,
    pub volume: f64,
}

impl Bbo {
    pub const EMPTY: Bbo = Bbo {
        price: -1.0,
        volume: 0.0,
    };

    pub(crate) fn new(price: f64, volume: f64) -> Self {
        Self { price, volume }
    }

    /// True if this side has no resting volume.
    pub fn is_empty(&self) -> bool {
        !is_positive(self.volume)
    }

    /// Epsilon-safe change detection against the last published value.
    pub fn differs_from(&self, other: &Bbo) -> bool {
        !is_equal(self.price, other.price) || !is_equal(self.volume, other.volume)
    }
}

/// A top-of-book change on one side, ready to be published.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BboUpdate {
    pub side: Side,
    pub bbo: Bbo,
}

/// One `{price, quantity}` rung of a depth view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: f64,
    pub quantity: f64,
}

/// The passive mirror the matching path refreshes after every execution.
#[derive(Debug, Default)]
pub(crate) struct ShadowBook {
    pub sequence: u64,
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
}

/// A point-in-time view of one book's depth, best levels first on both sides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub symbol: String,
    /// Version of the shadow this view was cut from; monotonically increasing.
    pub sequence: u64,
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
}

impl BookSnapshot {
    /// Best bid price and quantity, if any.
    pub fn best_bid(&self) -> Option<(f64, f64)> {
        self.bids.first().map(|level| (level.price, level.quantity))
    }

    /// Best ask price and quantity, if any.
    pub fn best_ask(&self) -> Option<(f64, f64)> {
        self.asks.first().map(|level| (level.price, level.quantity))
    }

    /// Midpoint of the best bid and ask prices.
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some((bid + ask) / 2.0),
            _ => None,
        }
    }

    /// Best ask price minus best bid price.
    pub fn spread(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some(ask - bid),
            _ => None,
        }
    }

    /// Total resting quantity on the bid side of this view.
    pub fn total_bid_volume(&self) -> f64 {
        self.bids.iter().map(|level| level.quantity).sum()
    }

    /// Total resting quantity on the ask side of this view.
    pub fn total_ask_volume(&self) -> f64 {
        self.asks.iter().map(|level| level.quantity).sum()
    }
}

/// Cloneable reader handle over one book's shadow.
///
/// Clones can be handed to any number of reader threads; each snapshot call takes
/// the shared lock only for the duration of the copy, so readers never observe a
/// half-refreshed book and never block the matching path beyond the refresh pass.
#[derive(Debug, Clone)]
pub struct DepthFeed {
    symbol: String,
    shadow: Arc<RwLock<ShadowBook>>,
}

impl DepthFeed {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Cuts a view of the top `depth` levels per side; depth 0 means all levels.
    pub fn snapshot(&self, depth: usize) -> BookSnapshot {
        let shadow = self.shadow.read().unwrap_or_else(PoisonError::into_inner);
        BookSnapshot {
            symbol: self.symbol.clone(),
            sequence: shadow.sequence,
            bids: copy_top(&shadow.bids, depth),
            asks: copy_top(&shadow.asks, depth),
        }
    }
}

fn copy_top(levels: &[BookLevel], depth: usize) -> Vec<BookLevel> {
    let count = if depth == 0 {
        levels.len()
    } else {
        depth.min(levels.len())
    };
    levels[..count].to_vec()
}

impl OrderBook {
    /// Cuts a snapshot of the top `depth` levels per side from the shadow;
    /// depth 0 means all levels.
    pub fn snapshot(&self, depth: usize) -> BookSnapshot {
        let shadow = self.shadow.read().unwrap_or_else(PoisonError::into_inner);
        BookSnapshot {
            symbol: self.symbol.clone(),
            sequence: shadow.sequence,
            bids: copy_top(&shadow.bids, depth),
            asks: copy_top(&shadow.asks, depth),
        }
    }

    /// Hands out a reader handle sharing this book's shadow.
    pub fn depth_feed(&self) -> DepthFeed {
        DepthFeed {
            symbol: self.symbol.clone(),
            shadow: Arc::clone(&self.shadow),
        }
    }

    /// Rebuilds the shadow from the live structures and reports which sides of
    /// the top of book changed since the last publication, bid side first.
    pub(super) fn refresh_depth(&mut self) -> Vec<BboUpdate> {
        {
            let mut shadow = self.shadow.write().unwrap_or_else(PoisonError::into_inner);
            shadow.sequence += 1;
            shadow.bids.clear();
            shadow.bids.extend(self.bids.levels().iter().map(|level| BookLevel {
                price: level.price,
                quantity: level.total_volume,
            }));
            shadow.asks.clear();
            shadow.asks.extend(self.asks.levels().iter().map(|level| BookLevel {
                price: level.price,
                quantity: level.total_volume,
            }));
            trace!(
                symbol = %self.symbol,
                sequence = shadow.sequence,
                "shadow refreshed"
            );
        }

        let mut updates = Vec::new();
        let bid = self.bids.top_of_book();
        if bid.differs_from(&self.published_bid) {
            self.published_bid = bid;
            updates.push(BboUpdate {
                side: Side::Buy,
                bbo: bid,
            });
        }
        let ask = self.asks.top_of_book();
        if ask.differs_from(&self.published_ask) {
            self.published_ask = ask;
            updates.push(BboUpdate {
                side: Side::Sell,
                bbo: ask,
            });
        }
        updates
    }
}
