//! The taker/maker execution sweep.

use super::book::OrderBook;
use super::snapshot::BboUpdate;
use crate::order::{OrderId, OrderKey, OrderKind, OrderRecord, OrderStatus, Side};
use crate::utils::precision::{is_greater, is_less, is_positive, is_zero, subtract_or_zero};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// One matching event between the taker and a single resting maker.
///
/// `maker_remaining` is the maker's quantity after this fill, so the caller can
/// update its own view of the maker without re-querying the book.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub exec_id: u64,
    /// Always the resting (maker) price; price improvement accrues to the taker.
    pub price: f64,
    pub quantity: f64,
    pub taker_id: OrderId,
    pub taker_key: OrderKey,
    pub maker_id: OrderId,
    pub maker_key: OrderKey,
    pub maker_remaining: f64,
}

/// Outcome of one execution: fills in the order they occurred, the taker's
/// remaining quantity, and whatever top-of-book changes the sweep produced.
#[derive(Debug)]
pub struct MatchResult {
    pub taker_id: OrderId,
    pub remaining_quantity: f64,
    pub fills: Vec<Fill>,
    pub bbo_updates: Vec<BboUpdate>,
}

impl MatchResult {
    /// Total quantity executed across all fills.
    pub fn executed_quantity(&self) -> f64 {
        self.fills.iter().map(|fill| fill.quantity).sum()
    }

    pub fn is_complete(&self) -> bool {
        !is_positive(self.remaining_quantity)
    }
}

impl OrderBook {
    /// Runs `taker` against the opposite side under strict price-time priority,
    /// then settles the residual: a LIMIT remainder is placed on its own side, a
    /// MARKET remainder is cancelled in place with the unfilled quantity kept on
    /// the record. Fully consumed takers are marked filled and snapped to zero.
    ///
    /// The shadow is refreshed exactly once at the end, whether or not the sweep
    /// changed anything.
    pub fn execute(&mut self, taker: &mut OrderRecord, exec_ids: &AtomicU64) -> MatchResult {
        trace!(
            symbol = %self.symbol,
            order = %taker.id,
            side = %taker.side,
            kind = %taker.kind,
            quantity = taker.remaining_quantity,
            "executing taker"
        );
        let mut fills = Vec::new();

        {
            let Self {
                bids,
                asks,
                arena,
                locations,
                last_trade_price,
                ..
            } = self;
            let maker_side = match taker.side {
                Side::Buy => asks,
                Side::Sell => bids,
            };

            'sweep: while is_positive(taker.remaining_quantity) {
                let Some(level) = maker_side.best_mut() else {
                    break;
                };

                // LIMIT takers stop the moment the best maker price no longer
                // crosses their own limit; MARKET takers sweep until dry.
                if taker.kind == OrderKind::Limit
                    && let Some(limit) = taker.price
                {
                    match taker.side {
                        Side::Buy if is_greater(level.price, limit) => break 'sweep,
                        Side::Sell if is_less(level.price, limit) => break 'sweep,
                        _ => {}
                    }
                }

                // Consume the level front to back: earliest arrival first.
                let mut cursor = level.front();
                while let Some(handle) = cursor {
                    if !is_positive(taker.remaining_quantity) {
                        break;
                    }
                    let entry = arena
                        .get_mut(handle)
                        .expect("level queue points at a vacant slot");
                    let trade_quantity = taker.remaining_quantity.min(entry.remaining_quantity);
                    let exec_id = exec_ids.fetch_add(1, Ordering::Relaxed);

                    subtract_or_zero(&mut entry.remaining_quantity, trade_quantity);
                    let maker_id = entry.order_id;
                    let maker_key = entry.key;
                    let maker_remaining = entry.remaining_quantity;
                    let next = entry.next;

                    fills.push(Fill {
                        exec_id,
                        price: level.price,
                        quantity: trade_quantity,
                        taker_id: taker.id,
                        taker_key: taker.key,
                        maker_id,
                        maker_key,
                        maker_remaining,
                    });

                    subtract_or_zero(&mut taker.remaining_quantity, trade_quantity);
                    taker.cumulative_cost += trade_quantity * level.price;
                    subtract_or_zero(&mut level.total_volume, trade_quantity);
                    *last_trade_price = level.price;

                    if is_zero(maker_remaining) {
                        level.unlink(arena, handle);
                        locations.remove(&maker_id);
                    }
                    cursor = next;
                }

                if level.is_empty() {
                    maker_side.pop_best();
                } else {
                    // Taker exhausted inside this level; the partial maker stays.
                    break;
                }
            }
        }

        if is_positive(taker.remaining_quantity) {
            match taker.kind {
                OrderKind::Limit => {
                    if let Some(price) = taker.price {
                        self.place(taker.id, taker.key, taker.side, price, taker.remaining_quantity);
                    }
                }
                OrderKind::Market => {
                    // Unfilled remainder stays on the record for client inspection.
                    taker.status = OrderStatus::Cancelled;
                }
            }
        } else {
            taker.status = OrderStatus::Filled;
            taker.remaining_quantity = 0.0;
        }

        let bbo_updates = self.refresh_depth();
        MatchResult {
            taker_id: taker.id,
            remaining_quantity: taker.remaining_quantity,
            fills,
            bbo_updates,
        }
    }
}
