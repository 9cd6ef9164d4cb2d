//! Resting-order operations: placement, cancellation, live lookups, reset.

use super::arena::Entry;
use super::book::{OrderBook, OrderLocation};
use super::snapshot::{Bbo, BboUpdate};
use crate::order::{OrderId, OrderKey, Side};
use crate::utils::precision::subtract_or_zero;
use tracing::trace;

/// Result of a successful cancellation.
#[derive(Debug)]
pub struct Cancellation {
    /// Quantity that was still resting when the order was removed.
    pub removed_quantity: f64,
    pub bbo_updates: Vec<BboUpdate>,
}

impl OrderBook {
    /// Rests a residual LIMIT quantity at `price` on its own side, creating the
    /// level if this is the first order at that price, and records the entry's
    /// location for later cancellation.
    pub(super) fn place(
        &mut self,
        id: OrderId,
        key: OrderKey,
        side: Side,
        price: f64,
        quantity: f64,
    ) {
        trace!(
            symbol = %self.symbol,
            order = %id,
            %side,
            price,
            quantity,
            "resting order"
        );
        let Self {
            bids,
            asks,
            arena,
            locations,
            ..
        } = self;
        let own_side = match side {
            Side::Buy => bids,
            Side::Sell => asks,
        };
        let idx = own_side.find_or_create(price);
        let handle = own_side
            .get_mut(idx)
            .push_back(arena, Entry::new(id, key, quantity));
        locations.insert(
            id,
            OrderLocation {
                side,
                price,
                handle,
            },
        );
    }

    /// Removes a resting order, returning the removed quantity and any resulting
    /// top-of-book changes. `None` if the id does not rest on this book (unknown,
    /// already consumed, or already cancelled).
    pub fn cancel(&mut self, order_id: OrderId) -> Option<Cancellation> {
        let location = self.locations.remove(&order_id)?;
        let removed_quantity = {
            let Self {
                bids, asks, arena, ..
            } = self;
            let own_side = match location.side {
                Side::Buy => bids,
                Side::Sell => asks,
            };
            let Some(idx) = own_side.find(location.price) else {
                debug_assert!(false, "location points at a missing level");
                return None;
            };
            let level = own_side.get_mut(idx);
            let entry = level.unlink(arena, location.handle)?;
            subtract_or_zero(&mut level.total_volume, entry.remaining_quantity);
            own_side.prune_if_empty(idx);
            entry.remaining_quantity
        };
        trace!(
            symbol = %self.symbol,
            order = %order_id,
            quantity = removed_quantity,
            "cancelled resting order"
        );
        let bbo_updates = self.refresh_depth();
        Some(Cancellation {
            removed_quantity,
            bbo_updates,
        })
    }

    /// Live remaining quantity of a resting order, straight from the book.
    pub fn remaining_qty(&self, order_id: OrderId) -> Option<f64> {
        let location = self.locations.get(&order_id)?;
        self.arena
            .get(location.handle)
            .map(|entry| entry.remaining_quantity)
    }

    /// Wipes both sides without deallocating the book.
    ///
    /// The shadow sequence advances over an empty depth and the published tops
    /// reset to the sentinel without emitting deltas. The last traded price is
    /// kept, so the price corridor stays anchored across a flush.
    pub fn clear(&mut self) {
        trace!(symbol = %self.symbol, "clearing book");
        self.bids.clear();
        self.asks.clear();
        self.arena.clear();
        self.locations.clear();
        self.published_bid = Bbo::EMPTY;
        self.published_ask = Bbo::EMPTY;
        let _ = self.refresh_depth();
    }
}
