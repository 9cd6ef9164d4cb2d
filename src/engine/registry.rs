//! Global order registry.
//!
//! Three live indices (id -> book address, client key -> id, tag -> id) plus the
//! fat-record store. Live entries exist exactly while the order rests on a book;
//! terminal records stay inspectable through a bounded FIFO history window.
//!
//! Only the engine thread mutates the registry. The maps are sharded concurrent
//! maps so that projections (order lookups, live counts) can be served to other
//! threads without stalling the writer.

use crate::order::{OrderId, OrderKey, OrderRecord, Side};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Terminal records kept for inspection before FIFO eviction.
const MAX_HISTORY: usize = 1000;

/// Which book a live order rests in. The book's own location map refines this
/// to the concrete level and entry handle.
#[derive(Debug, Clone)]
pub(crate) struct BookAddress {
    pub symbol: String,
    pub side: Side,
    pub price: f64,
}

pub(crate) struct OrderRegistry {
    /// Live resting orders only; its size is the global capacity gauge.
    locations: DashMap<OrderId, BookAddress>,

    /// Client identity of each live order. Collisions are rejected upstream, so
    /// this is one-to-one while an order lives.
    keys: DashMap<OrderKey, OrderId>,

    /// Secondary tag index. Re-registering a tag rebinds it silently; the older
    /// order stays reachable by identifier only.
    tags: DashMap<String, OrderId>,

    /// Fat records for live orders plus the bounded terminal window.
    orders: DashMap<OrderId, OrderRecord>,

    /// Terminal ids in completion order, oldest first.
    retired: Mutex<VecDeque<OrderId>>,
}

impl OrderRegistry {
    pub fn new() -> Self {
        Self {
            locations: DashMap::new(),
            keys: DashMap::new(),
            tags: DashMap::new(),
            orders: DashMap::new(),
            retired: Mutex::new(VecDeque::with_capacity(MAX_HISTORY)),
        }
    }

    /// Number of live resting orders across all books.
    pub fn live_len(&self) -> usize {
        self.locations.len()
    }

    pub fn resolve_key(&self, key: &OrderKey) -> Option<OrderId> {
        self.keys.get(key).map(|id| *id.value())
    }

    pub fn resolve_tag(&self, tag: &str) -> Option<OrderId> {
        self.tags.get(tag).map(|id| *id.value())
    }

    pub fn location(&self, id: OrderId) -> Option<BookAddress> {
        self.locations.get(&id).map(|address| address.value().clone())
    }

    /// Clone of the stored record, live or recently terminal.
    pub fn record(&self, id: OrderId) -> Option<OrderRecord> {
        self.orders.get(&id).map(|record| record.value().clone())
    }

    /// Runs `mutate` against the stored record, if it exists.
    pub fn with_record_mut<R>(
        &self,
        id: OrderId,
        mutate: impl FnOnce(&mut OrderRecord) -> R,
    ) -> Option<R> {
        self.orders
            .get_mut(&id)
            .map(|mut record| mutate(record.value_mut()))
    }

    /// Admits a freshly validated order: stores the record, binds the client key,
    /// and rebinds the tag if one was supplied. Runs before any matching attempt.
    pub fn admit(&self, record: &OrderRecord) {
        self.keys.insert(record.key, record.id);
        if let Some(tag) = &record.tag {
            self.tags.insert(tag.clone(), record.id);
        }
        self.orders.insert(record.id, record.clone());
    }

    /// Writes back the taker's post-execution state.
    pub fn commit(&self, record: &OrderRecord) {
        self.orders.insert(record.id, record.clone());
    }

    /// Marks a placed residual as live at `address`.
    pub fn register_location(&self, id: OrderId, address: BookAddress) {
        self.locations.insert(id, address);
    }

    /// Drops an order's live indices once it has gone terminal and rolls its
    /// record into the history window, evicting the oldest beyond capacity.
    ///
    /// The key and tag mappings are removed only if they still point at `id`;
    /// a tag that was rebound to a newer order must survive the late retirement
    /// of the order that used it first.
    pub fn retire(&self, id: OrderId) {
        self.locations.remove(&id);
        let Some(record) = self.record(id) else {
            return;
        };
        self.keys.remove_if(&record.key, |_, mapped| *mapped == id);
        if let Some(tag) = &record.tag {
            self.tags.remove_if(tag, |_, mapped| *mapped == id);
        }

        let mut retired = self
            .retired
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        retired.push_back(id);
        if retired.len() > MAX_HISTORY
            && let Some(evicted) = retired.pop_front()
        {
            self.orders.remove(&evicted);
        }
    }

    /// Wipes every index and the history window.
    pub fn clear(&self) {
        self.locations.clear();
        self.keys.clear();
        self.tags.clear();
        self.orders.clear();
        self.retired
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
