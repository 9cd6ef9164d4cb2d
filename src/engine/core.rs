//! The engine: command orchestration over books and the registry.
//!
//! One engine thread owns all mutation. There are no locks on the matching path;
//! the only synchronisation in the system sits at the edges (shadow snapshots,
//! registry projections), which is what keeps per-command latency flat.

use super::config::EngineConfig;
use super::error::EngineError;
use super::registry::OrderRegistry;
use crate::events::{EngineEvent, EventListener};
use crate::order::{OrderId, OrderRecord, OrderStatus};
use crate::orderbook::{BookSnapshot, DepthFeed, OrderBook};
use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use tracing::{info, trace};

/// First system-assigned order identifier.
pub(super) const ORDER_ID_BASE: u64 = 1000;

/// First execution identifier.
pub(super) const EXEC_ID_BASE: u64 = 1_000_000;

/// Result of a successful cancellation at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CancelAck {
    pub order_id: OrderId,
    /// Quantity that was still resting when the order was removed.
    pub removed_quantity: f64,
}

/// The matching engine: per-symbol books behind a global registry, driven by a
/// single command stream.
pub struct Engine {
    pub(super) config: EngineConfig,
    pub(super) books: HashMap<String, OrderBook>,
    pub(super) registry: OrderRegistry,
    pub(super) next_order_id: u64,
    pub(super) exec_ids: AtomicU64,
    pub(super) listener: Option<EventListener>,
}

impl Engine {
    /// Creates an engine with no event listener; events are still produced
    /// internally but dropped at the boundary.
    pub fn new(config: EngineConfig) -> Self {
        info!("starting matching engine");
        Self {
            config,
            books: HashMap::new(),
            registry: OrderRegistry::new(),
            next_order_id: ORDER_ID_BASE,
            exec_ids: AtomicU64::new(EXEC_ID_BASE),
            listener: None,
        }
    }

    /// Creates an engine that hands every outbound event to `listener`, in
    /// emission order, before the next command is processed.
    pub fn with_listener(config: EngineConfig, listener: EventListener) -> Self {
        let mut engine = Self::new(config);
        engine.listener = Some(listener);
        engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of live resting orders across all books.
    pub fn live_orders(&self) -> usize {
        self.registry.live_len()
    }

    /// Read-only access to a symbol's book, if one exists yet.
    pub fn book(&self, symbol: &str) -> Option<&OrderBook> {
        self.books.get(symbol)
    }

    pub(super) fn emit(&self, event: EngineEvent) {
        trace!(%event, "outbound");
        if let Some(listener) = &self.listener {
            listener(&event);
        }
    }

    pub(super) fn allocate_order_id(&mut self) -> OrderId {
        let id = self.next_order_id;
        self.next_order_id += 1;
        OrderId(id)
    }

    /// A consistent projection of the order.
    ///
    /// For an order that is still active the remaining quantity is reconciled
    /// from the book's live view before returning, so the caller never sees a
    /// stale figure from before the latest sweep.
    pub fn get_order(&self, id: OrderId) -> Result<OrderRecord, EngineError> {
        let mut record = self.registry.record(id).ok_or(EngineError::NotFound)?;
        if record.status == OrderStatus::Active
            && let Some(book) = self.books.get(&record.symbol)
            && let Some(live) = book.remaining_qty(id)
        {
            record.remaining_quantity = live;
            self.registry
                .with_record_mut(id, |stored| stored.remaining_quantity = live);
        }
        Ok(record)
    }

    /// Projection of the order the tag currently points at.
    pub fn get_order_by_tag(&self, tag: &str) -> Result<OrderRecord, EngineError> {
        let id = self.registry.resolve_tag(tag).ok_or(EngineError::NotFound)?;
        self.get_order(id)
    }

    /// Cancels a resting order by identifier.
    pub fn cancel_order(&mut self, id: OrderId) -> Result<CancelAck, EngineError> {
        let record = self.registry.record(id).ok_or(EngineError::NotFound)?;
        if record.status.is_terminal() {
            return Err(EngineError::AlreadyTerminal {
                status: record.status,
            });
        }

        // The registry knows which book owns the order; the book's own location
        // map takes it from there.
        let address = self.registry.location(id).ok_or(EngineError::NotFound)?;
        let cancellation = self
            .books
            .get_mut(&address.symbol)
            .and_then(|book| book.cancel(id))
            .ok_or(EngineError::NotFound)?;

        self.registry.with_record_mut(id, |stored| {
            stored.status = OrderStatus::Cancelled;
            stored.remaining_quantity = cancellation.removed_quantity;
        });
        self.registry.retire(id);

        self.emit(EngineEvent::Cancel { key: record.key });
        for update in &cancellation.bbo_updates {
            self.emit(EngineEvent::TopOfBook {
                side: update.side,
                bbo: update.bbo,
            });
        }

        Ok(CancelAck {
            order_id: id,
            removed_quantity: cancellation.removed_quantity,
        })
    }

    /// Cancels the order the tag currently points at.
    pub fn cancel_by_tag(&mut self, tag: &str) -> Result<CancelAck, EngineError> {
        let id = self.registry.resolve_tag(tag).ok_or(EngineError::NotFound)?;
        self.cancel_order(id)
    }

    /// Top `depth` levels per side from the symbol's shadow; depth 0 means all.
    pub fn snapshot(&self, symbol: &str, depth: usize) -> Result<BookSnapshot, EngineError> {
        self.books
            .get(symbol)
            .map(|book| book.snapshot(depth))
            .ok_or(EngineError::NotFound)
    }

    /// Cloneable reader handle over the symbol's shadow, for threads that need
    /// depth views without going through the engine.
    pub fn depth_feed(&self, symbol: &str) -> Option<DepthFeed> {
        self.books.get(symbol).map(|book| book.depth_feed())
    }

    /// Wipes every book and the whole registry. Books are kept allocated so a
    /// busy symbol does not pay re-creation cost after a reset.
    pub fn flush(&mut self) {
        for book in self.books.values_mut() {
            book.clear();
        }
        self.registry.clear();
        info!("engine state flushed");
    }
}
