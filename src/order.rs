//! Order domain types shared by the engine and the per-symbol books.

use serde::{Deserialize, Serialize};
use std::fmt;

/// System-assigned order identifier, allocated from a monotonically increasing
/// sequence owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client-side identity of an order, carried by every inbound command and echoed
/// in every outbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderKey {
    pub user_id: u64,
    pub user_order_id: u64,
}

impl OrderKey {
    pub fn new(user_id: u64, user_order_id: u64) -> Self {
        Self {
            user_id,
            user_order_id,
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.user_id, self.user_order_id)
    }
}

/// Which side of the book an order belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side an aggressor on `self` matches against.
    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Single-character wire code (`B` / `S`).
    pub fn as_char(&self) -> char {
        match self {
            Side::Buy => 'B',
            Side::Sell => 'S',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// LIMIT orders rest after matching; MARKET orders never rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    Limit,
    Market,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Limit => write!(f, "LIMIT"),
            OrderKind::Market => write!(f, "MARKET"),
        }
    }
}

/// Lifecycle state of an order. `Active` means the order either rests on a book or
/// is currently being matched; the other two states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Active,
    Filled,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Active)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Active => write!(f, "ACTIVE"),
            OrderStatus::Filled => write!(f, "FILLED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// The full order state the engine keeps for every accepted submission.
///
/// The books themselves only carry the identity and remaining quantity of each
/// resting entry; this record is the source of truth for everything else a client
/// may ask about after the fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub key: OrderKey,
    pub tag: Option<String>,
    pub symbol: String,
    pub side: Side,
    pub kind: OrderKind,
    /// Limit price; `None` for MARKET orders.
    pub price: Option<f64>,
    pub original_quantity: f64,
    pub remaining_quantity: f64,
    /// Sum of `fill price x fill quantity` over this order's executions.
    pub cumulative_cost: f64,
    pub status: OrderStatus,
    /// Nanoseconds since epoch at admission.
    pub entry_time: u64,
}

impl OrderRecord {
    pub(crate) fn new(
        id: OrderId,
        key: OrderKey,
        tag: Option<String>,
        symbol: String,
        side: Side,
        kind: OrderKind,
        price: Option<f64>,
        quantity: f64,
        entry_time: u64,
    ) -> Self {
        Self {
            id,
            key,
            tag,
            symbol,
            side,
            kind,
            price,
            original_quantity: quantity,
            remaining_quantity: quantity,
            cumulative_cost: 0.0,
            status: OrderStatus::Active,
            entry_time,
        }
    }

    /// Quantity executed so far.
    pub fn executed_quantity(&self) -> f64 {
        self.original_quantity - self.remaining_quantity
    }
}

/// A request to submit a LIMIT order.
#[derive(Debug, Clone)]
pub struct LimitOrderRequest {
    pub symbol: String,
    pub side: Side,
    pub quantity: f64,
    pub price: f64,
    pub user_id: u64,
    pub user_order_id: u64,
    /// Optional client label; rebinds silently if an earlier live order used it.
    pub tag: Option<String>,
}

/// A request to submit a MARKET order.
#[derive(Debug, Clone)]
pub struct MarketOrderRequest {
    pub symbol: String,
    pub side: Side,
    pub quantity: f64,
    pub user_id: u64,
    pub user_order_id: u64,
    pub tag: Option<String>,
}
