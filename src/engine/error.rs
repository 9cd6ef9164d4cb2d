//! Engine error types.

use crate::order::{OrderKey, OrderStatus};
use std::fmt;

/// Statutory validation failures. Recoverable by the client; the engine state is
/// untouched when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Quantity missing, non-finite, or outside the configured bounds.
    InvalidQuantity,
    /// Price non-finite or outside the configured magnitude bounds.
    InvalidPrice,
    /// Symbol empty, too long, or not whitelisted.
    InvalidSymbol,
    /// Tag longer than the configured maximum.
    InvalidTag,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidQuantity => write!(f, "Invalid quantity"),
            ValidationError::InvalidPrice => write!(f, "Invalid price"),
            ValidationError::InvalidSymbol => write!(f, "Invalid symbol"),
            ValidationError::InvalidTag => write!(f, "Invalid tag"),
        }
    }
}

/// Which structural limit a submission ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityKind {
    /// The global live-order cap.
    GlobalOrders,
    /// The per-book price-level cap.
    PriceLevels,
}

/// Errors surfaced at the engine API boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Input failed statutory validation.
    Validation(ValidationError),

    /// A structural capacity limit was reached.
    CapacityExhausted(CapacityKind),

    /// LIMIT price outside the dynamic corridor around the last traded price.
    PriceOutOfBand {
        price: f64,
        lower: f64,
        upper: f64,
    },

    /// The client identity collides with a live order.
    DuplicateIdentity {
        key: OrderKey,
    },

    /// Cancel or lookup by an identifier or tag that does not resolve.
    NotFound,

    /// Cancel of an order that is no longer active.
    AlreadyTerminal {
        status: OrderStatus,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Validation(kind) => write!(f, "{}", kind),
            EngineError::CapacityExhausted(CapacityKind::GlobalOrders) => {
                write!(f, "Engine at max capacity")
            }
            EngineError::CapacityExhausted(CapacityKind::PriceLevels) => {
                write!(f, "Order book too fragmented")
            }
            EngineError::PriceOutOfBand {
                price,
                lower,
                upper,
            } => {
                write!(
                    f,
                    "Price {} outside corridor [{}, {}]",
                    price, lower, upper
                )
            }
            EngineError::DuplicateIdentity { key } => {
                write!(f, "Duplicate order id {}", key)
            }
            EngineError::NotFound => write!(f, "Order not found"),
            EngineError::AlreadyTerminal { status } => {
                write!(f, "Order already {}", status)
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl From<ValidationError> for EngineError {
    fn from(kind: ValidationError) -> Self {
        EngineError::Validation(kind)
    }
}
