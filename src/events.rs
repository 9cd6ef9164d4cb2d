//! Outbound event stream.
//!
//! Every state change the engine makes is narrated through exactly one of these
//! events, delivered synchronously to the registered listener before the next
//! command is processed. The `Display` impl renders the fixed wire records the
//! downstream gateway expects, one per line.

use crate::order::{OrderKey, Side};
use crate::orderbook::Bbo;
use crate::utils::format::format_decimal;
use serde::Serialize;
use std::fmt;

/// Callback invoked for every outbound event, in emission order.
pub type EventListener = Box<dyn Fn(&EngineEvent) + Send + Sync>;

/// One record on the outbound tape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EngineEvent {
    /// A NEW order passed validation.
    Ack { key: OrderKey },

    /// A NEW order failed validation; nothing was mutated.
    Reject { key: OrderKey, reason: String },

    /// One fill between a taker and one maker. Buy/sell ordering is semantic,
    /// independent of which side was the aggressor.
    Trade {
        buy: OrderKey,
        sell: OrderKey,
        price: f64,
        quantity: f64,
    },

    /// A resting order was removed on client request.
    Cancel { key: OrderKey },

    /// The best price or best volume of one side changed.
    TopOfBook { side: Side, bbo: Bbo },
}

impl fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineEvent::Ack { key } => {
                write!(f, "A, {}, {}", key.user_id, key.user_order_id)
            }
            EngineEvent::Reject { key, reason } => {
                write!(f, "R, {}, {}, {}", key.user_id, key.user_order_id, reason)
            }
            EngineEvent::Trade {
                buy,
                sell,
                price,
                quantity,
            } => {
                write!(
                    f,
                    "T, {}, {}, {}, {}, {}, {}",
                    buy.user_id,
                    buy.user_order_id,
                    sell.user_id,
                    sell.user_order_id,
                    format_decimal(*price),
                    format_decimal(*quantity)
                )
            }
            EngineEvent::Cancel { key } => {
                write!(f, "C, {}, {}", key.user_id, key.user_order_id)
            }
            EngineEvent::TopOfBook { side, bbo } => {
                if bbo.is_empty() {
                    write!(f, "B, {}, -, -", side.as_char())
                } else {
                    write!(
                        f,
                        "B, {}, {}, {}",
                        side.as_char(),
                        format_decimal(bbo.price),
                        format_decimal(bbo.volume)
                    )
                }
            }
        }
    }
}
