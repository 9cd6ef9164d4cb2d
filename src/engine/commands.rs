//! The wire command surface: typed records as the external parser hands them over.

use super::core::Engine;
use crate::events::EngineEvent;
use crate::order::{LimitOrderRequest, MarketOrderRequest, OrderKey, Side};
use crate::utils::precision::is_zero;
use tracing::warn;

/// One inbound command. A NEW with price `0.0` denotes a MARKET order.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    New {
        symbol: String,
        user_id: u64,
        user_order_id: u64,
        side: Side,
        quantity: f64,
        price: f64,
    },
    Cancel {
        user_id: u64,
        user_order_id: u64,
    },
    Flush,
}

impl Engine {
    /// Processes one command to completion: every event it produces is published
    /// before this returns.
    ///
    /// A NEW that fails validation turns into a `Reject` on the tape; a cancel
    /// that does not resolve is logged and produces no data event.
    pub fn process(&mut self, command: Command) {
        match command {
            Command::New {
                symbol,
                user_id,
                user_order_id,
                side,
                quantity,
                price,
            } => {
                let key = OrderKey::new(user_id, user_order_id);
                let outcome = if is_zero(price) {
                    self.submit_market(MarketOrderRequest {
                        symbol,
                        side,
                        quantity,
                        user_id,
                        user_order_id,
                        tag: None,
                    })
                } else {
                    self.submit_limit(LimitOrderRequest {
                        symbol,
                        side,
                        quantity,
                        price,
                        user_id,
                        user_order_id,
                        tag: None,
                    })
                };
                if let Err(error) = outcome {
                    self.emit(EngineEvent::Reject {
                        key,
                        reason: error.to_string(),
                    });
                }
            }

            Command::Cancel {
                user_id,
                user_order_id,
            } => {
                let key = OrderKey::new(user_id, user_order_id);
                match self.registry.resolve_key(&key) {
                    Some(id) => {
                        if let Err(error) = self.cancel_order(id) {
                            warn!(%key, %error, "cancel failed");
                        }
                    }
                    None => warn!(%key, "cancel for unknown order"),
                }
            }

            Command::Flush => self.flush(),
        }
    }
}
