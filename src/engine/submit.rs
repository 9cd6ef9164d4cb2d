//! Order ingress: statutory validation and the submit pipeline.

use super::core::Engine;
use super::error::{CapacityKind, EngineError, ValidationError};
use super::registry::BookAddress;
use crate::events::EngineEvent;
use crate::order::{
    LimitOrderRequest, MarketOrderRequest, OrderId, OrderKey, OrderKind, OrderRecord,
    OrderStatus, Side,
};
use crate::orderbook::{Fill, OrderBook};
use crate::utils::current_time_nanos;
use crate::utils::precision::{is_greater, is_less, is_zero};
use std::collections::hash_map::Entry;
use std::fmt;
use tracing::debug;

/// Status summary returned with every accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    /// The taker consumed enough liquidity to fill completely; nothing rested.
    Filled,
    /// Some quantity executed and the LIMIT remainder now rests on the book.
    PartiallyFilled,
    /// No liquidity crossed; the LIMIT order rests untouched.
    Posted,
    /// A MARKET order ran out of liquidity; the remainder was cancelled.
    CancelledNoLiquidity,
}

impl fmt::Display for SubmitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitStatus::Filled => write!(f, "Order fully filled"),
            SubmitStatus::PartiallyFilled => write!(f, "Order partially filled"),
            SubmitStatus::Posted => write!(f, "Order posted to book"),
            SubmitStatus::CancelledNoLiquidity => {
                write!(f, "Market order cancelled (no liquidity)")
            }
        }
    }
}

/// Acknowledgement of an accepted submission.
#[derive(Debug)]
pub struct SubmitAck {
    pub order_id: OrderId,
    pub status: SubmitStatus,
    pub remaining_quantity: f64,
    /// Fills produced by this submission, in execution order.
    pub fills: Vec<Fill>,
}

impl Engine {
    /// Submits a LIMIT order. On success the order has been matched and any
    /// remainder rests on the book; on failure nothing was mutated.
    pub fn submit_limit(&mut self, request: LimitOrderRequest) -> Result<SubmitAck, EngineError> {
        let key = OrderKey::new(request.user_id, request.user_order_id);
        self.validate(
            &request.symbol,
            request.quantity,
            Some(request.price),
            request.tag.as_deref(),
            key,
        )?;
        self.admit_and_execute(
            request.symbol,
            key,
            request.tag,
            request.side,
            OrderKind::Limit,
            Some(request.price),
            request.quantity,
        )
    }

    /// Submits a MARKET order. Never rests; an unfilled remainder is cancelled
    /// in place and reported back.
    pub fn submit_market(&mut self, request: MarketOrderRequest) -> Result<SubmitAck, EngineError> {
        let key = OrderKey::new(request.user_id, request.user_order_id);
        self.validate(&request.symbol, request.quantity, None, request.tag.as_deref(), key)?;
        self.admit_and_execute(
            request.symbol,
            key,
            request.tag,
            request.side,
            OrderKind::Market,
            None,
            request.quantity,
        )
    }

    /// The firewall in front of the books. First failure wins; nothing is
    /// mutated on any failure path.
    fn validate(
        &self,
        symbol: &str,
        quantity: f64,
        price: Option<f64>,
        tag: Option<&str>,
        key: OrderKey,
    ) -> Result<(), EngineError> {
        if !quantity.is_finite()
            || quantity < self.config.min_order_qty
            || quantity > self.config.max_order_qty
        {
            return Err(ValidationError::InvalidQuantity.into());
        }

        if let Some(tag) = tag
            && tag.len() > self.config.max_tag_size
        {
            return Err(ValidationError::InvalidTag.into());
        }

        if symbol.is_empty()
            || symbol.len() > self.config.symbol_length
            || !self.config.is_supported(symbol)
        {
            return Err(ValidationError::InvalidSymbol.into());
        }

        if self.registry.resolve_key(&key).is_some() {
            return Err(EngineError::DuplicateIdentity { key });
        }

        if self.registry.live_len() >= self.config.max_global_orders {
            return Err(EngineError::CapacityExhausted(CapacityKind::GlobalOrders));
        }

        // MARKET orders never rest, so price magnitude, the corridor, and the
        // level cap only apply to LIMITs.
        if let Some(price) = price {
            if !price.is_finite()
                || is_less(price, self.config.min_order_price)
                || is_greater(price, self.config.max_order_price)
            {
                return Err(ValidationError::InvalidPrice.into());
            }

            if let Some(book) = self.books.get(symbol) {
                // The corridor only arms once the book has an anchor trade.
                if let Some(last) = book.last_trade_price() {
                    let lower = last * (1.0 - self.config.price_band);
                    let upper = last * (1.0 + self.config.price_band);
                    if is_less(price, lower) || is_greater(price, upper) {
                        return Err(EngineError::PriceOutOfBand {
                            price,
                            lower,
                            upper,
                        });
                    }
                }

                if book.price_level_count() >= self.config.max_price_levels
                    && !book.has_level(price)
                {
                    return Err(EngineError::CapacityExhausted(CapacityKind::PriceLevels));
                }
            }
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn admit_and_execute(
        &mut self,
        symbol: String,
        key: OrderKey,
        tag: Option<String>,
        side: Side,
        kind: OrderKind,
        price: Option<f64>,
        quantity: f64,
    ) -> Result<SubmitAck, EngineError> {
        let id = self.allocate_order_id();
        let mut record = OrderRecord::new(
            id,
            key,
            tag,
            symbol,
            side,
            kind,
            price,
            quantity,
            current_time_nanos(),
        );
        debug!(order = %id, %key, %side, %kind, quantity, "order admitted");

        // Registered before any matching attempt, so the order is addressable
        // for its entire life, however short.
        self.registry.admit(&record);
        self.emit(EngineEvent::Ack { key });

        let result = {
            let book = match self.books.entry(record.symbol.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    debug!(symbol = %record.symbol, "creating order book");
                    entry.insert(OrderBook::new(&record.symbol))
                }
            };
            book.execute(&mut record, &self.exec_ids)
        };

        for fill in &result.fills {
            let (buy, sell) = match side {
                Side::Buy => (fill.taker_key, fill.maker_key),
                Side::Sell => (fill.maker_key, fill.taker_key),
            };
            self.emit(EngineEvent::Trade {
                buy,
                sell,
                price: fill.price,
                quantity: fill.quantity,
            });
        }

        self.settle_makers(&result.fills);

        self.registry.commit(&record);
        if record.status.is_terminal() {
            self.registry.retire(id);
        } else if let Some(rest_price) = record.price {
            self.registry.register_location(
                id,
                BookAddress {
                    symbol: record.symbol.clone(),
                    side,
                    price: rest_price,
                },
            );
        }

        for update in &result.bbo_updates {
            self.emit(EngineEvent::TopOfBook {
                side: update.side,
                bbo: update.bbo,
            });
        }

        let status = match record.status {
            OrderStatus::Filled => SubmitStatus::Filled,
            OrderStatus::Cancelled => SubmitStatus::CancelledNoLiquidity,
            OrderStatus::Active => {
                if result.fills.is_empty() {
                    SubmitStatus::Posted
                } else {
                    SubmitStatus::PartiallyFilled
                }
            }
        };

        Ok(SubmitAck {
            order_id: id,
            status,
            remaining_quantity: record.remaining_quantity,
            fills: result.fills,
        })
    }

    /// Folds each fill into its maker's record; makers consumed to zero go
    /// terminal and leave the live registry.
    fn settle_makers(&self, fills: &[Fill]) {
        for fill in fills {
            self.registry.with_record_mut(fill.maker_id, |maker| {
                maker.remaining_quantity = fill.maker_remaining;
                maker.cumulative_cost += fill.quantity * fill.price;
                if is_zero(fill.maker_remaining) {
                    maker.status = OrderStatus::Filled;
                    maker.remaining_quantity = 0.0;
                }
            });
            if is_zero(fill.maker_remaining) {
                self.registry.retire(fill.maker_id);
            }
        }
    }
}
