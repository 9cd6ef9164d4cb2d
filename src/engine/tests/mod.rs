//! Module-local tests for the engine.


#[cfg(test)]
pub(crate) mod support {
    use crate::engine::{Engine, EngineConfig};
    use crate::events::EngineEvent;
    use crate::order::{LimitOrderRequest, MarketOrderRequest, Side};
    use std::sync::{Arc, Mutex};

    /// Engine plus a handle on everything it published.
    pub fn engine_with_tape(config: EngineConfig) -> (Engine, Arc<Mutex<Vec<EngineEvent>>>) {
        let tape = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&tape);
        let engine = Engine::with_listener(
            config,
            Box::new(move |event| sink.lock().unwrap().push(event.clone())),
        );
        (engine, tape)
    }

    pub fn limit(
        symbol: &str,
        user_id: u64,
        user_order_id: u64,
        side: Side,
        quantity: f64,
        price: f64,
    ) -> LimitOrderRequest {
        LimitOrderRequest {
            symbol: symbol.to_string(),
            side,
            quantity,
            price,
            user_id,
            user_order_id,
            tag: None,
        }
    }

    pub fn tagged_limit(
        symbol: &str,
        user_id: u64,
        user_order_id: u64,
        side: Side,
        quantity: f64,
        price: f64,
        tag: &str,
    ) -> LimitOrderRequest {
        LimitOrderRequest {
            tag: Some(tag.to_string()),
            ..limit(symbol, user_id, user_order_id, side, quantity, price)
        }
    }

    pub fn market(
        symbol: &str,
        user_id: u64,
        user_order_id: u64,
        side: Side,
        quantity: f64,
    ) -> MarketOrderRequest {
        MarketOrderRequest {
            symbol: symbol.to_string(),
            side,
            quantity,
            user_id,
            user_order_id,
            tag: None,
        }
    }
}
