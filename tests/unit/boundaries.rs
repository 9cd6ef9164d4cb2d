//! Boundary behaviour at every configured limit.

use matchbook::{
    CapacityKind, Engine, EngineConfig, EngineError, LimitOrderRequest, Side,
    ValidationError, precision::EPSILON,
};

fn limit(user_order_id: u64, side: Side, quantity: f64, price: f64) -> LimitOrderRequest {
    LimitOrderRequest {
        symbol: "IBM".to_string(),
        side,
        quantity,
        price,
        user_id: 1,
        user_order_id,
        tag: None,
    }
}

#[test]
fn test_min_quantity_is_inclusive() {
    let mut engine = Engine::new(EngineConfig::default());
    let min = engine.config().min_order_qty;

    assert!(engine.submit_limit(limit(1, Side::Buy, min, 100.0)).is_ok());
    assert_eq!(
        engine.submit_limit(limit(2, Side::Buy, min / 10.0, 100.0)).unwrap_err(),
        EngineError::Validation(ValidationError::InvalidQuantity)
    );
}

#[test]
fn test_max_quantity_is_inclusive() {
    let mut engine = Engine::new(EngineConfig::default());
    let max = engine.config().max_order_qty;

    assert!(engine.submit_limit(limit(1, Side::Buy, max, 100.0)).is_ok());
    assert_eq!(
        engine.submit_limit(limit(2, Side::Buy, max + 1.0, 100.0)).unwrap_err(),
        EngineError::Validation(ValidationError::InvalidQuantity)
    );
}

#[test]
fn test_min_price_is_inclusive() {
    let mut engine = Engine::new(EngineConfig::default());
    let min = engine.config().min_order_price;

    assert!(engine.submit_limit(limit(1, Side::Buy, 10.0, min)).is_ok());
    assert_eq!(
        engine.submit_limit(limit(2, Side::Buy, 10.0, min / 10.0)).unwrap_err(),
        EngineError::Validation(ValidationError::InvalidPrice)
    );
}

#[test]
fn test_corridor_boundary_within_epsilon_accepted() {
    let config = EngineConfig {
        price_band: 1.0,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(config);

    // Anchor at 100: the corridor is (0, 200].
    engine.submit_limit(limit(1, Side::Buy, 10.0, 100.0)).unwrap();
    engine
        .submit_limit(LimitOrderRequest {
            user_id: 2,
            ..limit(1, Side::Sell, 10.0, 100.0)
        })
        .unwrap();

    // Exactly on the upper bound, and a hair inside epsilon of it, both pass.
    assert!(engine.submit_limit(limit(2, Side::Sell, 10.0, 200.0)).is_ok());
    assert!(
        engine
            .submit_limit(limit(3, Side::Sell, 10.0, 200.0 + EPSILON / 2.0))
            .is_ok()
    );

    // Strictly beyond the bound is rejected.
    assert!(matches!(
        engine.submit_limit(limit(4, Side::Sell, 10.0, 200.1)).unwrap_err(),
        EngineError::PriceOutOfBand { .. }
    ));
}

#[test]
fn test_global_capacity_boundary() {
    let config = EngineConfig {
        max_global_orders: 3,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(config);

    for i in 0..3u64 {
        engine
            .submit_limit(limit(i + 1, Side::Buy, 10.0, 100.0 - i as f64))
            .unwrap();
    }
    assert_eq!(engine.live_orders(), 3);

    assert_eq!(
        engine.submit_limit(limit(10, Side::Buy, 10.0, 90.0)).unwrap_err(),
        EngineError::CapacityExhausted(CapacityKind::GlobalOrders)
    );
}

#[test]
fn test_level_cap_allows_existing_prices() {
    let config = EngineConfig {
        max_price_levels: 2,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(config);

    engine.submit_limit(limit(1, Side::Buy, 10.0, 100.0)).unwrap();
    engine.submit_limit(limit(2, Side::Sell, 10.0, 110.0)).unwrap();

    assert_eq!(
        engine.submit_limit(limit(3, Side::Buy, 10.0, 99.0)).unwrap_err(),
        EngineError::CapacityExhausted(CapacityKind::PriceLevels)
    );

    // Joining an existing level, even within epsilon of it, is always allowed.
    assert!(
        engine
            .submit_limit(limit(4, Side::Buy, 10.0, 100.0 + EPSILON / 2.0))
            .is_ok()
    );
}
