//! Wire formatting of outbound records.

use matchbook::{Bbo, EngineEvent, OrderKey, Side};

#[test]
fn test_ack_and_cancel_records() {
    let ack = EngineEvent::Ack {
        key: OrderKey::new(1, 101),
    };
    assert_eq!(ack.to_string(), "A, 1, 101");

    let cancel = EngineEvent::Cancel {
        key: OrderKey::new(2, 202),
    };
    assert_eq!(cancel.to_string(), "C, 2, 202");
}

#[test]
fn test_reject_record_carries_reason() {
    let reject = EngineEvent::Reject {
        key: OrderKey::new(1, 101),
        reason: "Invalid quantity".to_string(),
    };
    assert_eq!(reject.to_string(), "R, 1, 101, Invalid quantity");
}

#[test]
fn test_trade_record_is_buy_then_sell() {
    let trade = EngineEvent::Trade {
        buy: OrderKey::new(1, 3),
        sell: OrderKey::new(2, 102),
        price: 11.0,
        quantity: 100.0,
    };
    assert_eq!(trade.to_string(), "T, 1, 3, 2, 102, 11, 100");
}

#[test]
fn test_numeric_fields_use_compact_decimals() {
    let trade = EngineEvent::Trade {
        buy: OrderKey::new(1, 1),
        sell: OrderKey::new(2, 2),
        price: 50_000.0,
        quantity: 0.100_000_000_1,
    };
    // Eight fractional digits, trailing zeros stripped.
    assert_eq!(trade.to_string(), "T, 1, 1, 2, 2, 50000, 0.1");

    let fine = EngineEvent::Trade {
        buy: OrderKey::new(1, 1),
        sell: OrderKey::new(2, 2),
        price: 100.000_000_01,
        quantity: 0.5,
    };
    assert_eq!(fine.to_string(), "T, 1, 1, 2, 2, 100.00000001, 0.5");
}

#[test]
fn test_top_of_book_record() {
    let update = EngineEvent::TopOfBook {
        side: Side::Buy,
        bbo: Bbo {
            price: 10.0,
            volume: 100.0,
        },
    };
    assert_eq!(update.to_string(), "B, B, 10, 100");
}

#[test]
fn test_empty_side_uses_sentinel() {
    let update = EngineEvent::TopOfBook {
        side: Side::Sell,
        bbo: Bbo::EMPTY,
    };
    assert_eq!(update.to_string(), "B, S, -, -");
}
