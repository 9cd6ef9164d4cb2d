//! Literal command sequences and the tapes they must produce.

use crate::engine_with_tape;
use matchbook::{
    Command, EngineConfig, LimitOrderRequest, MarketOrderRequest, OrderStatus, Side,
    SubmitStatus, precision,
};

fn new(symbol: &str, user_id: u64, user_order_id: u64, side: Side, quantity: f64, price: f64) -> Command {
    Command::New {
        symbol: symbol.to_string(),
        user_id,
        user_order_id,
        side,
        quantity,
        price,
    }
}

fn limit(user_id: u64, user_order_id: u64, side: Side, quantity: f64, price: f64) -> LimitOrderRequest {
    LimitOrderRequest {
        symbol: "IBM".to_string(),
        side,
        quantity,
        price,
        user_id,
        user_order_id,
        tag: None,
    }
}

#[test]
fn test_scenario_two_sided_session() {
    let (mut engine, tape) = engine_with_tape(EngineConfig::default());

    let session = [
        new("IBM", 1, 1, Side::Buy, 100.0, 10.0),
        new("IBM", 1, 2, Side::Sell, 100.0, 12.0),
        new("IBM", 2, 101, Side::Buy, 100.0, 9.0),
        new("IBM", 2, 102, Side::Sell, 100.0, 11.0),
        new("IBM", 1, 3, Side::Buy, 100.0, 11.0),
        new("IBM", 2, 103, Side::Sell, 100.0, 10.0),
        new("IBM", 1, 4, Side::Buy, 100.0, 10.0),
        new("IBM", 2, 104, Side::Sell, 100.0, 11.0),
    ];
    for command in session {
        engine.process(command);
    }

    let lines = tape.lock().unwrap().clone();
    assert_eq!(
        lines,
        vec![
            "A, 1, 1",
            "B, B, 10, 100",
            "A, 1, 2",
            "B, S, 12, 100",
            "A, 2, 101",
            "A, 2, 102",
            "B, S, 11, 100",
            "A, 1, 3",
            "T, 1, 3, 2, 102, 11, 100",
            "B, S, 12, 100",
            "A, 2, 103",
            "T, 1, 1, 2, 103, 10, 100",
            "B, B, 9, 100",
            "A, 1, 4",
            "B, B, 10, 100",
            "A, 2, 104",
            "B, S, 11, 100",
        ]
    );
}

#[test]
fn test_scenario_fifo_at_one_price() {
    let (mut engine, tape) = engine_with_tape(EngineConfig::default());

    engine.process(new("IBM", 1, 1, Side::Buy, 10.0, 100.0));
    engine.process(new("IBM", 1, 2, Side::Buy, 10.0, 100.0));
    engine.process(new("IBM", 1, 3, Side::Buy, 10.0, 100.0));
    engine.process(new("IBM", 2, 1, Side::Sell, 30.0, 100.0));

    let lines = tape.lock().unwrap().clone();
    let trades: Vec<&String> = lines.iter().filter(|l| l.starts_with("T, ")).collect();
    assert_eq!(
        trades,
        vec![
            "T, 1, 1, 2, 1, 100, 10",
            "T, 1, 2, 2, 1, 100, 10",
            "T, 1, 3, 2, 1, 100, 10",
        ]
    );

    // The bid level is gone the moment its last entry fills.
    let snapshot = engine.snapshot("IBM", 0).unwrap();
    assert!(snapshot.bids.is_empty());
    assert!(snapshot.asks.is_empty());
    assert_eq!(*lines.last().unwrap(), "B, B, -, -");
}

#[test]
fn test_scenario_partial_maker() {
    let (mut engine, _tape) = engine_with_tape(EngineConfig::default());

    engine.process(new("IBM", 1, 1, Side::Buy, 10.0, 100.0));
    engine.process(new("IBM", 2, 1, Side::Sell, 5.0, 100.0));

    let snapshot = engine.snapshot("IBM", 0).unwrap();
    assert_eq!(snapshot.best_bid(), Some((100.0, 5.0)));
    assert_eq!(snapshot.bids.len(), 1);
}

#[test]
fn test_scenario_market_against_empty_book() {
    let mut engine = matchbook::Engine::new(EngineConfig::default());

    let ack = engine
        .submit_market(MarketOrderRequest {
            symbol: "IBM".to_string(),
            side: Side::Sell,
            quantity: 10.0,
            user_id: 1,
            user_order_id: 1,
            tag: None,
        })
        .unwrap();

    assert_eq!(ack.status, SubmitStatus::CancelledNoLiquidity);
    assert!(ack.fills.is_empty());

    // Book untouched, order terminal with its full remainder, not live.
    let snapshot = engine.snapshot("IBM", 0).unwrap();
    assert!(snapshot.bids.is_empty());
    assert!(snapshot.asks.is_empty());
    assert_eq!(engine.live_orders(), 0);

    let record = engine.get_order(ack.order_id).unwrap();
    assert_eq!(record.status, OrderStatus::Cancelled);
    assert_eq!(record.remaining_quantity, 10.0);
}

#[test]
fn test_scenario_dust_never_lingers() {
    let mut engine = matchbook::Engine::new(EngineConfig::default());

    engine
        .submit_limit(limit(1, 1, Side::Buy, 1.0, 50_000.0))
        .unwrap();
    for i in 0..10u64 {
        engine
            .submit_limit(limit(2, 1 + i, Side::Sell, 0.100_000_000_1, 50_000.0))
            .unwrap();
    }

    let book = engine.book("IBM").unwrap();
    assert_eq!(book.best_bid(), None);
    assert_eq!(book.last_trade_price(), Some(50_000.0));

    // Whatever rests after the sweep is a meaningful quantity, never dust.
    let snapshot = engine.snapshot("IBM", 0).unwrap();
    for level in snapshot.bids.iter().chain(snapshot.asks.iter()) {
        assert!(precision::is_positive(level.quantity));
    }
}

#[test]
fn test_scenario_aggressive_limit_walks_the_book() {
    let (mut engine, tape) = engine_with_tape(EngineConfig::default());

    engine.process(new("IBM", 1, 1, Side::Buy, 10.0, 105.0));
    engine.process(new("IBM", 1, 2, Side::Buy, 10.0, 100.0));
    engine.process(new("IBM", 2, 1, Side::Sell, 15.0, 1.0));

    let lines = tape.lock().unwrap().clone();
    let trades: Vec<&String> = lines.iter().filter(|l| l.starts_with("T, ")).collect();
    assert_eq!(
        trades,
        vec!["T, 1, 1, 2, 1, 105, 10", "T, 1, 2, 2, 1, 100, 5"]
    );

    let snapshot = engine.snapshot("IBM", 0).unwrap();
    assert_eq!(snapshot.best_bid(), Some((100.0, 5.0)));
    assert_eq!(engine.book("IBM").unwrap().last_trade_price(), Some(100.0));
}

#[test]
fn test_wire_cancel_round_trip() {
    let (mut engine, tape) = engine_with_tape(EngineConfig::default());

    engine.process(new("IBM", 1, 1, Side::Buy, 100.0, 10.0));
    engine.process(Command::Cancel {
        user_id: 1,
        user_order_id: 1,
    });

    let lines = tape.lock().unwrap().clone();
    assert_eq!(
        lines,
        vec!["A, 1, 1", "B, B, 10, 100", "C, 1, 1", "B, B, -, -"]
    );
    assert_eq!(engine.live_orders(), 0);
}

#[test]
fn test_wire_cancel_unknown_produces_no_data_event() {
    let (mut engine, tape) = engine_with_tape(EngineConfig::default());

    engine.process(Command::Cancel {
        user_id: 9,
        user_order_id: 9,
    });

    assert!(tape.lock().unwrap().is_empty());
}

#[test]
fn test_wire_reject_line() {
    let (mut engine, tape) = engine_with_tape(EngineConfig::default());

    engine.process(new("IBM", 3, 30, Side::Buy, -5.0, 10.0));

    let lines = tape.lock().unwrap().clone();
    assert_eq!(lines, vec!["R, 3, 30, Invalid quantity"]);
}

#[test]
fn test_wire_market_denoted_by_zero_price() {
    let (mut engine, tape) = engine_with_tape(EngineConfig::default());

    engine.process(new("IBM", 1, 1, Side::Buy, 10.0, 100.0));
    // Price zero means MARKET: it trades and the remainder never rests.
    engine.process(new("IBM", 2, 1, Side::Sell, 15.0, 0.0));

    let lines = tape.lock().unwrap().clone();
    assert_eq!(
        lines,
        vec![
            "A, 1, 1",
            "B, B, 100, 10",
            "A, 2, 1",
            "T, 1, 1, 2, 1, 100, 10",
            "B, B, -, -",
        ]
    );
    let snapshot = engine.snapshot("IBM", 0).unwrap();
    assert!(snapshot.asks.is_empty());
}

#[test]
fn test_flush_command_resets_state() {
    let (mut engine, tape) = engine_with_tape(EngineConfig::default());

    engine.process(new("IBM", 1, 1, Side::Buy, 100.0, 10.0));
    engine.process(Command::Flush);
    tape.lock().unwrap().clear();

    // Identities are reusable and the book is empty after a flush.
    engine.process(new("IBM", 1, 1, Side::Buy, 100.0, 10.0));
    let lines = tape.lock().unwrap().clone();
    assert_eq!(lines, vec!["A, 1, 1", "B, B, 10, 100"]);
}
