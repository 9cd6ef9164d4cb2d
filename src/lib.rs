//! # Matchbook
//!
//! A single-venue limit order matching engine written in Rust. The crate maintains one
//! two-sided, price-ordered book per symbol, matches incoming aggressors against resting
//! liquidity under strict price-time priority, and emits a totally ordered stream of
//! acknowledgements, trades, cancels, top-of-book updates, and rejects.
//!
//! ## Key Features
//!
//! - **Price-time priority matching**: best price first; among equal prices, earlier
//!   arrival first. Fills always execute at the resting (maker) price.
//!
//! - **Epsilon-safe arithmetic**: every quantity and price comparison goes through an
//!   explicit `1e-9` epsilon, so sub-epsilon "dust" remainders can never keep an order
//!   alive or leave a phantom level on the book.
//!
//! - **O(1) cancellation**: a per-book generational arena gives every resting order a
//!   stable handle, so a cancel jumps straight to the entry without scanning levels.
//!
//! - **Shadow snapshots**: each book mirrors its depth into a sequenced, read-optimised
//!   shadow structure. Snapshot readers never touch the matching path; the writer holds
//!   the exclusive lock only for the brief refresh pass after each execution.
//!
//! - **Guardrails**: global live-order caps, per-book price-level caps, price magnitude
//!   bounds, and a dynamic volatility corridor around the last traded price.
//!
//! ## Design Goals
//!
//! 1. **Correctness**: registry and book state stay mutually consistent after every
//!    command; level volumes always equal the sum of their resting quantities.
//! 2. **Determinism**: commands are processed strictly in arrival order and all events
//!    of one command are published before the next command begins.
//! 3. **Single-writer discipline**: one engine thread owns all mutation; concurrent
//!    readers observe the book only through sequenced shadow snapshots.
//!
//! ## Use Cases
//!
//! - Core component for building trading venues and simulated exchanges
//! - Back-testing trading strategies with realistic book dynamics
//! - Studying market microstructure and order flow
//!
//! ## Status
//!
//! This project is under active development and is not yet suitable for production use.

mod engine;
mod events;
mod order;
mod orderbook;
mod utils;

pub use engine::{
    CancelAck, CapacityKind, Command, Engine, EngineConfig, EngineError, SubmitAck,
    SubmitStatus, ValidationError,
};
pub use events::{EngineEvent, EventListener};
pub use order::{
    LimitOrderRequest, MarketOrderRequest, OrderId, OrderKey, OrderKind, OrderRecord,
    OrderStatus, Side,
};
pub use orderbook::{
    Bbo, BboUpdate, BookLevel, BookSnapshot, Cancellation, DepthFeed, Fill, MatchResult,
    OrderBook,
};
pub use utils::format::format_decimal;
pub use utils::precision;
