//! Engine configuration and architectural guardrails.

use serde::Deserialize;

/// Tunable limits for a running engine.
///
/// The defaults keep double-precision arithmetic inside its safe range: quantities
/// capped at 1e9 with a 1e-9 floor mean a full fill chain never loses significance,
/// and the level cap bounds the depth any single sweep can traverse.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum bytes per symbol token.
    pub symbol_length: usize,

    /// Hard cap on concurrently live orders across all books.
    pub max_global_orders: usize,

    /// Maximum unique price points per book, both sides combined.
    pub max_price_levels: usize,

    /// Maximum bytes of a client tag.
    pub max_tag_size: usize,

    pub min_order_qty: f64,
    pub max_order_qty: f64,
    pub min_order_price: f64,
    pub max_order_price: f64,

    /// Fractional corridor around the last traded price; `1.0` means new LIMIT
    /// prices may deviate up to 100% in either direction.
    pub price_band: f64,

    /// Optional symbol whitelist. `None` accepts any well-formed symbol.
    pub traded_symbols: Option<Vec<String>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            symbol_length: 12,
            max_global_orders: 1_000_000,
            max_price_levels: 20_000,
            max_tag_size: 32,
            min_order_qty: 1e-9,
            max_order_qty: 1e9,
            min_order_price: 1e-8,
            max_order_price: 1e9,
            price_band: 1.0,
            traded_symbols: None,
        }
    }
}

impl EngineConfig {
    /// True if `symbol` passes the whitelist, when one is configured.
    pub fn is_supported(&self, symbol: &str) -> bool {
        match &self.traded_symbols {
            Some(symbols) => symbols.iter().any(|s| s == symbol),
            None => true,
        }
    }
}
