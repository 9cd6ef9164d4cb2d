//! Floating-point discipline for prices and quantities.
//!
//! Raw `==` and `<` are unreliable for `f64` once quantities have been through a chain
//! of subtractions. Every comparison in the book, the validators, and the top-of-book
//! delta tracking goes through these helpers so that remainders smaller than [`EPSILON`]
//! ("dust") are treated as exact zero and can never keep an order alive or a level on
//! the book.

/// The engine-wide comparison tolerance.
///
/// One order of magnitude finer than the smallest unit of the assets this engine is
/// tuned for (1e-8), and still well inside the ~15 significant decimal digits an IEEE
/// 754 double provides at realistic price magnitudes.
pub const EPSILON: f64 = 1e-9;

/// True if `value` is indistinguishable from zero.
#[inline]
pub fn is_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// Epsilon-safe equality.
#[inline]
pub fn is_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// True if `value` is a meaningful (non-dust) positive quantity.
#[inline]
pub fn is_positive(value: f64) -> bool {
    value >= EPSILON
}

/// True if `a` is strictly less than `b` beyond the tolerance.
#[inline]
pub fn is_less(a: f64, b: f64) -> bool {
    a < b - EPSILON
}

/// True if `a` is strictly greater than `b` beyond the tolerance.
#[inline]
pub fn is_greater(a: f64, b: f64) -> bool {
    a > b + EPSILON
}

/// Subtracts `subtrahend` from `target` in place, snapping any sub-epsilon remainder
/// to exact `0.0`.
///
/// This is the only subtraction the matching path uses on quantities and level
/// volumes; it is what guarantees that partially filled orders are cleaned up instead
/// of lingering with a dust remainder.
#[inline]
pub fn subtract_or_zero(target: &mut f64, subtrahend: f64) {
    let result = *target - subtrahend;
    *target = if result < EPSILON { 0.0 } else { result };
}
