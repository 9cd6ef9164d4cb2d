//! Compact decimal formatting for outbound records.

/// Formats a price or quantity in fixed notation with up to 8 fractional digits,
/// stripping trailing zeros and a trailing decimal point.
///
/// `100.0` renders as `100`, `100.00000001` keeps all eight digits, `0.5` renders
/// as `0.5`.
pub fn format_decimal(value: f64) -> String {
    let mut out = format!("{value:.8}");
    if out.contains('.') {
        while out.ends_with('0') {
            out.pop();
        }
        if out.ends_with('.') {
            out.pop();
        }
    }
    out
}
