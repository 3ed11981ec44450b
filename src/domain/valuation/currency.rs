//! Currency formatting for monetary figures.
//!
//! Figures are always whole pounds: rounded half away from zero, grouped in
//! thousands, never showing pence.

use super::EstimatedValue;

const CURRENCY_SYMBOL: &str = "£";

/// Formats an amount as `£350,000`.
///
/// Non-finite input formats as `£0`. Formatting is idempotent: the same
/// amount always yields the same string.
pub fn format_currency(amount: f64) -> String {
    let rounded = if amount.is_finite() { amount.round() } else { 0.0 };
    let negative = rounded < 0.0;
    // `as` saturates for out-of-range floats.
    let whole = rounded.abs() as u64;

    let grouped = group_thousands(whole);
    if negative {
        format!("-{}{}", CURRENCY_SYMBOL, grouped)
    } else {
        format!("{}{}", CURRENCY_SYMBOL, grouped)
    }
}

/// Formats an estimate range as `£250,000 - £300,000`.
pub fn format_range(value: &EstimatedValue) -> String {
    format!(
        "{} - {}",
        format_currency(value.lower()),
        format_currency(value.upper())
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
