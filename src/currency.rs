//! Lenient parsing of locale-formatted money and quantity cells.
//!
//! Report cells look like `"-1 234,56 ₽"`, `"12,5"` or `"300"`. Anything that
//! cannot be read as a number becomes `0.0` so a single bad cell never aborts
//! a report.

use regex::Regex;
use std::sync::LazyLock;

static NON_NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^0-9,.\-]").expect("static currency pattern is valid")
});

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(?:\.\d+)?").expect("static number pattern is valid"));

/// Parse a currency or quantity cell into a signed number
///
/// Strips every character except digits, `-`, `,` and `.`, turns the first
/// comma into a decimal point and reads the longest leading number. Returns
/// `0.0` for empty input, input with no leading number and non-finite results.
///
/// Trailing text is ignored, so `"1 234,56 руб."` reads as `1234.56`.
/// Comma-grouped thousands read as a decimal: `"1,234.56"` yields `1.234`.
pub fn parse_currency(raw: &str) -> f64 {
    if raw.is_empty() {
        return 0.0;
    }

    let cleaned = NON_NUMERIC.replace_all(raw, "");
    let normalized = cleaned.replacen(',', ".", 1);

    let Some(number) = LEADING_NUMBER.find(&normalized) else {
        return 0.0;
    };

    match number.as_str().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}
