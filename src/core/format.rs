// Sayaç CRM - core/format.rs
//
// Display helpers shared by every front end: the tr-TR lira rendering of a
// price and the dash placeholder for missing values.

use crate::core::derive::parse_price;
use crate::util::constants::{CURRENCY_SYMBOL, PLACEHOLDER_DASH, THOUSANDS_SEPARATOR};

/// Render a price as Turkish lira with no fraction digits, e.g. `₺6.000`.
///
/// `None` and non-finite values render as the dash placeholder.
pub fn format_price_try(value: Option<f64>) -> String {
    let Some(n) = value.filter(|n| n.is_finite()) else {
        return PLACEHOLDER_DASH.to_string();
    };

    let rounded = n.round();
    let digits = format!("{:.0}", rounded.abs());
    let sign = if rounded < 0.0 { "-" } else { "" };

    format!("{sign}{CURRENCY_SYMBOL}{}", group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

/// Text shown under a free-entered price while the user is typing.
#[derive(Debug, Clone, PartialEq)]
pub enum PricePreview {
    /// Parsed positive amount.
    Valid(f64),
    /// Empty, non-numeric, or not greater than zero.
    Invalid,
}

impl PricePreview {
    pub fn message(&self) -> String {
        match self {
            PricePreview::Valid(n) => format!("Girilen fiyat: {}", format_price_try(Some(*n))),
            PricePreview::Invalid => "Geçerli bir tutar girin (sadece sayı).".to_string(),
        }
    }
}

/// Classify a free-entered price for the inline preview.
pub fn price_preview(raw: &str) -> PricePreview {
    match parse_price(raw) {
        Some(n) if n > 0.0 => PricePreview::Valid(n),
        _ => PricePreview::Invalid,
    }
}

/// The value itself, or the dash placeholder when absent or blank.
pub fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => PLACEHOLDER_DASH,
    }
}
