//! Field extraction helpers for upstream payloads
//!
//! Upstream values are loosely typed (numbers arrive as strings and the other
//! way round), so everything here works on `serde_json::Value` and falls back
//! to a default instead of failing.

use super::models::{Price, Rating, DEFAULT_CURRENCY, DEGRADED_PROXY_PATTERN};
use serde_json::Value;
use std::collections::HashSet;

/// Parses a display price such as `"$1,299.99"` into its numeric amount.
///
/// Every character that is not a digit or `.` is dropped first. Empty or
/// unparseable input yields `0.0`.
pub fn parse_amount(display: &str) -> f64 {
    let digits: String = display
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f64>().unwrap_or(0.0)
}

/// Derives the currency symbol of a display price, defaulting to `"$"`.
///
/// Digits and `.` are removed, as are thousands separators and whitespace,
/// so `"$1,299.99"` yields `"$"` rather than `"$,"`.
pub fn parse_currency(display: &str) -> String {
    let symbol: String = display
        .chars()
        .filter(|c| !(c.is_ascii_digit() || *c == '.' || *c == ',' || c.is_whitespace()))
        .collect();
    if symbol.is_empty() {
        DEFAULT_CURRENCY.to_string()
    } else {
        symbol
    }
}

/// Builds a `Price` from an optional pre-parsed amount and a display string.
///
/// The pre-parsed amount wins when present; otherwise the amount is derived
/// from `display`.
pub fn extract_price(extracted: Option<&Value>, display: Option<&str>) -> Price {
    let display = display.unwrap_or("");
    let amount = extracted
        .and_then(value_as_f64)
        .unwrap_or_else(|| parse_amount(display));

    Price {
        amount,
        currency: parse_currency(display),
    }
}

/// Parses a review count such as `"1,234 reviews"` (or a plain number).
pub fn parse_count(value: Option<&Value>) -> u64 {
    let raw = match value {
        Some(Value::Number(n)) => return n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s,
        _ => return 0,
    };
    raw.chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

/// Parses a score field that may be a number or a numeric string.
pub fn parse_score(value: Option<&Value>) -> f64 {
    value.and_then(value_as_f64).unwrap_or(0.0)
}

/// Builds a rating when the entry carries any rating information at all.
pub fn extract_rating(score: Option<&Value>, count: Option<&Value>) -> Option<Rating> {
    let score = score.filter(|v| !v.is_null());
    let count = count.filter(|v| !v.is_null());
    if score.is_none() && count.is_none() {
        return None;
    }
    Some(Rating {
        score: parse_score(score),
        count: parse_count(count),
    })
}

/// True for URLs served through the low-quality thumbnail proxy.
pub fn is_degraded_proxy(url: &str) -> bool {
    url.contains(DEGRADED_PROXY_PATTERN)
}

/// Removes empty and repeated URLs, keeping the first occurrence of each.
pub fn dedupe_preserving_order<I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| !url.is_empty() && seen.insert(url.clone()))
        .collect()
}

/// Non-empty string field lookup.
pub fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// String field lookup that also accepts numbers (ids sometimes arrive as such).
pub fn id_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
