//! Forgiving numeric input handling for the custom duration fields
//!
//! Malformed input never produces an error: anything that is not a
//! non-negative number becomes 0.

use serde_json::Value;

/// Parse leading digits of `raw`, ignoring trailing garbage
pub fn parse_lenient(raw: &str) -> u64 {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(d - b'0')));

    if negative { 0 } else { value }
}

/// Normalize a JSON field to a non-negative whole number
pub fn normalize_field(value: &Value) -> u64 {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                v
            } else if let Some(f) = n.as_f64() {
                // Saturating float cast, negatives and NaN land on 0
                f.floor() as u64
            } else {
                0
            }
        }
        Value::String(s) => parse_lenient(s),
        _ => 0,
    }
}
