//! Lenient readers for the loosely typed values the sales backend returns.
//!
//! Monetary fields may arrive as numbers, numeric strings, `null`, or not at
//! all. Every read goes through [`to_number`] so a bad field only ever
//! contributes zero.

use serde_json::Value;

/// Coerce a JSON value to an amount.
///
/// `null` → 0, strings parse their leading numeric prefix (unparsable → 0),
/// booleans → 1/0, numbers pass through, anything else → 0. Non-finite
/// results are also 0.
///
/// Arrays and objects are always 0, even a single-element `[100]`; an amount
/// wrapped in a container is treated as malformed.
pub fn to_number(value: &Value) -> f64 {
    let n = match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_float_prefix(s).unwrap_or(0.0),
        Value::Array(_) | Value::Object(_) => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Parse the longest numeric prefix of `raw`, ignoring leading whitespace.
/// `"12.5kg"` → 12.5, `"abc"` → None.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut end = 0;
    if matches!(bytes.first().copied(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > end + 1 {
            end = frac_end;
        }
    }

    let mantissa = &s[int_start..end];
    if int_digits == 0 && !mantissa.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Read an identifier. Integers, integral floats and numeric strings are
/// accepted; everything else is `None`. Fractional values such as `7.5` are
/// not ids and read as `None`.
pub fn to_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Read free text. Numbers are rendered, other non-strings are dropped.
pub fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Format an amount with two decimals and thousands separators, e.g. `$1,234.50`.
pub fn format_money(value: f64, currency_symbol: &str) -> String {
    let cents = (value * 100.0).round() as i64;
    let negative = cents < 0;
    let cents = cents.unsigned_abs();
    let whole = format_grouped(cents / 100);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{currency_symbol}{whole}.{:02}", cents % 100)
}

fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}
