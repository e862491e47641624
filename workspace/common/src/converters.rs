//! Converter functions between raw input, wire values and display text.

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{iso, Money};
use serde_json::Value;
use std::str::FromStr;
use tracing::trace;

/// Coerces free-text form input into an amount.
///
/// Follows `parseFloat` rules: leading whitespace is skipped, the longest
/// numeric prefix is taken (`"12abc"` -> 12) and anything without a numeric
/// prefix becomes zero.
///
/// # Examples
///
/// ```
/// use common::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount("1500.50"), Decimal::new(15005, 1));
/// assert_eq!(parse_amount("abc"), Decimal::ZERO);
/// ```
pub fn parse_amount(input: &str) -> Decimal {
    let amount = leading_number(input).unwrap_or(Decimal::ZERO).normalize();
    trace!(input, %amount, "Parsed amount input");
    amount
}

/// Parses a complete numeric literal; `None` for anything else.
pub fn parse_amount_strict(input: &str) -> Option<Decimal> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .ok()
}

/// Reads an amount column. Numbers and numeric strings are accepted,
/// everything else is `None`.
pub fn amount_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Some(Decimal::from(int))
            } else if let Some(uint) = number.as_u64() {
                Some(Decimal::from(uint))
            } else {
                number.as_f64().and_then(Decimal::from_f64)
            }
        }
        Value::String(text) => parse_amount_strict(text),
        _ => None,
    }
}

fn leading_number(input: &str) -> Option<Decimal> {
    let bytes = input.trim_start().as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &bytes[int_start..pos];

    let mut frac_digits: &[u8] = &[];
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            frac_digits = &bytes[frac_start..frac_end];
            pos = frac_end;
        }
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut exponent: Option<&[u8]> = None;
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let exp_start = pos + 1;
        let mut exp_end = exp_start;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            exponent = Some(&bytes[exp_start..exp_end]);
        }
    }

    // Only ASCII digits, signs and dots were collected above.
    let as_str = |digits: &[u8]| String::from_utf8_lossy(digits).into_owned();
    let mut literal = String::new();
    if negative {
        literal.push('-');
    }
    if int_digits.is_empty() {
        literal.push('0');
    } else {
        literal.push_str(&as_str(int_digits));
    }
    if !frac_digits.is_empty() {
        literal.push('.');
        literal.push_str(&as_str(frac_digits));
    }

    match exponent {
        Some(exp) => Decimal::from_scientific(&format!("{}e{}", literal, as_str(exp))).ok(),
        None => Decimal::from_str(&literal).ok(),
    }
}

/// Formats an amount as US dollars, e.g. `$48,000.00`.
pub fn format_money(amount: Decimal) -> String {
    Money::from_decimal(amount, iso::USD).to_string()
}

/// Dashboard KPI rendering: thousands rounded to a whole number, e.g.
/// `12_499.99` -> `$12k`.
pub fn format_compact_thousands(amount: Decimal) -> String {
    let thousands = (amount / Decimal::ONE_THOUSAND)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    format!("${}k", thousands)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
