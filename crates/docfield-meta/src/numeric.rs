//! Numeric input coercion.
//!
//! Numeric members arrive as free text from inputs and as loosely typed JSON
//! from storage. Anything that does not parse to a finite number becomes
//! unset (`None`); nothing is rejected and nothing silently turns into zero.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a numeric text input. Empty and unparsable input is unset.
#[must_use]
pub fn parse_numeric_input(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parse a count input (character limit, validation length).
///
/// Negative and fractional counts are unset.
#[must_use]
pub fn parse_count_input(raw: &str) -> Option<u32> {
    parse_numeric_input(raw).and_then(count_from_f64)
}

fn count_from_f64(value: f64) -> Option<u32> {
    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value as u32)
}

fn number_from_value(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(number) => number.as_f64().filter(|value| value.is_finite()),
        Value::String(text) => parse_numeric_input(text),
        _ => None,
    }
}

pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(number_from_value(&raw))
}

pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(number_from_value(&raw).and_then(count_from_f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_garbage_are_unset() {
        assert_eq!(parse_numeric_input(""), None);
        assert_eq!(parse_numeric_input("   "), None);
        assert_eq!(parse_numeric_input("twelve"), None);
        assert_eq!(parse_numeric_input("12px"), None);
        assert_eq!(parse_numeric_input("NaN"), None);
        assert_eq!(parse_numeric_input("inf"), None);
    }

    #[test]
    fn numbers_parse_with_surrounding_whitespace() {
        assert_eq!(parse_numeric_input(" 12 "), Some(12.0));
        assert_eq!(parse_numeric_input("-3.5"), Some(-3.5));
        assert_eq!(parse_numeric_input("0"), Some(0.0));
    }

    #[test]
    fn counts_reject_negative_and_fractional() {
        assert_eq!(parse_count_input("40"), Some(40));
        assert_eq!(parse_count_input("0"), Some(0));
        assert_eq!(parse_count_input("-1"), None);
        assert_eq!(parse_count_input("2.5"), None);
        assert_eq!(parse_count_input(""), None);
    }

    #[test]
    fn stored_values_accept_numbers_and_numeric_strings() {
        assert_eq!(number_from_value(&Value::from(7)), Some(7.0));
        assert_eq!(number_from_value(&Value::from("7.25")), Some(7.25));
        assert_eq!(number_from_value(&Value::Null), None);
        assert_eq!(number_from_value(&Value::Bool(true)), None);
    }
}
