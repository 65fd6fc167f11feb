//! Coercion from evaluation results to a canonical f64.
//! Rules:
//! - Number -> its value
//! - Text -> standard decimal float parse of the text
//! - anything else fails, reporting the value's kind
//!
//! Truth values are plain numbers: zero and NaN are false, 1 is the canonical true.

use crate::value::{Value, ValueKind};

/// Parse `text` as a plain float literal.
///
/// This is the literal branch of parameter resolution: no trimming, no expression
/// syntax, just the standard decimal grammar (which also admits `inf` and `NaN`).
#[inline]
pub fn parse_literal(text: &str) -> Option<f64> {
    text.parse::<f64>().ok()
}

/// Coerce a [`Value`] into an `f64`, returning the offending kind on failure.
pub fn to_number(v: &Value) -> Result<f64, ValueKind> {
    match v {
        Value::Number(n) => Ok(*n),
        Value::Text(s) => parse_literal(s).ok_or(ValueKind::Text),
    }
}

/// Truth value of a number: anything but zero and NaN.
#[inline]
pub fn is_truthy(n: f64) -> bool {
    n != 0.0 && !n.is_nan()
}

/// Comparisons and logical operators yield 1 for true and 0 for false.
#[inline]
pub fn from_bool(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Coerce every argument, reporting the 1-based position of the first failure.
pub fn to_numbers(args: &[Value]) -> Result<Vec<f64>, (usize, ValueKind)> {
    args.iter()
        .enumerate()
        .map(|(i, v)| to_number(v).map_err(|kind| (i + 1, kind)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_pass_through() {
        assert_eq!(to_number(&Value::Number(-3.25)), Ok(-3.25));
    }

    #[test]
    fn numeric_text_is_parsed() {
        assert_eq!(to_number(&Value::text("1e3")), Ok(1000.0));
        assert_eq!(to_number(&Value::text("-0.5")), Ok(-0.5));
    }

    #[test]
    fn non_numeric_text_fails_with_kind() {
        assert_eq!(to_number(&Value::text("loud")), Err(ValueKind::Text));
        assert_eq!(to_number(&Value::text(" 1")), Err(ValueKind::Text));
    }

    #[test]
    fn reports_first_failing_position() {
        let args = [Value::Number(1.0), Value::text("2"), Value::text("x"), Value::text("y")];
        assert_eq!(to_numbers(&args), Err((3, ValueKind::Text)));
        assert_eq!(to_numbers(&args[..2]), Ok(vec![1.0, 2.0]));
    }

    #[test]
    fn literal_parser_rejects_expressions() {
        assert_eq!(parse_literal("0.25"), Some(0.25));
        assert_eq!(parse_literal("+4"), Some(4.0));
        assert_eq!(parse_literal("1 + 1"), None);
        assert_eq!(parse_literal("reference"), None);
    }

    #[test]
    fn truthiness_excludes_zero_and_nan() {
        assert!(is_truthy(-0.5));
        assert!(is_truthy(f64::INFINITY));
        assert!(!is_truthy(0.0));
        assert!(!is_truthy(-0.0));
        assert!(!is_truthy(f64::NAN));
        assert_eq!(from_bool(true), 1.0);
        assert_eq!(from_bool(false), 0.0);
    }
}
