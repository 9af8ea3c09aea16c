//! Text conversions for primitive CIM values
//!
//! Attribute values travel as text (interchange files, storage rows, the
//! name-indexed accessors). The numeric conversions never fail loudly: a
//! malformed value yields `None` and the caller decides what that means.

/// Parse a `Float` / `Decimal` value. NaN and infinities are malformed:
/// SQLite cannot store them as REAL.
pub fn parse_double(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a single-precision value.
pub fn parse_float(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Parse an `Integer` value.
pub fn parse_integer(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

/// Parse a `Boolean` value. Only "true" (any case) is true.
pub fn parse_boolean(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("true")
}

/// Format a double the way it is written back to storage and interchange files.
pub fn format_double(value: f64) -> String {
    value.to_string()
}

/// Format a boolean as CIM text.
pub fn format_boolean(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_double() {
        assert_eq!(parse_double("1.5"), Some(1.5));
        assert_eq!(parse_double(" 220 "), Some(220.0));
        assert_eq!(parse_double("1e3"), Some(1000.0));
        assert_eq!(parse_double("abc"), None);
        assert_eq!(parse_double(""), None);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(parse_double("NaN"), None);
        assert_eq!(parse_double("inf"), None);
        assert_eq!(parse_double("-infinity"), None);
        assert_eq!(parse_float("NaN"), None);
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("0.25"), Some(0.25));
        assert_eq!(parse_float("0,25"), None);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("-7"), Some(-7));
        assert_eq!(parse_integer("4.2"), None);
        assert_eq!(parse_integer("x"), None);
    }

    #[test]
    fn test_parse_boolean() {
        assert!(parse_boolean("true"));
        assert!(parse_boolean("TRUE"));
        assert!(parse_boolean("True"));
        assert!(!parse_boolean("false"));
        assert!(!parse_boolean("yes"));
        assert!(!parse_boolean("1"));
        assert!(!parse_boolean(""));
    }

    #[test]
    fn test_format_roundtrip() {
        assert_eq!(parse_double(&format_double(0.1)), Some(0.1));
        assert_eq!(format_boolean(true), "true");
    }
}
