//! Field access helpers for the loosely-typed JSON records the device emits.
//! The appliance reports nearly everything as strings, occasionally as bare
//! numbers; these helpers normalize both without letting a bad value panic.

use serde_json::{Map, Value};

/// Scalar field as trimmed text. Missing keys, non-scalar values and
/// whitespace-only strings are all `None`.
pub(crate) fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    scalar_text(map.get(key)?)
}

/// Coerce a scalar JSON value to trimmed text.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Numeric field with the device convention: a missing key counts as zero,
/// a present but unparsable value is a parse failure (`None`).
pub(crate) fn float_field(map: &Map<String, Value>, key: &str) -> Option<f64> {
    match map.get(key) {
        None => Some(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    }
}

/// Integer variant of [`float_field`], same missing-key convention.
pub(crate) fn int_field(map: &Map<String, Value>, key: &str) -> Option<i64> {
    match map.get(key) {
        None => Some(0),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    }
}

/// First whitespace-delimited token parsed as an integer, for values like
/// `"16173828 kB"` or `"3747460 kB (23.0%)"`.
pub(crate) fn leading_int(text: &str) -> Option<i64> {
    text.split_whitespace().next()?.parse().ok()
}

/// First whitespace-delimited token parsed as a float, for values like
/// `"1238542 MB"`.
pub(crate) fn leading_float(text: &str) -> Option<f64> {
    text.split_whitespace().next()?.parse().ok()
}

/// A `"<float>%"` value such as `"42.3%"`.
pub(crate) fn percent_value(text: &str) -> Option<f64> {
    text.trim().trim_end_matches('%').parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_text_field_coercion() {
        let m = map(json!({"a": " eth0 ", "b": 1500, "c": "", "d": {"x": 1}}));
        assert_eq!(text_field(&m, "a").as_deref(), Some("eth0"));
        assert_eq!(text_field(&m, "b").as_deref(), Some("1500"));
        assert_eq!(text_field(&m, "c"), None);
        assert_eq!(text_field(&m, "d"), None);
        assert_eq!(text_field(&m, "missing"), None);
    }

    #[test]
    fn test_float_field_missing_is_zero() {
        let m = map(json!({"usr": "15.2", "idle": 77.4, "bad": "n/a"}));
        assert_eq!(float_field(&m, "usr"), Some(15.2));
        assert_eq!(float_field(&m, "idle"), Some(77.4));
        assert_eq!(float_field(&m, "missing"), Some(0.0));
        assert_eq!(float_field(&m, "bad"), None);
    }

    #[test]
    fn test_int_field() {
        let m = map(json!({"total": "16173828", "free": 12426368, "bad": "lots"}));
        assert_eq!(int_field(&m, "total"), Some(16173828));
        assert_eq!(int_field(&m, "free"), Some(12426368));
        assert_eq!(int_field(&m, "missing"), Some(0));
        assert_eq!(int_field(&m, "bad"), None);
    }

    #[test]
    fn test_leading_tokens() {
        assert_eq!(leading_int("16173828 kB"), Some(16173828));
        assert_eq!(leading_int("3747460 kB (23.0%)"), Some(3747460));
        assert_eq!(leading_float("1238542 MB"), Some(1238542.0));
        assert_eq!(leading_int("no number"), None);
    }

    #[test]
    fn test_percent_value() {
        assert_eq!(percent_value("42.3%"), Some(42.3));
        assert_eq!(percent_value("15.2"), Some(15.2));
        assert_eq!(percent_value("n/a"), None);
    }
}
