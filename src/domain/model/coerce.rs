//! Lenient scalar coercion for stored documents.
//!
//! Seed files and request bodies are loosely typed: numeric fields sometimes
//! arrive as strings (`"15"`), booleans as `"true"`. These helpers accept the
//! common spellings and reject everything else.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value as JsonValue;

pub fn coerce_i64(v: &JsonValue) -> Result<i64, String> {
    if let Some(n) = v.as_i64() {
        return Ok(n);
    }
    if let Some(f) = v.as_f64() {
        // u64 values above i64::MAX also land here
        if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
            return Ok(f as i64);
        }
        return Err(format!("expected integer, got {}", v));
    }
    if let Some(s) = v.as_str() {
        return s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("expected integer, got {:?}", s));
    }
    Err(format!("expected integer, got {}", v))
}

pub fn coerce_bool(v: &JsonValue) -> Result<bool, String> {
    if let Some(b) = v.as_bool() {
        return Ok(b);
    }
    if let Some(s) = v.as_str() {
        return match s.trim().to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(format!("expected bool, got {:?}", s)),
        };
    }
    Err(format!("expected bool, got {}", v))
}

/// Text fields take strings as-is and render numbers and booleans.
pub fn coerce_string(v: &JsonValue) -> Result<String, String> {
    match v {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        _ => Err(format!("expected string, got {}", v)),
    }
}

pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = JsonValue::deserialize(deserializer)?;
    coerce_i64(&v).map_err(de::Error::custom)
}

pub fn opt_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<JsonValue>::deserialize(deserializer)? {
        None | Some(JsonValue::Null) => Ok(None),
        Some(v) => coerce_i64(&v).map(Some).map_err(de::Error::custom),
    }
}

pub fn opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<JsonValue>::deserialize(deserializer)? {
        None | Some(JsonValue::Null) => Ok(None),
        Some(v) => coerce_bool(&v).map(Some).map_err(de::Error::custom),
    }
}

pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<JsonValue>::deserialize(deserializer)? {
        None | Some(JsonValue::Null) => Ok(None),
        Some(v) => coerce_string(&v).map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_accept_numbers_and_numeric_strings() {
        assert_eq!(coerce_i64(&json!(15)), Ok(15));
        assert_eq!(coerce_i64(&json!(15.0)), Ok(15));
        assert_eq!(coerce_i64(&json!(" 42 ")), Ok(42));
        assert_eq!(coerce_i64(&json!(-3)), Ok(-3));
    }

    #[test]
    fn integers_reject_fractions_and_garbage() {
        assert!(coerce_i64(&json!(1.5)).is_err());
        assert!(coerce_i64(&json!("abc")).is_err());
        assert!(coerce_i64(&json!(true)).is_err());
        assert!(coerce_i64(&json!({"n": 1})).is_err());
    }

    #[test]
    fn booleans_accept_string_spellings() {
        assert_eq!(coerce_bool(&json!(true)), Ok(true));
        assert_eq!(coerce_bool(&json!("TRUE")), Ok(true));
        assert_eq!(coerce_bool(&json!("false")), Ok(false));
        assert!(coerce_bool(&json!("yes")).is_err());
        assert!(coerce_bool(&json!(1)).is_err());
    }

    #[test]
    fn strings_accept_numbers_and_booleans() {
        assert_eq!(coerce_string(&json!("Civic")), Ok("Civic".to_string()));
        assert_eq!(coerce_string(&json!(123)), Ok("123".to_string()));
        assert_eq!(coerce_string(&json!(2.5)), Ok("2.5".to_string()));
        assert_eq!(coerce_string(&json!(false)), Ok("false".to_string()));
        assert!(coerce_string(&json!([1])).is_err());
        assert!(coerce_string(&json!({"a": 1})).is_err());
    }
}
