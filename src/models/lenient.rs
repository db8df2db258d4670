//! Tolerant field decoders for payloads produced by the PHP backend.
//!
//! The backend is inconsistent across endpoints: booleans arrive as `true`,
//! `1` or `"1"`, ids as numbers or strings, and nested records are sometimes
//! `null`, `false` or an empty array. Every helper here decodes through a
//! [`Value`] first so that a badly typed field degrades to its default
//! instead of failing the whole payload.
//!
//! All helpers must be paired with `#[serde(default)]` on the field so that a
//! missing key takes the same path as `null`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Grant truthiness: `true`, `1`, `"1"` and `"true"` only. Every other shape
/// denies.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => matches!(s.as_str(), "1" | "true"),
        _ => false,
    }
}

pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(truthy(&value))
}

pub fn optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(truthy(&value)))
}

/// Decode `T`, or `None` when the field is null or has the wrong shape.
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// Decode `T`, or `T::default()` when the field is null or has the wrong shape.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthy_accepts_backend_boolean_shapes() {
        assert!(truthy(&json!(true)));
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!("1")));
        assert!(truthy(&json!("true")));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("0")));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!({"view": true})));
    }

    #[test]
    fn truthy_denies_unexpected_shapes() {
        for value in [
            json!("yes"),
            json!("on"),
            json!("TRUE"),
            json!(" true "),
            json!(2),
            json!(-1),
            json!(0.5),
            json!(1.5),
            json!([1]),
        ] {
            assert!(!truthy(&value), "{value} should deny");
        }
    }
}
