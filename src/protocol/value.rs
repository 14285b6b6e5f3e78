//! Tagged-union value type for message arguments.
//!
//! Interpreter payloads are JSON, but the rest of the client never touches
//! `serde_json::Value` directly. Decoding happens once at the edge, and every
//! event decoder reads fields through the typed accessors below.
//!
//! The interpreter encodes booleans as `0`/`1` in several commands, so
//! [`Value::as_bool`] accepts both forms.

// Rust guideline compliant 2026-01

use std::collections::BTreeMap;

/// A single argument value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// JSON `null` or an absent field.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Any JSON number.
    Number(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered list.
    List(Vec<Value>),
    /// Nested mapping.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Borrow as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Read as an integer. Fractional numbers are truncated.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n as i64),
            Self::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Read as a boolean, accepting numeric `0`/`1`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Number(n) => Some(*n != 0.0),
            _ => None,
        }
    }

    /// Borrow as a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow as a mapping.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// True for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert to the JSON representation used on the wire.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => number_to_json(*n),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Self::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

/// Integral numbers go out as JSON integers so the interpreter sees `1`, not `1.0`.
fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => Self::List(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Number(n as f64)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::List(items.into_iter().map(Value::String).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_nested() {
        let v = Value::from(json!({"win": 3, "text": ["a", "b"], "opts": {"debug": true}}));
        let map = v.as_map().unwrap();
        assert_eq!(map["win"].as_i64(), Some(3));
        assert_eq!(map["text"].as_list().unwrap().len(), 2);
        assert_eq!(map["opts"].as_map().unwrap()["debug"].as_bool(), Some(true));
    }

    #[test]
    fn test_numeric_bool() {
        assert_eq!(Value::Number(1.0).as_bool(), Some(true));
        assert_eq!(Value::Number(0.0).as_bool(), Some(false));
        assert_eq!(Value::from("1").as_bool(), None);
    }

    #[test]
    fn test_integral_numbers_serialize_as_integers() {
        assert_eq!(Value::from(2_i64).to_json().to_string(), "2");
        assert_eq!(Value::Number(1.5).to_json().to_string(), "1.5");
    }

    #[test]
    fn test_accessors_reject_wrong_types() {
        let v = Value::from("text");
        assert_eq!(v.as_i64(), None);
        assert!(v.as_list().is_none());
        assert!(v.as_map().is_none());
        assert!(Value::Null.is_null());
        assert!(Value::Number(f64::NAN).as_i64().is_none());
    }
}
