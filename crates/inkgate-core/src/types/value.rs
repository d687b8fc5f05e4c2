//! Runtime value types for Inkgate contexts and conditions
//!
//! The `Value` enum represents all possible runtime values a decision
//! context can carry, similar to JSON values. `Value::Null` doubles as the
//! "absent" sentinel: unresolved context paths resolve to it and make
//! comparisons evaluate to false instead of failing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Runtime value type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null value (also the "absent" sentinel for unresolved paths)
    Null,
    /// Boolean value
    Bool(bool),
    /// Number value (f64 for simplicity, handles both int and float)
    Number(f64),
    /// String value
    String(String),
    /// Array of values
    Array(Vec<Value>),
    /// Object (key-value map)
    Object(HashMap<String, Value>),
}

impl Value {
    /// Returns true if this value is the absent sentinel
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the boolean payload, if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the numeric payload, if this is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the string payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Human-readable name of the value's type, used in log messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        assert!(Value::Null.is_null());
        assert!(!Value::Bool(false).is_null());

        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Number(1.0).as_bool(), None);

        assert_eq!(Value::Number(42.0).as_number(), Some(42.0));
        assert_eq!(Value::String("42".to_string()).as_number(), None);

        assert_eq!(Value::String("color".to_string()).as_str(), Some("color"));
        assert_eq!(Value::Bool(true).as_str(), None);
    }

    #[test]
    fn test_value_from_impls() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(3.5), Value::Number(3.5));
        assert_eq!(Value::from(7i64), Value::Number(7.0));
        assert_eq!(Value::from("upper-arm"), Value::String("upper-arm".to_string()));
        assert_eq!(
            Value::from(vec!["neck", "face"]),
            Value::Array(vec![
                Value::String("neck".to_string()),
                Value::String("face".to_string()),
            ])
        );
    }

    #[test]
    fn test_value_nested_object() {
        let declared = Value::Object({
            let mut map = HashMap::new();
            map.insert("wantsColor".to_string(), Value::Bool(true));
            map.insert("placement".to_string(), Value::String("forearm".to_string()));
            map
        });

        match &declared {
            Value::Object(map) => {
                assert_eq!(map.get("wantsColor"), Some(&Value::Bool(true)));
                assert_eq!(
                    map.get("placement"),
                    Some(&Value::String("forearm".to_string()))
                );
            }
            _ => panic!("Expected Object"),
        }
    }

    #[test]
    fn test_value_serde_json() {
        let val = Value::Object({
            let mut map = HashMap::new();
            map.insert("sizeCm".to_string(), Value::Number(12.0));
            map.insert("firstTattoo".to_string(), Value::Bool(true));
            map
        });

        let json = serde_json::to_string(&val).unwrap();
        assert!(json.contains("sizeCm"));
        assert!(json.contains("12"));

        let deserialized: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(val, deserialized);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Array(vec![]).type_name(), "array");
        assert_eq!(Value::Object(HashMap::new()).type_name(), "object");
    }
}
