//! Decision context - the opaque record a decision is evaluated against
//!
//! The engine treats the context as read-only and schema-agnostic:
//! declared client answers, inferred attributes and computed risk scores
//! all live side by side in one nested map. Unresolved paths resolve to
//! `Value::Null`, never a hard failure.

use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request-scoped context record for a single evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionContext {
    root: HashMap<String, Value>,
}

impl DecisionContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context from a prepared map
    pub fn from_map(root: HashMap<String, Value>) -> Self {
        Self { root }
    }

    /// Insert a top-level entry (mainly for tests and builders)
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.root.insert(key.into(), value.into());
    }

    /// Resolve a dot-addressed path, returning `Value::Null` when any
    /// segment is missing or a non-object is traversed
    pub fn resolve(&self, path: &str) -> Value {
        let mut segments = path.split('.');
        let first = match segments.next() {
            Some(s) => s,
            None => return Value::Null,
        };

        let mut current = match self.root.get(first) {
            Some(v) => v,
            None => return Value::Null,
        };

        for segment in segments {
            match current {
                Value::Object(map) => match map.get(segment) {
                    Some(v) => current = v,
                    None => return Value::Null,
                },
                _ => return Value::Null,
            }
        }

        current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_context() -> DecisionContext {
        let mut declared = HashMap::new();
        declared.insert("wantsColor".to_string(), Value::Bool(true));
        declared.insert("sizeCm".to_string(), Value::Number(14.0));

        let mut style = HashMap::new();
        style.insert(
            "tags".to_string(),
            Value::Array(vec![
                Value::String("fine-line".to_string()),
                Value::String("blackwork".to_string()),
            ]),
        );

        let mut inferred = HashMap::new();
        inferred.insert("style".to_string(), Value::Object(style));
        inferred.insert("riskScore".to_string(), Value::Number(35.0));

        let mut root = HashMap::new();
        root.insert("declared".to_string(), Value::Object(declared));
        root.insert("inferred".to_string(), Value::Object(inferred));
        DecisionContext::from_map(root)
    }

    #[test]
    fn test_resolve_top_level() {
        let mut ctx = DecisionContext::new();
        ctx.insert("channel", "walk-in");
        assert_eq!(ctx.resolve("channel"), Value::String("walk-in".to_string()));
    }

    #[test]
    fn test_resolve_nested() {
        let ctx = sample_context();
        assert_eq!(ctx.resolve("declared.wantsColor"), Value::Bool(true));
        assert_eq!(ctx.resolve("inferred.riskScore"), Value::Number(35.0));
    }

    #[test]
    fn test_resolve_deeply_nested() {
        let ctx = sample_context();
        match ctx.resolve("inferred.style.tags") {
            Value::Array(tags) => assert_eq!(tags.len(), 2),
            other => panic!("Expected array, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_missing_path_is_null() {
        let ctx = sample_context();
        assert_eq!(ctx.resolve("declared.budget"), Value::Null);
        assert_eq!(ctx.resolve("computed.depositRisk"), Value::Null);
    }

    #[test]
    fn test_resolve_through_non_object_is_null() {
        let ctx = sample_context();
        // sizeCm is a number, descending into it yields the absent sentinel
        assert_eq!(ctx.resolve("declared.sizeCm.unit"), Value::Null);
    }

    #[test]
    fn test_context_serde_is_transparent() {
        let ctx = sample_context();
        let json = serde_json::to_string(&ctx).unwrap();
        let back: DecisionContext = serde_json::from_str(&json).unwrap();
        assert_eq!(ctx, back);
        assert!(json.starts_with('{'));
    }
}
