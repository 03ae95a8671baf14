//! Field values at the import boundary and after normalization
//!
//! `RawValue` is what callers hand in: any field may be `Absent`. `Value` is
//! what the pipeline works with after normalization; it has no absent
//! variant, so a normalized record cannot carry an absent marker at any depth.

use serde::Serialize;
use std::collections::BTreeMap;

/// Caller-supplied value, possibly absent
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Field omitted by the caller
    Absent,
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<RawValue>),
    Map(BTreeMap<String, RawValue>),
}

/// Normalized value: absent has been rewritten to `Null`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Identifier form of this value, if it can act as a foreign key
    ///
    /// Non-empty text (trimmed) and integral numbers qualify.
    pub fn as_identifier(&self) -> Option<String> {
        match self {
            Value::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => n
                .as_i64()
                .map(|i| i.to_string())
                .or_else(|| n.as_u64().map(|u| u.to_string())),
            _ => None,
        }
    }

    /// JSON form, used when a list or map is stored as text
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Null,
            serde_json::Value::Bool(b) => RawValue::Bool(b),
            serde_json::Value::Number(n) => RawValue::Number(n),
            serde_json::Value::String(s) => RawValue::Text(s),
            serde_json::Value::Array(items) => {
                RawValue::List(items.into_iter().map(RawValue::from).collect())
            }
            serde_json::Value::Object(entries) => RawValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, RawValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Bool(b) => RawValue::Bool(b),
            Value::Number(n) => RawValue::Number(n),
            Value::Text(s) => RawValue::Text(s),
            Value::List(items) => RawValue::List(items.into_iter().map(RawValue::from).collect()),
            Value::Map(entries) => RawValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, RawValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(i.into())
    }
}
