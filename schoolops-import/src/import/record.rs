//! Candidate and normalized records

use crate::import::value::{RawValue, Value};
use serde::Serialize;
use std::collections::BTreeMap;

/// One entity as submitted by the caller
///
/// Untyped at the boundary: any key, any value. A key that is not present
/// reads as [`RawValue::Absent`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateRecord {
    fields: BTreeMap<String, RawValue>,
}

static ABSENT: RawValue = RawValue::Absent;

impl CandidateRecord {
    /// Builder-style setter
    #[cfg(test)]
    pub(crate) fn with(mut self, key: impl Into<String>, value: RawValue) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> &RawValue {
        self.fields.get(key).unwrap_or(&ABSENT)
    }

    pub(crate) fn take(&mut self, key: &str) -> RawValue {
        self.fields.remove(key).unwrap_or(RawValue::Absent)
    }

    pub(crate) fn into_fields(self) -> BTreeMap<String, RawValue> {
        self.fields
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for CandidateRecord {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, RawValue::from(v)))
                .collect(),
        }
    }
}

impl From<serde_json::Value> for CandidateRecord {
    /// Objects become records; any other JSON value becomes an empty record,
    /// which then fails the required-field check.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => map.into(),
            _ => Self::default(),
        }
    }
}

impl From<NormalizedRecord> for CandidateRecord {
    fn from(record: NormalizedRecord) -> Self {
        Self {
            fields: record
                .fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), RawValue::from(v)))
                .collect(),
        }
    }
}

/// A record after normalization
///
/// Holds exactly the schema's keys; every optional field is present with a
/// concrete value or `Null`, and every list field holds a list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    fields: BTreeMap<&'static str, Value>,
}

static NULL: Value = Value::Null;

impl NormalizedRecord {
    pub(crate) fn from_fields(fields: BTreeMap<&'static str, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> &Value {
        self.fields.get(key).unwrap_or(&NULL)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
