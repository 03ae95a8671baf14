//! Normalizer
//!
//! Rewrites every absent value to an explicit null, recursively through lists
//! and maps, and shapes each record to its schema: every allowlisted key is
//! present, list fields always hold a list (null becomes `[]`, a single value
//! becomes a one-element list), unknown keys are dropped.
//! Pure and infallible.

use crate::import::record::{CandidateRecord, NormalizedRecord};
use crate::import::schema::EntitySchema;
use crate::import::value::{RawValue, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Normalize a single value
pub fn normalize_value(raw: RawValue) -> Value {
    match raw {
        RawValue::Absent | RawValue::Null => Value::Null,
        RawValue::Bool(b) => Value::Bool(b),
        RawValue::Number(n) => Value::Number(n),
        RawValue::Text(s) => Value::Text(s),
        RawValue::List(items) => Value::List(items.into_iter().map(normalize_value).collect()),
        RawValue::Map(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k, normalize_value(v)))
                .collect(),
        ),
    }
}

/// Normalize one record against its schema
pub fn normalize_record(schema: &EntitySchema, mut record: CandidateRecord) -> NormalizedRecord {
    let mut fields = BTreeMap::new();

    for key in schema.keys() {
        let value = normalize_value(record.take(key));
        let value = if schema.is_list_key(key) {
            into_list(value)
        } else {
            value
        };
        fields.insert(key, value);
    }

    let leftover = record.into_fields();
    if !leftover.is_empty() {
        debug!(
            entity = schema.table,
            dropped = ?leftover.keys().collect::<Vec<_>>(),
            "Dropping fields outside the import allowlist"
        );
    }

    NormalizedRecord::from_fields(fields)
}

fn into_list(value: Value) -> Value {
    match value {
        Value::Null => Value::List(Vec::new()),
        Value::List(items) => Value::List(items),
        single => Value::List(vec![single]),
    }
}

/// Normalize a batch, preserving order
pub fn normalize_batch(schema: &EntitySchema, records: Vec<CandidateRecord>) -> Vec<NormalizedRecord> {
    records
        .into_iter()
        .map(|record| normalize_record(schema, record))
        .collect()
}
