//! Field Validator
//!
//! Required-field rule: the identifying field must be non-blank text or a
//! number. Null, blank text, booleans, lists and maps all count as missing.
//! Runs before any store access.

use crate::import::record::NormalizedRecord;
use crate::import::schema::EntitySchema;
use crate::import::value::Value;

/// Positions (0-based) of records failing the required-field rule
///
/// An empty result means the batch may proceed.
pub fn find_missing_required(schema: &EntitySchema, records: &[NormalizedRecord]) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| is_missing(record.get(schema.identifying.key)))
        .map(|(position, _)| position)
        .collect()
}

fn is_missing(value: &Value) -> bool {
    match value {
        Value::Text(s) => s.trim().is_empty(),
        Value::Number(_) => false,
        Value::Null | Value::Bool(_) | Value::List(_) | Value::Map(_) => true,
    }
}
