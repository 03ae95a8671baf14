//! Reference Collector
//!
//! Extracts, per relation, the distinct foreign identifiers a batch refers to.
//! Never touches the store.

use crate::import::record::NormalizedRecord;
use crate::import::schema::{EntitySchema, Relation};
use crate::import::value::Value;
use std::collections::BTreeSet;

/// Distinct referenced identifiers per relation
///
/// Holds one entry for every relation of the schema, in schema order; an
/// entry with no identifiers needs no lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSet {
    entries: Vec<(Relation, BTreeSet<String>)>,
}

impl ReferenceSet {
    pub fn get(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.entries
            .iter()
            .find(|(relation, _)| relation.key == key)
            .map(|(_, ids)| ids)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Relation, &BTreeSet<String>)> {
        self.entries.iter().map(|(relation, ids)| (relation, ids))
    }

    /// Relations that actually carry identifiers
    pub fn non_empty(&self) -> impl Iterator<Item = (&Relation, &BTreeSet<String>)> {
        self.iter().filter(|(_, ids)| !ids.is_empty())
    }

    /// True when no record references anything
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, ids)| ids.is_empty())
    }
}

/// Collect the reference set of a normalized batch
///
/// Nulls and blank text are "no reference". A value that cannot be an
/// identifier at all (bool, fraction, list, map) is collected in its JSON
/// form so the integrity check reports it as invalid rather than letting it
/// slip through as null.
pub fn collect_references(schema: &EntitySchema, records: &[NormalizedRecord]) -> ReferenceSet {
    let entries = schema
        .references
        .iter()
        .map(|relation| {
            let ids = records
                .iter()
                .filter_map(|record| reference_id(record.get(relation.key)))
                .collect();
            (*relation, ids)
        })
        .collect();

    ReferenceSet { entries }
}

fn reference_id(value: &Value) -> Option<String> {
    if value.is_null() {
        return None;
    }
    match value {
        Value::Text(s) if s.trim().is_empty() => None,
        other => Some(other.as_identifier().unwrap_or_else(|| other.to_json().to_string())),
    }
}
