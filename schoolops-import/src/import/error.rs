//! Import error taxonomy
//!
//! Terminal results handed back to the caller; nothing here is retried.
//! Serialized form is tagged by `errorKind`.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "errorKind")]
pub enum ImportError {
    /// Pre-flight: records without a usable identifying field
    #[error("{invalid_count} record(s) missing a required field")]
    #[serde(rename_all = "camelCase")]
    MissingRequiredField {
        invalid_count: usize,
        /// 0-based positions in the submitted batch
        invalid_records: Vec<usize>,
    },

    /// Pre-flight: referenced identifiers that do not exist
    ///
    /// Only relations with violations appear in `details`.
    #[error("invalid references in {}", relation_list(.details))]
    InvalidReference {
        details: BTreeMap<String, Vec<String>>,
    },

    /// Commit: uniqueness constraint collided
    #[error("duplicate entry: {detail}")]
    DuplicateEntry {
        detail: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },

    /// Commit: foreign key rejected by the store after the integrity check
    /// passed, i.e. a referenced row disappeared in between
    #[error("reference violation: {detail}")]
    ReferenceViolation {
        detail: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },

    /// Commit: value exceeds a column limit
    #[error("value too long: {detail}")]
    ValueTooLong {
        detail: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },

    /// Commit: anything the translator does not recognize
    #[error("commit failed: {detail}")]
    UnknownCommitFailure {
        detail: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },

    /// An existence lookup could not be performed; the check as a whole fails
    #[error("reference lookup for {relation} failed: {detail}")]
    LookupFailed { relation: String, detail: String },
}

fn relation_list(details: &BTreeMap<String, Vec<String>>) -> String {
    details.keys().cloned().collect::<Vec<_>>().join(", ")
}

impl ImportError {
    /// Machine-readable kind, identical to the serialized `errorKind`
    pub fn kind(&self) -> &'static str {
        match self {
            ImportError::MissingRequiredField { .. } => "MissingRequiredField",
            ImportError::InvalidReference { .. } => "InvalidReference",
            ImportError::DuplicateEntry { .. } => "DuplicateEntry",
            ImportError::ReferenceViolation { .. } => "ReferenceViolation",
            ImportError::ValueTooLong { .. } => "ValueTooLong",
            ImportError::UnknownCommitFailure { .. } => "UnknownCommitFailure",
            ImportError::LookupFailed { .. } => "LookupFailed",
        }
    }
}
