//! Store collaborator consumed by the pipeline
//!
//! The pipeline never reaches a database directly; it is handed an
//! [`ImportStore`] at construction. Production uses the SQLite store in
//! `crate::db`; tests substitute an in-memory fake.

use crate::import::record::NormalizedRecord;
use crate::import::schema::{EntitySchema, Relation};
use serde::Deserialize;
use std::collections::BTreeSet;
use thiserror::Error;

/// Options passed straight through to the store on commit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitOptions {
    /// Silently drop rows that collide with a uniqueness constraint instead
    /// of failing the whole batch. Off by default.
    #[serde(default)]
    pub skip_duplicates: bool,
}

/// Raw failure signal raised by the store
///
/// Carries the store's own error code verbatim (SQLite extended result code,
/// PostgreSQL SQLSTATE, ...) so the translator can classify it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreFailure {
    pub code: Option<String>,
    pub message: String,
}

impl StoreFailure {
    pub fn new(code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            code: code.map(str::to_string),
            message: message.into(),
        }
    }
}

#[async_trait::async_trait]
pub trait ImportStore: Send + Sync {
    /// Existence lookup: the subset of `ids` present in `relation`'s table
    ///
    /// Read-only. Reads only the identifier column.
    async fn existing_ids(
        &self,
        relation: &Relation,
        ids: &BTreeSet<String>,
    ) -> Result<BTreeSet<String>, StoreFailure>;

    /// Atomic multi-row insert of a whole batch
    ///
    /// Either every row is persisted or none is. Returns the number of rows
    /// inserted (lower than the batch size only when `skip_duplicates` is set).
    async fn bulk_insert(
        &self,
        schema: &EntitySchema,
        records: &[NormalizedRecord],
        options: CommitOptions,
    ) -> Result<u64, StoreFailure>;
}
