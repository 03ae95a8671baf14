//! Bulk import pipeline
//!
//! Normalize → validate required fields → collect references → check
//! references (concurrent lookups) → gate → atomic commit → translate commit
//! failures. Stateless per call; the only shared thing is the store handle.

use crate::import::commit::{commit_batch, CommitResult};
use crate::import::error::ImportError;
use crate::import::integrity::check_references;
use crate::import::normalize::normalize_batch;
use crate::import::record::CandidateRecord;
use crate::import::references::collect_references;
use crate::import::schema::EntityKind;
use crate::import::store::{CommitOptions, ImportStore};
use crate::import::validate::find_missing_required;
use std::sync::Arc;
use tracing::{debug, info};

pub struct ImportPipeline<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for ImportPipeline<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> ImportPipeline<S>
where
    S: ImportStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Import a batch of `kind` records, all or nothing
    pub async fn run(
        &self,
        kind: EntityKind,
        records: Vec<CandidateRecord>,
        options: CommitOptions,
    ) -> Result<CommitResult, ImportError> {
        let schema = kind.schema();
        let total = records.len();

        if records.is_empty() {
            debug!(entity = %kind, "Empty batch, nothing to import");
            return Ok(CommitResult { inserted: 0, total: 0 });
        }

        info!(
            entity = %kind,
            total,
            skip_duplicates = options.skip_duplicates,
            "Starting bulk import"
        );

        let normalized = normalize_batch(schema, records);

        let missing = find_missing_required(schema, &normalized);
        if !missing.is_empty() {
            info!(
                entity = %kind,
                total,
                invalid = missing.len(),
                "Batch rejected: missing required field"
            );
            return Err(ImportError::MissingRequiredField {
                invalid_count: missing.len(),
                invalid_records: missing,
            });
        }

        let references = collect_references(schema, &normalized);
        let report = check_references(self.store.as_ref(), &references).await?;

        if !report.is_committable() {
            let details = report.violations();
            info!(
                entity = %kind,
                total,
                relations = ?details.keys().collect::<Vec<_>>(),
                "Batch rejected: invalid references"
            );
            return Err(ImportError::InvalidReference { details });
        }

        let result = commit_batch(self.store.as_ref(), schema, &normalized, options).await?;

        info!(
            entity = %kind,
            inserted = result.inserted,
            total = result.total,
            "Bulk import committed"
        );

        Ok(result)
    }
}
