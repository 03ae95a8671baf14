//! Batch Committer
//!
//! One atomic multi-row insert for the whole, already validated batch.

use crate::import::error::ImportError;
use crate::import::record::NormalizedRecord;
use crate::import::schema::EntitySchema;
use crate::import::store::{CommitOptions, ImportStore};
use crate::import::translate::translate_commit_failure;
use serde::Serialize;
use tracing::{error, info, warn};

/// Outcome of a successful commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommitResult {
    pub inserted: u64,
    pub total: u64,
}

/// Insert the batch, translating any store failure
///
/// In strict mode a row count that differs from the batch size is reported
/// as a failure: the store contract says that cannot happen.
pub async fn commit_batch<S>(
    store: &S,
    schema: &EntitySchema,
    records: &[NormalizedRecord],
    options: CommitOptions,
) -> Result<CommitResult, ImportError>
where
    S: ImportStore + ?Sized,
{
    let total = records.len() as u64;

    let inserted = store
        .bulk_insert(schema, records, options)
        .await
        .map_err(|failure| {
            let translated = translate_commit_failure(&failure, schema);
            warn!(
                entity = schema.table,
                total,
                kind = translated.kind(),
                code = failure.code.as_deref().unwrap_or("-"),
                error = %failure,
                "Batch commit rejected by store"
            );
            translated
        })?;

    if inserted != total && !options.skip_duplicates {
        error!(
            entity = schema.table,
            inserted,
            total,
            "Store reported a partial insert in all-or-nothing mode"
        );
        return Err(ImportError::UnknownCommitFailure {
            detail: format!("store inserted {} of {} rows", inserted, total),
            code: None,
        });
    }

    if inserted < total {
        info!(
            entity = schema.table,
            inserted,
            skipped = total - inserted,
            "Duplicate rows skipped on request"
        );
    }

    Ok(CommitResult { inserted, total })
}
