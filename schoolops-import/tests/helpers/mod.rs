//! Test Helper Utilities
//!
//! Shared setup for schoolops-import integration tests

use schoolops_common::db::{init_memory_database, insert_class, insert_major, insert_role, insert_term};
use schoolops_import::db::SqliteStore;
use schoolops_import::import::{CandidateRecord, ImportPipeline};
use sqlx::SqlitePool;
use std::sync::Arc;

/// In-memory database seeded with one role, term, major and class:
/// `R1`, `T1`, `M1`, `C1`
pub async fn seeded_pool() -> SqlitePool {
    let pool = init_memory_database().await.unwrap();

    insert_role(&pool, "R1", "Student").await.unwrap();
    insert_term(&pool, "T1", "Fall", Some("2026-09-01"), Some("2027-01-31"))
        .await
        .unwrap();
    insert_major(&pool, "M1", "Mathematics").await.unwrap();
    insert_class(&pool, "C1", "7A").await.unwrap();

    pool
}

pub fn sqlite_pipeline(pool: &SqlitePool) -> ImportPipeline<SqliteStore> {
    ImportPipeline::new(Arc::new(SqliteStore::new(pool.clone())))
}

pub fn batch(values: Vec<serde_json::Value>) -> Vec<CandidateRecord> {
    values.into_iter().map(CandidateRecord::from).collect()
}
