//! In-memory [`ImportStore`] fake for unit tests
//!
//! Records every lookup and insert so tests can assert on store traffic.

use crate::import::record::NormalizedRecord;
use crate::import::schema::{EntitySchema, Relation};
use crate::import::store::{CommitOptions, ImportStore, StoreFailure};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct MemoryStore {
    rows: BTreeMap<String, BTreeSet<String>>,
    failing_lookups: BTreeMap<String, String>,
    commit_failure: Option<StoreFailure>,
    reported_inserted: Option<u64>,
    lookup_delay: Option<Duration>,
    lookups: Mutex<Vec<String>>,
    inserted: Mutex<BTreeMap<String, Vec<NormalizedRecord>>>,
    commit_options: Mutex<Vec<CommitOptions>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, table: &str, ids: &[&str]) -> Self {
        self.rows
            .entry(table.to_string())
            .or_default()
            .extend(ids.iter().map(|id| id.to_string()));
        self
    }

    pub fn failing_lookup(mut self, table: &str, message: &str) -> Self {
        self.failing_lookups.insert(table.to_string(), message.to_string());
        self
    }

    pub fn failing_commit(mut self, failure: StoreFailure) -> Self {
        self.commit_failure = Some(failure);
        self
    }

    /// Persist normally but report this row count
    pub fn reporting_inserted(mut self, count: u64) -> Self {
        self.reported_inserted = Some(count);
        self
    }

    pub fn with_lookup_delay(mut self, delay: Duration) -> Self {
        self.lookup_delay = Some(delay);
        self
    }

    /// Tables looked up, in call order
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn inserted(&self, table: &str) -> Vec<NormalizedRecord> {
        self.inserted
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn commit_options(&self) -> Vec<CommitOptions> {
        self.commit_options.lock().unwrap().clone()
    }

    /// Highest number of lookups observed running at the same time
    pub fn max_concurrent_lookups(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ImportStore for MemoryStore {
    async fn existing_ids(
        &self,
        relation: &Relation,
        ids: &BTreeSet<String>,
    ) -> Result<BTreeSet<String>, StoreFailure> {
        self.lookups.lock().unwrap().push(relation.table.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.lookup_delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(message) = self.failing_lookups.get(relation.table) {
            return Err(StoreFailure::new(None, message.clone()));
        }

        let existing = self.rows.get(relation.table).cloned().unwrap_or_default();
        Ok(ids.intersection(&existing).cloned().collect())
    }

    async fn bulk_insert(
        &self,
        schema: &EntitySchema,
        records: &[NormalizedRecord],
        options: CommitOptions,
    ) -> Result<u64, StoreFailure> {
        self.commit_options.lock().unwrap().push(options);

        if let Some(failure) = &self.commit_failure {
            return Err(failure.clone());
        }

        self.inserted
            .lock()
            .unwrap()
            .entry(schema.table.to_string())
            .or_default()
            .extend(records.iter().cloned());

        Ok(self.reported_inserted.unwrap_or(records.len() as u64))
    }
}
