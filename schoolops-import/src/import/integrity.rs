//! Referential Integrity Checker
//!
//! One existence lookup per relation with a non-empty reference set, issued
//! concurrently and joined. The invalid set of a relation is the difference
//! between requested and found identifiers. A lookup that fails outright
//! fails the whole check: no partial report is produced.

use crate::import::error::ImportError;
use crate::import::references::ReferenceSet;
use crate::import::schema::Relation;
use crate::import::store::ImportStore;
use futures::future::try_join_all;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, error};

/// Per relation key, the requested identifiers missing from the store
///
/// Contains an entry for every relation that was looked up, empty or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    invalid: BTreeMap<String, BTreeSet<String>>,
}

impl IntegrityReport {
    /// True when every checked relation fully resolved
    pub fn is_committable(&self) -> bool {
        self.invalid.values().all(BTreeSet::is_empty)
    }

    pub fn invalid(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.invalid.get(key)
    }

    /// Number of relations that were looked up
    pub fn checked(&self) -> usize {
        self.invalid.len()
    }

    /// Relations with violations only, ids in ascending order
    pub fn violations(&self) -> BTreeMap<String, Vec<String>> {
        self.invalid
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(key, ids)| (key.clone(), ids.iter().cloned().collect()))
            .collect()
    }
}

/// Check every referenced identifier against the store
pub async fn check_references<S>(
    store: &S,
    references: &ReferenceSet,
) -> Result<IntegrityReport, ImportError>
where
    S: ImportStore + ?Sized,
{
    let lookups = references
        .non_empty()
        .map(|(relation, ids)| lookup_invalid(store, relation, ids));

    let invalid = try_join_all(lookups).await?.into_iter().collect();

    Ok(IntegrityReport { invalid })
}

async fn lookup_invalid<S>(
    store: &S,
    relation: &Relation,
    requested: &BTreeSet<String>,
) -> Result<(String, BTreeSet<String>), ImportError>
where
    S: ImportStore + ?Sized,
{
    let found = store.existing_ids(relation, requested).await.map_err(|failure| {
        error!(
            relation = relation.key,
            table = relation.table,
            error = %failure,
            "Reference lookup failed"
        );
        ImportError::LookupFailed {
            relation: relation.key.to_string(),
            detail: failure.message,
        }
    })?;

    let invalid: BTreeSet<String> = requested.difference(&found).cloned().collect();

    debug!(
        relation = relation.key,
        requested = requested.len(),
        invalid = invalid.len(),
        "Reference lookup complete"
    );

    Ok((relation.key.to_string(), invalid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::memory_store::MemoryStore;
    use crate::import::normalize::normalize_batch;
    use crate::import::record::CandidateRecord;
    use crate::import::references::collect_references;
    use crate::import::schema::EntityKind;
    use serde_json::json;

    fn references(values: Vec<serde_json::Value>) -> ReferenceSet {
        let schema = EntityKind::User.schema();
        let records = normalize_batch(schema, values.into_iter().map(CandidateRecord::from).collect());
        collect_references(schema, &records)
    }

    #[tokio::test]
    async fn test_no_references_means_no_lookups() {
        let store = MemoryStore::new();
        let refs = references(vec![json!({"name": "a"}), json!({"name": "b"})]);

        let report = check_references(&store, &refs).await.unwrap();

        assert!(report.is_committable());
        assert_eq!(report.checked(), 0);
        assert!(store.lookups().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_set_is_exact_difference() {
        let store = MemoryStore::new()
            .with_rows("roles", &["R1", "R2"])
            .with_rows("classes", &["C1"]);
        let refs = references(vec![
            json!({"name": "a", "roleId": "R1", "classId": "C9"}),
            json!({"name": "b", "roleId": "R3", "classId": "C1"}),
            json!({"name": "c", "roleId": "R3", "classId": "C8"}),
        ]);

        let report = check_references(&store, &refs).await.unwrap();

        assert!(!report.is_committable());
        assert_eq!(
            report.invalid("roleId").unwrap(),
            &BTreeSet::from(["R3".to_string()])
        );
        assert_eq!(
            report.invalid("classId").unwrap(),
            &BTreeSet::from(["C8".to_string(), "C9".to_string()])
        );
    }

    #[tokio::test]
    async fn test_one_lookup_per_referenced_relation() {
        let store = MemoryStore::new().with_rows("roles", &["R1"]).with_rows("terms", &["T1"]);
        let refs = references(vec![
            json!({"name": "a", "roleId": "R1", "termId": "T1"}),
            json!({"name": "b", "roleId": "R1", "termId": "T1"}),
        ]);

        let report = check_references(&store, &refs).await.unwrap();

        assert!(report.is_committable());
        let mut looked_up = store.lookups();
        looked_up.sort();
        assert_eq!(looked_up, vec!["roles".to_string(), "terms".to_string()]);
    }

    #[tokio::test]
    async fn test_violations_omit_resolved_relations() {
        let store = MemoryStore::new().with_rows("roles", &["R1"]);
        let refs = references(vec![json!({"name": "a", "roleId": "R1", "majorId": "M4"})]);

        let report = check_references(&store, &refs).await.unwrap();

        assert_eq!(
            report.violations(),
            BTreeMap::from([("majorId".to_string(), vec!["M4".to_string()])])
        );
    }

    #[tokio::test]
    async fn test_failed_lookup_fails_whole_check() {
        let store = MemoryStore::new()
            .with_rows("roles", &["R1"])
            .failing_lookup("terms", "connection reset");
        let refs = references(vec![json!({"name": "a", "roleId": "R1", "termId": "T1"})]);

        let err = check_references(&store, &refs).await.unwrap_err();

        assert_eq!(
            err,
            ImportError::LookupFailed {
                relation: "termId".to_string(),
                detail: "connection reset".to_string(),
            }
        );
    }
}
