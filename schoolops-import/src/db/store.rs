//! SQLite implementation of the import store

use crate::import::record::NormalizedRecord;
use crate::import::schema::{EntitySchema, Relation, ID_KEY};
use crate::import::store::{CommitOptions, ImportStore, StoreFailure};
use crate::import::value::Value;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::BTreeSet;
use tracing::debug;
use uuid::Uuid;

/// Bind parameters per statement; SQLite builds before 3.32 cap this at 999
const MAX_BIND_PARAMS: usize = 999;

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl From<sqlx::Error> for StoreFailure {
    fn from(err: sqlx::Error) -> Self {
        match err.as_database_error() {
            Some(db_err) => StoreFailure::new(db_err.code().as_deref(), db_err.message()),
            None => StoreFailure::new(None, err.to_string()),
        }
    }
}

/// A single bound column value
enum SqlArg {
    Text(Option<String>),
    Integer(i64),
    Real(f64),
    Bool(bool),
}

/// Caller-supplied id, or a fresh UUID when none usable was given
fn row_id(value: &Value) -> String {
    if let Some(id) = value.as_identifier() {
        return id;
    }
    if !value.is_null() {
        debug!(id = %value.to_json(), "Ignoring non-identifier id, generating one");
    }
    Uuid::new_v4().to_string()
}

fn sql_arg(schema: &EntitySchema, key: &str, value: &Value) -> SqlArg {
    if key == ID_KEY {
        return SqlArg::Text(Some(row_id(value)));
    }

    if schema.references.iter().any(|r| r.key == key) {
        return SqlArg::Text(value.as_identifier());
    }

    match value {
        Value::Null => SqlArg::Text(None),
        Value::Bool(b) => SqlArg::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlArg::Integer(i),
            None => SqlArg::Real(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::Text(s) => SqlArg::Text(Some(s.clone())),
        Value::List(_) | Value::Map(_) => SqlArg::Text(Some(value.to_json().to_string())),
    }
}

#[async_trait::async_trait]
impl ImportStore for SqliteStore {
    async fn existing_ids(
        &self,
        relation: &Relation,
        ids: &BTreeSet<String>,
    ) -> Result<BTreeSet<String>, StoreFailure> {
        let ids: Vec<&String> = ids.iter().collect();
        let mut found = BTreeSet::new();

        for chunk in ids.chunks(MAX_BIND_PARAMS) {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new(format!("SELECT id FROM {} WHERE id IN (", relation.table));
            let mut separated = builder.separated(", ");
            for id in chunk {
                separated.push_bind(id.as_str());
            }
            separated.push_unseparated(")");

            let rows: Vec<String> = builder
                .build_query_scalar()
                .fetch_all(&self.pool)
                .await?;
            found.extend(rows);
        }

        debug!(
            table = relation.table,
            requested = ids.len(),
            found = found.len(),
            "Existence lookup"
        );

        Ok(found)
    }

    async fn bulk_insert(
        &self,
        schema: &EntitySchema,
        records: &[NormalizedRecord],
        options: CommitOptions,
    ) -> Result<u64, StoreFailure> {
        let columns = schema.columns();
        let keys = schema.keys();
        let rows_per_statement = (MAX_BIND_PARAMS / columns.len()).max(1);
        let total = records.len() as u64;

        // Statements are split to respect the bind limit, but they share one
        // transaction: any failure drops `tx` and rolls back every chunk.
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        for chunk in records.chunks(rows_per_statement) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
                "INSERT INTO {} ({}) ",
                schema.table,
                columns.join(", ")
            ));

            builder.push_values(chunk, |mut row, record| {
                for key in &keys {
                    match sql_arg(schema, key, record.get(key)) {
                        SqlArg::Text(text) => row.push_bind(text),
                        SqlArg::Integer(i) => row.push_bind(i),
                        SqlArg::Real(f) => row.push_bind(f),
                        SqlArg::Bool(b) => row.push_bind(b),
                    };
                }
            });

            if options.skip_duplicates {
                builder.push(" ON CONFLICT DO NOTHING");
            }

            let result = builder.build().execute(&mut *tx).await?;
            inserted += result.rows_affected();
        }

        if inserted != total && !options.skip_duplicates {
            tx.rollback().await?;
            return Err(StoreFailure::new(
                None,
                format!("inserted {} of {} rows, batch rolled back", inserted, total),
            ));
        }

        tx.commit().await?;

        debug!(
            table = schema.table,
            inserted,
            total,
            statements = records.len().div_ceil(rows_per_statement),
            "Bulk insert committed"
        );

        Ok(inserted)
    }
}
