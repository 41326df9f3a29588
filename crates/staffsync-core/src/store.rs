use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sqlx::{postgres::PgRow, QueryBuilder, Row};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::Result;
use crate::record::{clean, Record, CREATED_AT, ID, UPDATED_AT};
use crate::schema::EntityKind;

/// The persistence collaborator: everything the import flow needs from the
/// hosted directory database.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Unfiltered load of one entity collection.
    async fn fetch_all(&self, kind: EntityKind) -> Result<Vec<Record>>;

    /// Load only the records whose natural key appears in `keys`.
    async fn fetch_by_keys(&self, kind: EntityKind, keys: &[String]) -> Result<Vec<Record>>;

    /// Idempotent insert-or-update with an explicit conflict target.
    /// Calling it repeatedly with a subset of records has no side effects
    /// beyond that subset.
    async fn upsert(
        &self,
        kind: EntityKind,
        records: &[Record],
        conflict_target: &str,
    ) -> Result<()>;
}

/// Postgres-backed store. Queries are assembled from the entity schema so
/// field lists stay declared in exactly one place.
pub struct PgDirectoryStore {
    pool: DbPool,
}

impl PgDirectoryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn select_clause(kind: EntityKind) -> String {
        let mut columns = vec![
            format!("{ID}::text AS {ID}"),
            format!("{CREATED_AT}::text AS {CREATED_AT}"),
            UPDATED_AT.to_string(),
        ];
        columns.extend(kind.fields().iter().map(|spec| spec.name.to_string()));
        format!("SELECT {} FROM {}", columns.join(", "), kind.table())
    }

    fn row_to_record(kind: EntityKind, row: &PgRow) -> Result<Record> {
        let mut record = Record::new();
        record.set(ID, row.try_get::<Option<String>, _>(ID)?);
        record.set(CREATED_AT, row.try_get::<Option<String>, _>(CREATED_AT)?);
        record.set(UPDATED_AT, row.try_get::<Option<String>, _>(UPDATED_AT)?);
        for spec in kind.fields() {
            record.set(spec.name, row.try_get::<Option<String>, _>(spec.name)?);
        }
        Ok(record)
    }
}

#[async_trait]
impl DirectoryStore for PgDirectoryStore {
    async fn fetch_all(&self, kind: EntityKind) -> Result<Vec<Record>> {
        let sql = format!(
            "{} ORDER BY {}",
            Self::select_clause(kind),
            kind.natural_key()
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(|row| Self::row_to_record(kind, row)).collect()
    }

    async fn fetch_by_keys(&self, kind: EntityKind, keys: &[String]) -> Result<Vec<Record>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "{} WHERE {} = ANY($1)",
            Self::select_clause(kind),
            kind.natural_key()
        );
        let rows = sqlx::query(&sql).bind(keys).fetch_all(&self.pool).await?;
        rows.iter().map(|row| Self::row_to_record(kind, row)).collect()
    }

    async fn upsert(
        &self,
        kind: EntityKind,
        records: &[Record],
        conflict_target: &str,
    ) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let columns: Vec<&'static str> = kind
            .importable_fields()
            .map(|spec| spec.name)
            .chain(std::iter::once(UPDATED_AT))
            .collect();

        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!("INSERT INTO {} (", kind.table()));
        builder.push(columns.join(", "));
        builder.push(") ");
        builder.push_values(records, |mut row, record| {
            for column in &columns {
                row.push_bind(record.get(column).map(str::to_string));
            }
        });
        builder.push(format!(" ON CONFLICT ({conflict_target}) DO UPDATE SET "));
        let assignments: Vec<String> = columns
            .iter()
            .filter(|&&column| column != conflict_target)
            .map(|column| format!("{column} = EXCLUDED.{column}"))
            .collect();
        builder.push(assignments.join(", "));

        builder.build().execute(&self.pool).await?;
        Ok(())
    }
}

/// In-memory [`DirectoryStore`] used by tests and offline dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<EntityKind, Vec<Record>>>,
    upsert_chunks: Mutex<Vec<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(kind: EntityKind, records: Vec<Record>) -> Self {
        let store = Self::default();
        store
            .collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(kind, records);
        store
    }

    /// Sizes of the upsert batches received so far, in call order.
    pub fn upsert_chunk_sizes(&self) -> Vec<usize> {
        self.upsert_chunks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn fetch_all(&self, kind: EntityKind) -> Result<Vec<Record>> {
        Ok(self
            .collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_by_keys(&self, kind: EntityKind, keys: &[String]) -> Result<Vec<Record>> {
        let all = self.fetch_all(kind).await?;
        Ok(all
            .into_iter()
            .filter(|record| {
                record
                    .natural_key(kind)
                    .map(|key| keys.contains(&key))
                    .unwrap_or(false)
            })
            .collect())
    }

    async fn upsert(
        &self,
        kind: EntityKind,
        records: &[Record],
        conflict_target: &str,
    ) -> Result<()> {
        self.upsert_chunks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(records.len());

        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let collection = collections.entry(kind).or_default();

        for record in records {
            let Some(key) = clean(record.get(conflict_target)) else {
                continue;
            };
            let existing = collection.iter_mut().find(|existing| {
                clean(existing.get(conflict_target)).as_deref() == Some(key.as_str())
            });
            match existing {
                Some(existing) => {
                    for name in record.field_names().collect::<Vec<_>>() {
                        existing.set(name, record.get(name).map(str::to_string));
                    }
                }
                None => {
                    let mut inserted = record.clone();
                    inserted.set(ID, Some(Uuid::new_v4().to_string()));
                    inserted.set(
                        CREATED_AT,
                        Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
                    );
                    collection.push(inserted);
                }
            }
        }

        Ok(())
    }
}
