//! SQLite-backed document store.
//!
//! Documents live as JSON text in a single `documents` table keyed by
//! `(collection, id)`. Field filters are evaluated with `json_extract`, and
//! updates run as one `UPDATE ... RETURNING` statement, so the field-set and
//! the version increment land atomically against the stored value.

use crate::adapter::{
    Collection, Document, DocumentStore, Filter, ID_FIELD, Update, UpdateResult, assign_id,
};
use crate::error::StoreError;
use async_trait::async_trait;
use mercy_core::ObjectId;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;

pub struct SqliteStore {
    pool: SqlitePool,
}

/// A positional parameter for a generated statement.
#[derive(Debug, Clone, PartialEq)]
enum Bind {
    Text(String),
    Int(i64),
    Real(f64),
}

impl SqliteStore {
    /// Open (or create) the database file at `path` and run migrations.
    pub async fn open(path: impl AsRef<Path>, max_connections: u32) -> Result<Self, StoreError> {
        let path = path.as_ref();
        ensure_parent_dir(path)?;

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        tracing::info!(path = %path.display(), "Opened SQLite document store");
        Self::from_pool(pool).await
    }

    /// A private in-memory database, mostly for tests.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        // Every connection to :memory: is a separate database, so pin one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let (clause, binds) = where_clause(collection, filter)?;
        let sql = format!("SELECT body FROM documents WHERE {clause} LIMIT 1");

        let mut query = sqlx::query(&sql);
        for bind in binds {
            query = match bind {
                Bind::Text(s) => query.bind(s),
                Bind::Int(i) => query.bind(i),
                Bind::Real(f) => query.bind(f),
            };
        }

        let Some(row) = query.fetch_optional(&self.pool).await? else {
            return Ok(None);
        };
        let body: String = row.try_get("body")?;
        Ok(Some(serde_json::from_str(&body)?))
    }

    async fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
        skip: u64,
        limit: Option<u64>,
    ) -> Result<Vec<Document>, StoreError> {
        let (clause, binds) = where_clause(collection, filter)?;
        let sql = format!("SELECT body FROM documents WHERE {clause} ORDER BY rowid LIMIT ? OFFSET ?");

        let mut query = sqlx::query(&sql);
        for bind in binds {
            query = match bind {
                Bind::Text(s) => query.bind(s),
                Bind::Int(i) => query.bind(i),
                Bind::Real(f) => query.bind(f),
            };
        }
        // A negative LIMIT means no limit
        let limit = limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));
        let offset = i64::try_from(skip).unwrap_or(i64::MAX);

        let rows = query.bind(limit).bind(offset).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| -> Result<Document, StoreError> {
                let body: String = row.try_get("body")?;
                Ok(serde_json::from_str(&body)?)
            })
            .collect()
    }

    async fn insert_one(
        &self,
        collection: Collection,
        mut doc: Document,
    ) -> Result<ObjectId, StoreError> {
        let id = assign_id(&mut doc)?;
        let body = serde_json::to_string(&doc)?;

        let result = sqlx::query("INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)")
            .bind(collection.name())
            .bind(id.to_hex())
            .bind(body)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(id),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::Duplicate {
                    collection: collection.to_string(),
                    id: id.to_hex(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: Update,
    ) -> Result<UpdateResult, StoreError> {
        let (clause, binds) = where_clause(collection, filter)?;
        let patch = serde_json::to_string(update.fields())?;

        let new_body = if update.bumps_version() {
            "json_set(json_patch(body, ?), '$.version', \
             COALESCE(json_extract(body, '$.version'), 0) + 1)"
        } else {
            "json_patch(body, ?)"
        };
        let sql = format!(
            "UPDATE documents SET body = {new_body} \
             WHERE rowid = (SELECT rowid FROM documents WHERE {clause} LIMIT 1) \
             RETURNING json_extract(body, '$.version') AS version"
        );

        let mut query = sqlx::query(&sql).bind(patch);
        for bind in binds {
            query = match bind {
                Bind::Text(s) => query.bind(s),
                Bind::Int(i) => query.bind(i),
                Bind::Real(f) => query.bind(f),
            };
        }

        let Some(row) = query.fetch_optional(&self.pool).await? else {
            return Ok(UpdateResult::unmatched());
        };
        let version: Option<i64> = row.try_get("version")?;
        Ok(UpdateResult {
            matched: true,
            version: version.and_then(|v| u64::try_from(v).ok()),
        })
    }

    async fn count(&self, collection: Collection) -> Result<u64, StoreError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(1) FROM documents WHERE collection = ?")
            .bind(collection.name())
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0.max(0) as u64)
    }
}

fn where_clause(collection: Collection, filter: &Filter) -> Result<(String, Vec<Bind>), StoreError> {
    let mut clause = String::from("collection = ?");
    let mut binds = vec![Bind::Text(collection.name().to_string())];

    for (field, value) in filter.conditions() {
        if field == ID_FIELD {
            let Value::String(id) = value else {
                return Err(StoreError::UnsupportedFilter { field: field.clone() });
            };
            clause.push_str(" AND id = ?");
            binds.push(Bind::Text(id.clone()));
            continue;
        }

        let bind = match value {
            Value::String(s) => Bind::Text(s.clone()),
            // json_extract yields 1/0 for JSON booleans
            Value::Bool(b) => Bind::Int(i64::from(*b)),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Bind::Int(i),
                (None, Some(f)) => Bind::Real(f),
                _ => return Err(StoreError::UnsupportedFilter { field: field.clone() }),
            },
            _ => return Err(StoreError::UnsupportedFilter { field: field.clone() }),
        };
        clause.push_str(" AND json_extract(body, ?) = ?");
        binds.push(Bind::Text(json_path(field)));
        binds.push(bind);
    }

    Ok((clause, binds))
}

fn json_path(field: &str) -> String {
    format!("$.\"{}\"", field.replace('"', ""))
}

fn ensure_parent_dir(file_path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = file_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
