//! Error types for the store crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A document with the same identifier already exists.
    #[error("duplicate document id {id} in {collection}")]
    Duplicate { collection: String, id: String },

    /// The value to store does not serialize to a JSON object.
    #[error("value is not a document (expected a JSON object)")]
    NotADocument,

    /// A stored document carries a malformed `_id`.
    #[error("stored document has an invalid _id: {0}")]
    InvalidId(String),

    /// The filter uses a value type the backend cannot compare.
    #[error("unsupported filter on field '{field}'")]
    UnsupportedFilter { field: String },

    /// In-memory lock was poisoned.
    #[error("store lock poisoned")]
    LockError,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
