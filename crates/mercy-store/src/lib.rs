//! # mercy-store
//!
//! Thin accessor over the three registry collections (students, staffs,
//! items). The pipeline never holds an authoritative copy of a record:
//! every lookup re-reads from the store and every mutation is written back
//! immediately as a single-document operation.
//!
//! ## Backends
//!
//! | Backend | Type | Use |
//! |---------|------|-----|
//! | In-memory | [`MemoryStore`] | tests, throwaway instances |
//! | SQLite | [`SqliteStore`] | default deployment |

pub mod adapter;
pub mod error;
pub mod memory;
pub mod sqlite;

pub use adapter::{
    Collection, Document, DocumentStore, Filter, ID_FIELD, Update, UpdateResult, VERSION_FIELD,
};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
