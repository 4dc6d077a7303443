//! Document store configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// SQLite file holding JSON documents.
    Sqlite,
    /// Process-local store; contents are lost on exit.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,

    /// Path to the SQLite file (created if missing).
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_backend() -> StoreBackend {
    StoreBackend::Sqlite
}

fn default_sqlite_path() -> String {
    "data/mercy.sqlite".to_string()
}

fn default_max_connections() -> u32 {
    8
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            sqlite_path: default_sqlite_path(),
            max_connections: default_max_connections(),
        }
    }
}
