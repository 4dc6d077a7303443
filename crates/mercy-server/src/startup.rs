//! Building the runtime pieces from configuration.

use mercy_core::{StoreBackend, StoreConfig, TokenConfig};
use mercy_store::{DocumentStore, MemoryStore, SqliteStore};
use mercy_token::{KeyPair, TokenService};
use std::sync::Arc;

pub async fn open_store(cfg: &StoreConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    Ok(match cfg.backend {
        StoreBackend::Sqlite => Arc::new(SqliteStore::open(&cfg.sqlite_path, cfg.max_connections).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; records are lost on exit");
            Arc::new(MemoryStore::new())
        }
    })
}

/// The configured signing key, or an ephemeral one when none is configured.
pub fn load_keypair(cfg: &TokenConfig) -> anyhow::Result<KeyPair> {
    match cfg.resolve_private_key()? {
        Some(hex) => Ok(KeyPair::from_private_key_hex(&hex)?),
        None => {
            tracing::warn!("No token signing key configured; generated an ephemeral key (tokens die with the process)");
            Ok(KeyPair::generate()?)
        }
    }
}

pub fn token_service(cfg: &TokenConfig) -> anyhow::Result<TokenService> {
    let lifetime = cfg.lifetime().map_err(anyhow::Error::msg)?;
    Ok(TokenService::new(load_keypair(cfg)?, lifetime))
}
