//! Configuration types for the Mercy registry.
//!
//! The server reads a single TOML file. Every section and every field has a
//! default, so an empty (or missing) file yields a runnable configuration.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:2468"
//! request_timeout = "30s"
//!
//! [store]
//! backend = "sqlite"
//! sqlite_path = "data/mercy.sqlite"
//!
//! [token]
//! private_key_env = "MERCY_TOKEN_PRIVATE_KEY"
//! lifetime = "2h"
//!
//! [auth]
//! reject_inactive_staff = false
//! unify_credential_errors = false
//!
//! [bootstrap]
//! enabled = true
//! admin_student_id = "admin"
//!
//! [log]
//! level = "info"
//! ```

pub mod auth;
pub mod server;
pub mod store;
pub mod token;

use serde::{Deserialize, Serialize};

pub use auth::{AuthConfig, BootstrapConfig};
pub use server::{LogConfig, ServerConfig};
pub use store::{StoreBackend, StoreConfig};
pub use token::TokenConfig;

/// Complete configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MercyConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub token: TokenConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub bootstrap: BootstrapConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Parse a human-readable duration such as `"2h"` or `"30s"`.
pub(crate) fn parse_duration(field: &str, raw: &str) -> Result<std::time::Duration, String> {
    humantime::parse_duration(raw).map_err(|e| format!("invalid {field} '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_empty_file_yields_defaults() {
        let cfg: MercyConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.server.bind, "0.0.0.0:2468");
        assert_eq!(cfg.store.backend, StoreBackend::Sqlite);
        assert_eq!(cfg.token.lifetime().unwrap(), Duration::from_secs(2 * 60 * 60));
        assert!(!cfg.auth.reject_inactive_staff);
        assert!(cfg.bootstrap.enabled);
    }

    #[test]
    fn test_sections_override_defaults() {
        let cfg: MercyConfig = toml::from_str(
            r#"
            [server]
            bind = "127.0.0.1:9000"
            request_timeout = "5s"

            [store]
            backend = "memory"

            [auth]
            reject_inactive_staff = true
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.bind, "127.0.0.1:9000");
        assert_eq!(cfg.server.request_timeout().unwrap(), Duration::from_secs(5));
        assert_eq!(cfg.store.backend, StoreBackend::Memory);
        assert!(cfg.auth.reject_inactive_staff);
    }

    #[test]
    fn test_bad_duration_is_reported() {
        let cfg: MercyConfig = toml::from_str(
            r#"
            [token]
            lifetime = "forever"
            "#,
        )
        .unwrap();
        let err = cfg.token.lifetime().unwrap_err();
        assert!(err.contains("token.lifetime"));
    }
}
