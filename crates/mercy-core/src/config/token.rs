//! Session token configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where the token signing key comes from and how long tokens live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Environment variable containing the private key (hex-encoded Ed25519).
    #[serde(default = "default_private_key_env")]
    pub private_key_env: Option<String>,

    /// Path to a file containing the private key.
    #[serde(default)]
    pub private_key_file: Option<PathBuf>,

    /// Token lifetime from issuance (e.g. "2h").
    #[serde(default = "default_lifetime")]
    pub lifetime: String,
}

fn default_private_key_env() -> Option<String> {
    Some("MERCY_TOKEN_PRIVATE_KEY".to_string())
}

fn default_lifetime() -> String {
    "2h".to_string()
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            private_key_env: default_private_key_env(),
            private_key_file: None,
            lifetime: default_lifetime(),
        }
    }
}

impl TokenConfig {
    pub fn lifetime(&self) -> Result<Duration, String> {
        super::parse_duration("token.lifetime", &self.lifetime)
    }

    /// Resolve the private key from environment or file.
    pub fn resolve_private_key(&self) -> Result<Option<String>, std::io::Error> {
        // Environment wins over the file
        if let Some(env_var) = &self.private_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.trim().is_empty()
        {
            return Ok(Some(key.trim().to_string()));
        }

        if let Some(path) = &self.private_key_file
            && path.exists()
        {
            let key = std::fs::read_to_string(path)?;
            return Ok(Some(key.trim().to_string()));
        }

        Ok(None)
    }
}
