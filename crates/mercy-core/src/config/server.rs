//! HTTP listener and logging configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:2468".
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Deadline applied uniformly to every request (e.g. "30s").
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
}

fn default_bind() -> String {
    "0.0.0.0:2468".to_string()
}

fn default_request_timeout() -> String {
    "30s".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Result<Duration, String> {
        super::parse_duration("server.request_timeout", &self.request_timeout)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Fallback filter when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}
