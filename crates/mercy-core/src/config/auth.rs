//! Authentication policy and first-run bootstrap settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Reject still-valid tokens whose staff account has been deactivated.
    /// Off by default: deactivated staff keep access until their token expires.
    #[serde(default)]
    pub reject_inactive_staff: bool,

    /// Report `WrongCredentials` for unknown or inactive staff at login too,
    /// so clients cannot tell valid login handles apart.
    #[serde(default)]
    pub unify_credential_errors: bool,
}

/// Creates an administrator on first start when no staff exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_admin_student_id")]
    pub admin_student_id: String,

    /// Prefer setting env var `MERCY_BOOTSTRAP_ADMIN_PASSWORD`.
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

fn default_enabled() -> bool {
    true
}

fn default_admin_student_id() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "changeme".to_string()
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            admin_student_id: default_admin_student_id(),
            admin_password: default_admin_password(),
        }
    }
}
