//! Configuration file loading.

use mercy_core::MercyConfig;
use std::path::Path;

/// Load `path`, falling back to defaults when the file does not exist.
pub fn load_config(path: &Path) -> anyhow::Result<MercyConfig> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "No configuration file; using defaults");
        return Ok(MercyConfig::default());
    }
    let raw = std::fs::read_to_string(path)?;
    let cfg: MercyConfig = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.server.bind, "0.0.0.0:2468");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[store]\nbackend = \"memory\"\n\n[auth]\nreject_inactive_staff = true"
        )
        .unwrap();

        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.store.backend, mercy_core::StoreBackend::Memory);
        assert!(cfg.auth.reject_inactive_staff);
        assert_eq!(cfg.token.lifetime, "2h");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[store]\nbackend = \"mongodb\"").unwrap();
        assert!(load_config(file.path()).is_err());
    }
}
