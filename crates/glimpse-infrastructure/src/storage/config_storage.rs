//! Application configuration file storage.
//!
//! Reads `~/.config/glimpse/config.toml`. A missing file means defaults.

use crate::paths::GlimpsePaths;
use glimpse_core::config::AppConfig;
use glimpse_core::{GlimpseError, Result};
use std::path::PathBuf;

/// Read-only storage for `config.toml`.
#[derive(Debug, Clone)]
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates a ConfigStorage at the default path.
    pub fn new() -> Result<Self> {
        let path = GlimpsePaths::default()
            .config_file()
            .map_err(|e| GlimpseError::config(e.to_string()))?;
        Ok(Self { path })
    }

    /// Creates a ConfigStorage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the configuration, returning defaults when the file is absent.
    pub async fn load(&self) -> Result<AppConfig> {
        if !tokio::fs::try_exists(&self.path).await? {
            tracing::debug!("No config file at {:?}, using defaults", self.path);
            return Ok(AppConfig::default());
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimpse_core::config::BackendKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::with_path(temp_dir.path().join("config.toml"));
        assert_eq!(storage.load().await.unwrap(), AppConfig::default());
    }

    #[tokio::test]
    async fn test_load_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "backend_kind = \"caption_only\"\nmodel_name = \"nlpconnect/vit-gpt2-image-captioning\"\n",
        )
        .unwrap();

        let config = ConfigStorage::with_path(path).load().await.unwrap();
        assert_eq!(config.backend_kind, BackendKind::CaptionOnly);
        assert_eq!(
            config.model_name.as_deref(),
            Some("nlpconnect/vit-gpt2-image-captioning")
        );
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[tokio::test]
    async fn test_invalid_toml_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "backend_kind = \"telepathy\"").unwrap();

        let err = ConfigStorage::with_path(path).load().await.unwrap_err();
        assert!(matches!(err, GlimpseError::Serialization { .. }));
    }
}
