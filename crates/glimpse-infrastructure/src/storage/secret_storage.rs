//! Secret configuration file storage.
//!
//! Reads `~/.config/glimpse/secret.json`.

use crate::paths::{GlimpsePaths, PathError};
use glimpse_core::config::SecretConfig;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to read `secret.json`.
///
/// Messages never include file contents; serde_json reports only position and
/// category, so a malformed key is not echoed.
#[derive(Debug, Error)]
pub enum SecretStorageError {
    #[error("Secret file not found at: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Read-only storage for `secret.json`.
///
/// # Security Note
///
/// The file is plaintext JSON and should be readable only by its owner
/// (e.g. mode 600).
#[derive(Debug, Clone)]
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Storage at `~/.config/glimpse/secret.json`.
    pub fn new() -> Result<Self, SecretStorageError> {
        Ok(Self {
            path: GlimpsePaths::default().secret_file()?,
        })
    }

    /// Storage at an explicit path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads and parses the secret file. A missing file is reported as
    /// [`SecretStorageError::NotFound`] so callers can fall back to the environment.
    pub async fn load(&self) -> Result<SecretConfig, SecretStorageError> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Err(SecretStorageError::NotFound(self.path.clone()));
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        let storage = SecretStorage::with_path(file_path.clone());

        match storage.load().await {
            Err(SecretStorageError::NotFound(path)) => assert_eq!(path, file_path),
            other => panic!("Expected NotFound error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_valid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");

        let json_content = r#"{
            "gemini": {
                "api_key": "test-key-123",
                "model_name": "gemini-1.5-pro"
            },
            "huggingface": {
                "api_token": "hf_abc"
            }
        }"#;
        std::fs::write(&file_path, json_content).unwrap();

        let config = SecretStorage::with_path(file_path).load().await.unwrap();

        let gemini = config.gemini.unwrap();
        assert_eq!(gemini.api_key, "test-key-123");
        assert_eq!(gemini.model_name, Some("gemini-1.5-pro".to_string()));
        let hf = config.huggingface.unwrap();
        assert_eq!(hf.api_token, "hf_abc");
        assert_eq!(hf.model_name, None);
    }

    #[tokio::test]
    async fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        std::fs::write(&file_path, "{ not json").unwrap();

        let result = SecretStorage::with_path(file_path).load().await;
        assert!(matches!(result, Err(SecretStorageError::Parse(_))));
    }
}
