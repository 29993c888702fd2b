//! Secret service implementation.
//!
//! Loads `secret.json` and fills gaps from the environment. The result is
//! cached for the lifetime of the service.

use crate::env;
use crate::storage::{SecretStorage, SecretStorageError};
use glimpse_core::config::SecretConfig;
use glimpse_core::secret::SecretService;
use glimpse_core::{GlimpseError, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// File-then-environment secret loader.
#[derive(Clone)]
pub struct SecretServiceImpl {
    storage: SecretStorage,
    lookup: Arc<dyn Fn(&str) -> Option<String> + Send + Sync>,
    cached: Arc<OnceCell<SecretConfig>>,
}

impl SecretServiceImpl {
    /// Uses the default secret path and the process environment.
    pub fn new() -> Result<Self> {
        let storage = SecretStorage::new().map_err(|e| GlimpseError::config(e.to_string()))?;
        Ok(Self::with_storage(storage, env::process_env))
    }

    /// Custom storage and environment lookup (for testing).
    pub fn with_storage<F>(storage: SecretStorage, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            storage,
            lookup: Arc::new(lookup),
            cached: Arc::new(OnceCell::new()),
        }
    }

    async fn load_uncached(&self) -> Result<SecretConfig> {
        let from_file = match self.storage.load().await {
            Ok(config) => config,
            Err(SecretStorageError::NotFound(path)) => {
                tracing::debug!("No secret file at {:?}, relying on environment", path);
                SecretConfig::default()
            }
            Err(e) => return Err(GlimpseError::config(e.to_string())),
        };
        Ok(env::fill_secrets(from_file, |key| (self.lookup)(key)))
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        self.cached
            .get_or_try_init(|| self.load_uncached())
            .await
            .cloned()
    }
}
