//! Configuration service implementation.
//!
//! Loads `config.toml` and applies `GLIMPSE_*` environment overrides.

use crate::env;
use crate::storage::ConfigStorage;
use glimpse_core::config::AppConfig;
use glimpse_core::secret::ConfigService;
use glimpse_core::Result;
use std::sync::Arc;

#[derive(Clone)]
pub struct ConfigServiceImpl {
    storage: ConfigStorage,
    lookup: Arc<dyn Fn(&str) -> Option<String> + Send + Sync>,
}

impl ConfigServiceImpl {
    /// Uses the default config path and the process environment.
    pub fn new() -> Result<Self> {
        Ok(Self::with_storage(ConfigStorage::new()?, env::process_env))
    }

    /// Custom storage and environment lookup (for testing).
    pub fn with_storage<F>(storage: ConfigStorage, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            storage,
            lookup: Arc::new(lookup),
        }
    }
}

#[async_trait::async_trait]
impl ConfigService for ConfigServiceImpl {
    async fn load_config(&self) -> Result<AppConfig> {
        let from_file = self.storage.load().await?;
        env::override_config(from_file, |key| (self.lookup)(key))
    }
}
