//! Secret and configuration service traits.
//!
//! Defines the interface for loading API keys and backend settings. The
//! implementations live in `glimpse-infrastructure` and are meant to be swapped
//! freely (files, environment, test doubles).

use crate::config::{AppConfig, SecretConfig};
use crate::error::Result;

/// Service for loading secret configuration.
///
/// # Security Note
///
/// Implementations must never log secrets or include them in error messages.
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration.
    async fn load_secrets(&self) -> Result<SecretConfig>;
}

/// Service for loading non-secret application configuration.
#[async_trait::async_trait]
pub trait ConfigService: Send + Sync {
    /// Loads `config.toml`, falling back to defaults when the file is absent.
    async fn load_config(&self) -> Result<AppConfig>;
}
