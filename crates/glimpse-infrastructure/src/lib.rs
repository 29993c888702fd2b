//! Configuration, secret and file loading for Glimpse.

pub mod config_service;
pub mod env;
pub mod image_file;
pub mod paths;
pub mod secret_service;
pub mod storage;

pub use crate::config_service::ConfigServiceImpl;
pub use crate::image_file::{ImageFile, read_image_file};
pub use crate::paths::GlimpsePaths;
pub use crate::secret_service::SecretServiceImpl;

use glimpse_core::config::GatewayConfig;
use glimpse_core::secret::{ConfigService, SecretService};
use glimpse_core::Result;

/// Loads configuration and secrets and resolves them into a [`GatewayConfig`].
///
/// Fails with `ConfigurationMissing` when the selected backend has no API key;
/// callers are expected to stop at startup on that error.
pub async fn load_gateway_config(
    config_service: &dyn ConfigService,
    secret_service: &dyn SecretService,
) -> Result<GatewayConfig> {
    let app = config_service.load_config().await?;
    let secrets = secret_service.load_secrets().await?;
    let resolved = GatewayConfig::resolve(&app, &secrets)?;
    tracing::info!(
        backend = %resolved.backend_kind,
        model = %resolved.model_name,
        "Resolved gateway configuration"
    );
    Ok(resolved)
}
