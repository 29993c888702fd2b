//! Environment variable fallbacks.
//!
//! Secrets from the environment only fill gaps left by `secret.json`.
//! `GLIMPSE_*` settings override `config.toml`.

use glimpse_core::config::{AppConfig, GeminiSecret, HuggingFaceSecret, SecretConfig};
use glimpse_core::Result;

pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const HF_API_TOKEN: &str = "HF_API_TOKEN";
pub const GLIMPSE_BACKEND: &str = "GLIMPSE_BACKEND";
pub const GLIMPSE_MODEL: &str = "GLIMPSE_MODEL";
pub const GLIMPSE_ENDPOINT_URL: &str = "GLIMPSE_ENDPOINT_URL";
pub const GLIMPSE_TIMEOUT_SECS: &str = "GLIMPSE_TIMEOUT_SECS";

/// Reads a process environment variable, treating blank values as unset.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Fills missing secrets from the environment.
pub fn fill_secrets<F>(mut secrets: SecretConfig, lookup: F) -> SecretConfig
where
    F: Fn(&str) -> Option<String>,
{
    if secrets.gemini.is_none() {
        secrets.gemini = lookup(GOOGLE_API_KEY).map(|api_key| GeminiSecret {
            api_key,
            model_name: None,
        });
    }
    if secrets.huggingface.is_none() {
        secrets.huggingface = lookup(HF_API_TOKEN).map(|api_token| HuggingFaceSecret {
            api_token,
            model_name: None,
        });
    }
    secrets
}

/// Applies `GLIMPSE_*` overrides to the file configuration.
pub fn override_config<F>(mut config: AppConfig, lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(kind) = lookup(GLIMPSE_BACKEND) {
        config.backend_kind = kind.parse()?;
    }
    if let Some(model) = lookup(GLIMPSE_MODEL) {
        config.model_name = Some(model);
    }
    if let Some(url) = lookup(GLIMPSE_ENDPOINT_URL) {
        config.endpoint_url = Some(url);
    }
    if let Some(secs) = lookup(GLIMPSE_TIMEOUT_SECS) {
        config.request_timeout_secs = secs.trim().parse().map_err(|_| {
            glimpse_core::GlimpseError::config(format!(
                "{GLIMPSE_TIMEOUT_SECS} must be a whole number of seconds, got '{secs}'"
            ))
        })?;
    }
    Ok(config)
}
