//! Configuration domain types.
//!
//! `config.toml` selects the backend and its tuning, `secret.json` holds API keys.
//! [`GatewayConfig::resolve`] merges both into the value the gateway is built from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{GlimpseError, Result};
use crate::inference::{DEFAULT_REQUEST_TIMEOUT, GatewaySettings};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_CAPTION_MODEL: &str = "Salesforce/blip-image-captioning-large";

/// Which backend capability the session runs against.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Generative vision-language model (analysis + chat)
    #[default]
    VisionChat,
    /// Image-captioning model (caption only, no chat)
    CaptionOnly,
}

impl BackendKind {
    pub fn supports_chat(self) -> bool {
        matches!(self, BackendKind::VisionChat)
    }

    pub fn default_model(self) -> &'static str {
        match self {
            BackendKind::VisionChat => DEFAULT_GEMINI_MODEL,
            BackendKind::CaptionOnly => DEFAULT_CAPTION_MODEL,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::VisionChat => f.write_str("vision_chat"),
            BackendKind::CaptionOnly => f.write_str("caption_only"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = GlimpseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "vision_chat" | "vision" | "gemini" => Ok(BackendKind::VisionChat),
            "caption_only" | "caption" | "huggingface" => Ok(BackendKind::CaptionOnly),
            other => Err(GlimpseError::config(format!(
                "Unknown backend kind '{other}' (expected vision_chat or caption_only)"
            ))),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

/// Contents of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub backend_kind: BackendKind,
    /// Overrides the backend's default model
    #[serde(default)]
    pub model_name: Option<String>,
    /// Overrides the backend's default endpoint (raw HTTP backends)
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Optional budget for the whole four-call analysis
    #[serde(default)]
    pub analysis_budget_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_kind: BackendKind::default(),
            model_name: None,
            endpoint_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            analysis_budget_secs: None,
        }
    }
}

/// Root structure of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiSecret>,
    #[serde(default)]
    pub huggingface: Option<HuggingFaceSecret>,
}

/// Gemini API credentials
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GeminiSecret {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

/// Hugging Face inference credentials
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HuggingFaceSecret {
    pub api_token: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

/// Fully resolved configuration for building a gateway.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub backend_kind: BackendKind,
    pub api_key: String,
    pub model_name: String,
    pub endpoint_url: Option<String>,
    pub settings: GatewaySettings,
}

impl GatewayConfig {
    /// Merges `config.toml` and `secret.json` values.
    ///
    /// Model precedence: `config.toml` > `secret.json` > backend default.
    ///
    /// # Errors
    ///
    /// - [`GlimpseError::ConfigurationMissing`] if the selected backend has no key
    /// - [`GlimpseError::Config`] if a timeout is zero or a key is blank
    pub fn resolve(app: &AppConfig, secrets: &SecretConfig) -> Result<Self> {
        let (api_key, secret_model) = match app.backend_kind {
            BackendKind::VisionChat => {
                let gemini = secrets.gemini.as_ref().ok_or_else(|| {
                    GlimpseError::configuration_missing("Gemini API key (GOOGLE_API_KEY)")
                })?;
                (gemini.api_key.clone(), gemini.model_name.clone())
            }
            BackendKind::CaptionOnly => {
                let hf = secrets.huggingface.as_ref().ok_or_else(|| {
                    GlimpseError::configuration_missing("Hugging Face API token (HF_API_TOKEN)")
                })?;
                (hf.api_token.clone(), hf.model_name.clone())
            }
        };

        if api_key.trim().is_empty() {
            return Err(GlimpseError::configuration_missing(format!(
                "API key for backend '{}' is empty",
                app.backend_kind
            )));
        }

        if app.request_timeout_secs == 0 {
            return Err(GlimpseError::config("request_timeout_secs must be greater than 0"));
        }
        if app.analysis_budget_secs == Some(0) {
            return Err(GlimpseError::config("analysis_budget_secs must be greater than 0"));
        }

        let model_name = app
            .model_name
            .clone()
            .or(secret_model)
            .unwrap_or_else(|| app.backend_kind.default_model().to_string());

        Ok(Self {
            backend_kind: app.backend_kind,
            api_key,
            model_name,
            endpoint_url: app.endpoint_url.clone(),
            settings: GatewaySettings {
                request_timeout: Duration::from_secs(app.request_timeout_secs),
                analysis_budget: app.analysis_budget_secs.map(Duration::from_secs),
            },
        })
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("backend_kind", &self.backend_kind)
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("endpoint_url", &self.endpoint_url)
            .field("settings", &self.settings)
            .finish()
    }
}
