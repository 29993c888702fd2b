//! HTTP backends for the inference gateway.
//!
//! - [`GeminiBackend`] implements [`VisionChatBackend`](glimpse_core::inference::VisionChatBackend)
//! - [`HuggingFaceCaptionBackend`] implements [`CaptionBackend`](glimpse_core::inference::CaptionBackend)
//!
//! [`ConfiguredGateway`] picks one of them from a resolved [`GatewayConfig`].

pub mod gemini_backend;
pub mod huggingface_caption_backend;
mod http;

pub use gemini_backend::GeminiBackend;
pub use huggingface_caption_backend::HuggingFaceCaptionBackend;

use glimpse_core::config::{BackendKind, GatewayConfig};
use glimpse_core::inference::{CaptionGateway, VisionChatGateway};
use std::sync::Arc;

/// The gateway selected by configuration.
///
/// The variants keep their concrete types so chat stays available only where
/// the backend supports it.
#[derive(Clone)]
pub enum ConfiguredGateway {
    VisionChat(VisionChatGateway<GeminiBackend>),
    CaptionOnly(CaptionGateway<HuggingFaceCaptionBackend>),
}

impl ConfiguredGateway {
    /// Builds the backend named by `config.backend_kind`.
    ///
    /// `endpoint_url` replaces the Gemini base URL or the full Hugging Face
    /// model URL. The per-call timeout is applied on the HTTP client as well as
    /// by the gateway.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let timeout = config.settings.request_timeout;

        match config.backend_kind {
            BackendKind::VisionChat => {
                let mut backend =
                    GeminiBackend::new(config.api_key.clone(), config.model_name.clone())
                        .with_timeout(timeout);
                if let Some(url) = &config.endpoint_url {
                    backend = backend.with_base_url(url.clone());
                }
                tracing::info!(model = %config.model_name, "Using Gemini vision-chat backend");
                ConfiguredGateway::VisionChat(VisionChatGateway::new(
                    Arc::new(backend),
                    config.settings,
                ))
            }
            BackendKind::CaptionOnly => {
                let backend = match &config.endpoint_url {
                    Some(url) => HuggingFaceCaptionBackend::with_endpoint(
                        config.api_key.clone(),
                        url.clone(),
                    ),
                    None => {
                        HuggingFaceCaptionBackend::new(config.api_key.clone(), &config.model_name)
                    }
                }
                .with_timeout(timeout);
                tracing::info!(
                    endpoint = backend.endpoint_url(),
                    "Using Hugging Face caption-only backend"
                );
                ConfiguredGateway::CaptionOnly(CaptionGateway::new(
                    Arc::new(backend),
                    config.settings,
                ))
            }
        }
    }

    pub fn backend_kind(&self) -> BackendKind {
        match self {
            ConfiguredGateway::VisionChat(_) => BackendKind::VisionChat,
            ConfiguredGateway::CaptionOnly(_) => BackendKind::CaptionOnly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimpse_core::inference::GatewaySettings;
    use std::time::Duration;

    fn config(kind: BackendKind, endpoint_url: Option<&str>) -> GatewayConfig {
        GatewayConfig {
            backend_kind: kind,
            api_key: "key".into(),
            model_name: kind.default_model().into(),
            endpoint_url: endpoint_url.map(str::to_string),
            settings: GatewaySettings {
                request_timeout: Duration::from_secs(5),
                analysis_budget: None,
            },
        }
    }

    #[test]
    fn test_vision_chat_from_config() {
        let gateway = ConfiguredGateway::from_config(&config(BackendKind::VisionChat, None));
        assert_eq!(gateway.backend_kind(), BackendKind::VisionChat);
        match gateway {
            ConfiguredGateway::VisionChat(g) => {
                assert_eq!(g.settings().request_timeout, Duration::from_secs(5));
            }
            ConfiguredGateway::CaptionOnly(_) => panic!("expected vision chat"),
        }
    }

    #[test]
    fn test_caption_only_from_config() {
        let gateway = ConfiguredGateway::from_config(&config(
            BackendKind::CaptionOnly,
            Some("http://127.0.0.1:9/caption"),
        ));
        assert_eq!(gateway.backend_kind(), BackendKind::CaptionOnly);
        assert!(!gateway.backend_kind().supports_chat());
    }
}
