//! Inference gateways.
//!
//! A gateway wraps one backend and turns every call into an [`InferenceReply`].
//! Nothing a backend does (errors, hangs, garbage payloads) escapes as an error.
//!
//! Capabilities are expressed as traits:
//!
//! - [`ImageAnalyzer`] is implemented by both gateways.
//! - [`ChatResponder`] is implemented only by [`VisionChatGateway`], so code
//!   that needs chat cannot be handed a caption-only gateway.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use super::backend::{CaptionBackend, ImageInput, VisionChatBackend};
use super::outcome::{BackendError, InferenceReply};
use super::prompts::{AnalysisField, CAPTION_PROMPT};
use crate::session::{Analysis, Annotation};

/// Default per-call timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timing limits applied by a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewaySettings {
    /// Upper bound for a single backend call
    pub request_timeout: Duration,
    /// Optional upper bound for a whole analysis fan-out
    pub analysis_budget: Option<Duration>,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            analysis_budget: None,
        }
    }
}

/// Produces an annotation for an image.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    async fn analyze(&self, image: &ImageInput) -> Annotation;
}

/// Answers a chat turn, optionally grounded in an image.
#[async_trait]
pub trait ChatResponder: Send + Sync {
    async fn chat(&self, message: &str, grounding: Option<&ImageInput>) -> InferenceReply;
}

fn log_reply(backend: &str, purpose: &str, reply: &InferenceReply) {
    if reply.is_answer() {
        tracing::debug!(backend, purpose, chars = reply.text.len(), "Inference call succeeded");
    } else {
        tracing::warn!(
            backend,
            purpose,
            kind = reply.kind.label(),
            "Inference call returned a placeholder"
        );
    }
}

async fn bounded<F>(limit: Duration, call: F) -> Result<String, BackendError>
where
    F: std::future::Future<Output = Result<String, BackendError>>,
{
    match timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(BackendError::Timeout),
    }
}

// ============================================================================
// Vision chat
// ============================================================================

/// Gateway over a [`VisionChatBackend`]: four-field analysis and chat.
pub struct VisionChatGateway<B: ?Sized> {
    backend: Arc<B>,
    settings: GatewaySettings,
}

impl<B: ?Sized> Clone for VisionChatGateway<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            settings: self.settings,
        }
    }
}

impl<B: VisionChatBackend + ?Sized> VisionChatGateway<B> {
    pub fn new(backend: Arc<B>, settings: GatewaySettings) -> Self {
        Self { backend, settings }
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    async fn call(
        &self,
        purpose: &str,
        prompt: &str,
        image: Option<&ImageInput>,
    ) -> InferenceReply {
        let limit = self.settings.request_timeout;
        let result = bounded(limit, self.backend.generate(prompt, image)).await;
        let reply = InferenceReply::from_backend(result, prompt, limit);
        log_reply(self.backend.name(), purpose, &reply);
        reply
    }

    async fn fan_out(&self, image: &ImageInput) -> Analysis {
        let (description, caption, tags, story) = tokio::join!(
            self.call("description", AnalysisField::Description.prompt(), Some(image)),
            self.call("caption", AnalysisField::Caption.prompt(), Some(image)),
            self.call("tags", AnalysisField::Tags.prompt(), Some(image)),
            self.call("story", AnalysisField::Story.prompt(), Some(image)),
        );
        Analysis {
            description,
            caption,
            tags,
            story,
        }
    }
}

#[async_trait]
impl<B: VisionChatBackend + ?Sized> ImageAnalyzer for VisionChatGateway<B> {
    async fn analyze(&self, image: &ImageInput) -> Annotation {
        let analysis = match self.settings.analysis_budget {
            Some(budget) => match timeout(budget, self.fan_out(image)).await {
                Ok(analysis) => analysis,
                Err(_) => {
                    tracing::warn!(
                        backend = self.backend.name(),
                        budget_secs = budget.as_secs(),
                        "Analysis exceeded its time budget"
                    );
                    Analysis::uniform(InferenceReply::timed_out(budget))
                }
            },
            None => self.fan_out(image).await,
        };
        Annotation::Analysis(analysis)
    }
}

#[async_trait]
impl<B: VisionChatBackend + ?Sized> ChatResponder for VisionChatGateway<B> {
    async fn chat(&self, message: &str, grounding: Option<&ImageInput>) -> InferenceReply {
        self.call("chat", message, grounding).await
    }
}

// ============================================================================
// Caption only
// ============================================================================

/// Gateway over a [`CaptionBackend`]. Analysis only; there is no chat.
pub struct CaptionGateway<B: ?Sized> {
    backend: Arc<B>,
    settings: GatewaySettings,
}

impl<B: ?Sized> Clone for CaptionGateway<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            settings: self.settings,
        }
    }
}

impl<B: CaptionBackend + ?Sized> CaptionGateway<B> {
    pub fn new(backend: Arc<B>, settings: GatewaySettings) -> Self {
        Self { backend, settings }
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }
}

#[async_trait]
impl<B: CaptionBackend + ?Sized> ImageAnalyzer for CaptionGateway<B> {
    async fn analyze(&self, image: &ImageInput) -> Annotation {
        let limit = self.settings.request_timeout;
        let result = bounded(limit, self.backend.caption(image)).await;
        let reply = InferenceReply::from_backend(result, CAPTION_PROMPT, limit);
        log_reply(self.backend.name(), "caption", &reply);
        Annotation::Caption(reply)
    }
}
