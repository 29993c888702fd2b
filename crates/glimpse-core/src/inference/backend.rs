//! Backend capability traits.
//!
//! A backend is one hosted inference API. A caption-only service implements
//! [`CaptionBackend`] and nothing else, so it can never end up behind a chat box.

use async_trait::async_trait;
use std::sync::Arc;

use super::outcome::BackendError;

/// Image payload handed to a backend.
///
/// The bytes are shared, not copied, between the session and concurrent calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub bytes: Arc<[u8]>,
    pub mime_type: String,
}

impl ImageInput {
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// A generative vision-language model: free-text prompt plus optional image in,
/// free text out.
#[async_trait]
pub trait VisionChatBackend: Send + Sync {
    /// Human-readable backend name used in logs.
    fn name(&self) -> &str;

    /// Sends one prompt, optionally grounded in an image.
    async fn generate(
        &self,
        prompt: &str,
        image: Option<&ImageInput>,
    ) -> Result<String, BackendError>;
}

/// An image-captioning model: image bytes in, one caption out.
#[async_trait]
pub trait CaptionBackend: Send + Sync {
    /// Human-readable backend name used in logs.
    fn name(&self) -> &str;

    async fn caption(&self, image: &ImageInput) -> Result<String, BackendError>;
}

#[async_trait]
impl<T: VisionChatBackend + ?Sized> VisionChatBackend for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn generate(
        &self,
        prompt: &str,
        image: Option<&ImageInput>,
    ) -> Result<String, BackendError> {
        (**self).generate(prompt, image).await
    }
}

#[async_trait]
impl<T: CaptionBackend + ?Sized> CaptionBackend for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn caption(&self, image: &ImageInput) -> Result<String, BackendError> {
        (**self).caption(image).await
    }
}
