//! Per-session use cases: upload, select, chat.

use glimpse_core::inference::{ChatResponder, ImageAnalyzer, ImageInput, InferenceReply};
use glimpse_core::session::{Annotation, Session, Speaker, is_supported_image};
use glimpse_core::{GlimpseError, Result};
use glimpse_infrastructure::read_image_file;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use super::in_flight::InFlight;

/// Result of a completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub index: usize,
    pub name: String,
    pub annotation: Annotation,
}

/// Drives one [`Session`] through a gateway.
///
/// The gateway type decides what is possible: every gateway can analyze, but
/// [`send_message`](ImageChatService::send_message) only exists when the gateway
/// also implements [`ChatResponder`].
///
/// Only one inference request runs at a time. Starting a new one cancels the
/// previous request, and a cancelled request never writes into the session.
#[derive(Debug)]
pub struct ImageChatService<G> {
    session: RwLock<Session>,
    gateway: G,
    in_flight: InFlight,
}

impl<G> ImageChatService<G> {
    pub fn new(session: Session, gateway: G) -> Self {
        Self {
            session: RwLock::new(session),
            gateway,
            in_flight: InFlight::new(),
        }
    }

    /// Returns a copy of the current session state. Image bytes are shared.
    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn session_id(&self) -> String {
        self.session.read().await.id().to_string()
    }

    /// Makes the image at `index` the one chat turns are grounded in.
    pub async fn select_image(&self, index: usize) -> Result<()> {
        self.session.write().await.select_active(index)?;
        tracing::debug!(index, "Selected active image");
        Ok(())
    }

    /// Cancels any in-flight request. Later requests fail with `Cancelled`.
    pub fn close(&self) {
        self.in_flight.close();
    }

    pub fn is_closed(&self) -> bool {
        self.in_flight.is_closed()
    }

    /// Runs `call` unless `token` is cancelled first.
    async fn run_cancellable<T, F>(token: &CancellationToken, call: F) -> Result<T>
    where
        F: Future<Output = T>,
    {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(GlimpseError::Cancelled),
            value = call => Ok(value),
        }
    }
}

impl<G: ImageAnalyzer> ImageChatService<G> {
    /// Adds an image to the session, makes it active and annotates it.
    ///
    /// # Errors
    ///
    /// - [`GlimpseError::UnsupportedImageType`] if the name is not png, jpg, jpeg or webp
    /// - [`GlimpseError::DuplicateName`] if the name was already uploaded
    /// - [`GlimpseError::Cancelled`] if another request superseded this one;
    ///   the image stays in the session without an annotation
    pub async fn upload_image(
        &self,
        name: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Result<UploadOutcome> {
        let name = name.into();
        if !is_supported_image(&name) {
            return Err(GlimpseError::UnsupportedImageType { name });
        }

        if self.in_flight.is_closed() {
            return Err(GlimpseError::Cancelled);
        }

        // A rejected upload must not supersede the request in flight.
        let (index, input) = {
            let mut session = self.session.write().await;
            let index = session.add_image(name.clone(), bytes)?;
            (index, session.image(index)?.to_input())
        };
        let token = self.in_flight.begin();
        if token.is_cancelled() {
            return Err(GlimpseError::Cancelled);
        }
        tracing::info!(name = %name, index, "Image uploaded, starting analysis");

        let annotation = Self::run_cancellable(&token, self.gateway.analyze(&input)).await?;

        {
            let mut session = self.session.write().await;
            if token.is_cancelled() {
                return Err(GlimpseError::Cancelled);
            }
            session.set_annotation(index, annotation.clone())?;
        }

        if !annotation.is_complete_answer() {
            tracing::warn!(name = %name, "Annotation contains placeholder replies");
        }
        Ok(UploadOutcome {
            index,
            name,
            annotation,
        })
    }

    /// Reads an image from disk and uploads it under its file name.
    pub async fn upload_file(&self, path: &Path) -> Result<UploadOutcome> {
        let file = read_image_file(path).await?;
        self.upload_image(file.name, file.bytes).await
    }
}

impl<G: ChatResponder> ImageChatService<G> {
    /// Appends the user's message, asks the gateway and appends the reply.
    ///
    /// The turn is grounded in the active image when there is one. The user
    /// line is recorded even if the request is later cancelled.
    ///
    /// # Errors
    ///
    /// [`GlimpseError::Cancelled`] if another request superseded this one; no
    /// assistant entry is written in that case.
    pub async fn send_message(&self, text: &str) -> Result<InferenceReply> {
        let token = self.in_flight.begin();
        if token.is_cancelled() {
            return Err(GlimpseError::Cancelled);
        }

        let grounding: Option<ImageInput> = {
            let mut session = self.session.write().await;
            session.append_chat(Speaker::User, text);
            session.active_image().map(|image| image.to_input())
        };
        tracing::debug!(grounded = grounding.is_some(), "Sending chat message");

        let reply =
            Self::run_cancellable(&token, self.gateway.chat(text, grounding.as_ref())).await?;

        let mut session = self.session.write().await;
        if token.is_cancelled() {
            return Err(GlimpseError::Cancelled);
        }
        session.append_reply(reply.clone());
        drop(session);

        if !reply.is_model_output() {
            tracing::warn!(kind = reply.kind.label(), "Chat reply is a placeholder");
        }
        Ok(reply)
    }
}
