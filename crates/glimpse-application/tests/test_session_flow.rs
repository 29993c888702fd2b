//! End-to-end session flows over fake backends.

use async_trait::async_trait;
use glimpse_application::{ImageChatService, SessionManager};
use glimpse_core::GlimpseError;
use glimpse_core::inference::{
    AnalysisField, BackendError, CaptionBackend, CaptionGateway, GatewaySettings, ImageInput,
    InferenceReply, ReplyKind, VisionChatBackend, VisionChatGateway,
};
use glimpse_core::session::{Analysis, Annotation, Session, Speaker};
use std::sync::Arc;
use tokio::sync::Notify;

/// Answers every prompt with the same text.
struct Constant(&'static str);

#[async_trait]
impl VisionChatBackend for Constant {
    fn name(&self) -> &str {
        "constant"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _image: Option<&ImageInput>,
    ) -> Result<String, BackendError> {
        Ok(self.0.to_string())
    }
}

/// Answers with the prompt itself.
struct Echo;

#[async_trait]
impl VisionChatBackend for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate(
        &self,
        prompt: &str,
        _image: Option<&ImageInput>,
    ) -> Result<String, BackendError> {
        Ok(prompt.to_string())
    }
}

/// Always reports an exhausted quota.
struct OverQuota;

#[async_trait]
impl VisionChatBackend for OverQuota {
    fn name(&self) -> &str {
        "over-quota"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _image: Option<&ImageInput>,
    ) -> Result<String, BackendError> {
        Err(BackendError::QuotaExceeded("daily limit".into()))
    }
}

/// Never finishes an analysis prompt; echoes anything else.
struct StuckAnalysis {
    started: Notify,
}

#[async_trait]
impl VisionChatBackend for StuckAnalysis {
    fn name(&self) -> &str {
        "stuck-analysis"
    }

    async fn generate(
        &self,
        prompt: &str,
        _image: Option<&ImageInput>,
    ) -> Result<String, BackendError> {
        if is_analysis_prompt(prompt) {
            self.started.notify_one();
            std::future::pending::<()>().await;
        }
        Ok(prompt.to_string())
    }
}

/// Answers analysis prompts at once; holds chat turns until released.
struct HeldChat {
    started: Notify,
    release: Notify,
}

fn is_analysis_prompt(prompt: &str) -> bool {
    AnalysisField::ALL.iter().any(|field| field.prompt() == prompt)
}

#[async_trait]
impl VisionChatBackend for HeldChat {
    fn name(&self) -> &str {
        "held-chat"
    }

    async fn generate(
        &self,
        prompt: &str,
        _image: Option<&ImageInput>,
    ) -> Result<String, BackendError> {
        if !is_analysis_prompt(prompt) {
            self.started.notify_one();
            self.release.notified().await;
        }
        Ok(prompt.to_string())
    }
}

struct FixedCaption;

#[async_trait]
impl CaptionBackend for FixedCaption {
    fn name(&self) -> &str {
        "fixed-caption"
    }

    async fn caption(&self, _image: &ImageInput) -> Result<String, BackendError> {
        Ok("a cat on a sofa".into())
    }
}

fn vision<B: VisionChatBackend + 'static>(backend: B) -> ImageChatService<VisionChatGateway<B>> {
    ImageChatService::new(
        Session::new("test"),
        VisionChatGateway::new(Arc::new(backend), GatewaySettings::default()),
    )
}

#[tokio::test]
async fn test_upload_runs_four_field_analysis() {
    let service = vision(Constant("X"));

    let outcome = service.upload_image("cat.jpg", vec![0xFFu8, 0xD8]).await.unwrap();
    assert_eq!(outcome.index, 0);

    let session = service.snapshot().await;
    assert_eq!(session.active_index(), Some(0));
    assert_eq!(
        session.images()[0].annotation(),
        Some(&Annotation::Analysis(Analysis::uniform(InferenceReply::answer("X"))))
    );
    assert_eq!(session.images()[0].mime_type(), "image/jpeg");
}

#[tokio::test]
async fn test_chat_without_image_echoes() {
    let service = vision(Echo);

    service.send_message("hello").await.unwrap();

    let session = service.snapshot().await;
    let transcript: Vec<_> = session.chat_history().iter().map(|e| e.pair()).collect();
    assert_eq!(
        transcript,
        vec![(Speaker::User, "hello"), (Speaker::Assistant, "hello")]
    );
}

#[tokio::test]
async fn test_quota_exceeded_chat_is_stored_as_degraded_reply() {
    let service = vision(OverQuota);

    let reply = service.send_message("hi").await.unwrap();
    assert_eq!(reply.kind, ReplyKind::QuotaExceeded);

    let session = service.snapshot().await;
    let last = session.chat_history().last().unwrap();
    assert_eq!(last.speaker, Speaker::Assistant);
    assert_eq!(last.kind, Some(ReplyKind::QuotaExceeded));
    assert!(last.text.contains("hi"));
    assert!(last.text.starts_with("[Offline Mode] (Simulated answer)"));
}

#[tokio::test]
async fn test_caption_only_upload_stores_caption() {
    let service = ImageChatService::new(
        Session::new("caption"),
        CaptionGateway::new(Arc::new(FixedCaption), GatewaySettings::default()),
    );

    service.upload_image("cat.png", vec![1u8]).await.unwrap();

    let session = service.snapshot().await;
    assert_eq!(
        session.active_image().and_then(|image| image.annotation()),
        Some(&Annotation::Caption(InferenceReply::answer("a cat on a sofa")))
    );
}

#[tokio::test]
async fn test_new_request_cancels_pending_analysis() {
    let backend = Arc::new(StuckAnalysis {
        started: Notify::new(),
    });
    let service = Arc::new(ImageChatService::new(
        Session::new("cancel"),
        VisionChatGateway::new(backend.clone(), GatewaySettings::default()),
    ));

    let upload = tokio::spawn({
        let service = service.clone();
        async move { service.upload_image("cat.jpg", vec![1u8, 2, 3]).await }
    });
    backend.started.notified().await;

    let reply = service.send_message("hello").await.unwrap();
    assert_eq!(reply, InferenceReply::answer("hello"));

    let upload_result = upload.await.unwrap();
    assert_eq!(upload_result.unwrap_err(), GlimpseError::Cancelled);

    let session = service.snapshot().await;
    assert_eq!(session.images().len(), 1);
    assert!(session.images()[0].annotation().is_none());
    assert_eq!(session.chat_history().len(), 2);
}

#[tokio::test]
async fn test_rejected_duplicate_upload_keeps_pending_chat() {
    let backend = Arc::new(HeldChat {
        started: Notify::new(),
        release: Notify::new(),
    });
    let service = Arc::new(ImageChatService::new(
        Session::new("duplicate"),
        VisionChatGateway::new(backend.clone(), GatewaySettings::default()),
    ));
    service.upload_image("cat.jpg", vec![1u8]).await.unwrap();

    let chat = tokio::spawn({
        let service = service.clone();
        async move { service.send_message("hello").await }
    });
    backend.started.notified().await;

    let err = service.upload_image("cat.jpg", vec![2u8]).await.unwrap_err();
    assert!(err.is_duplicate_name());

    backend.release.notify_one();
    let reply = chat.await.unwrap().unwrap();
    assert_eq!(reply, InferenceReply::answer("hello"));

    let session = service.snapshot().await;
    assert_eq!(session.images().len(), 1);
    let transcript: Vec<_> = session.chat_history().iter().map(|e| e.pair()).collect();
    assert_eq!(
        transcript,
        vec![(Speaker::User, "hello"), (Speaker::Assistant, "hello")]
    );
}

#[tokio::test]
async fn test_closing_session_cancels_in_flight_upload() {
    let backend = Arc::new(StuckAnalysis {
        started: Notify::new(),
    });
    let manager = SessionManager::new(VisionChatGateway::new(
        backend.clone(),
        GatewaySettings::default(),
    ));
    let service = manager.create_session().await;
    let id = service.session_id().await;

    let upload = tokio::spawn({
        let service = service.clone();
        async move { service.upload_image("dog.webp", vec![9u8]).await }
    });
    backend.started.notified().await;

    manager.close_session(&id).await.unwrap();

    assert!(upload.await.unwrap().unwrap_err().is_cancelled());
    assert!(manager.list_sessions().await.is_empty());
}

#[tokio::test]
async fn test_upload_file_from_disk() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("beach.png");
    std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

    let service = vision(Constant("sand"));
    let outcome = service.upload_file(&path).await.unwrap();
    assert_eq!(outcome.name, "beach.png");

    let session = service.snapshot().await;
    assert_eq!(session.images()[0].bytes(), &[0x89, b'P', b'N', b'G']);
    assert_eq!(session.images()[0].mime_type(), "image/png");
}
