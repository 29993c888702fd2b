use glimpse_core::session::Session;
use glimpse_core::{GlimpseError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::service::ImageChatService;

/// Short description of an open session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub created_at: String,
    pub image_count: usize,
    pub message_count: usize,
}

/// Registry of open sessions.
///
/// `SessionManager` is responsible for:
/// - Creating sessions, each with its own copy of the gateway
/// - Looking sessions up by id
/// - Closing sessions, which cancels their in-flight requests
///
/// Sessions are never shared between users; each caller holds the handle
/// returned by [`create_session`](SessionManager::create_session).
pub struct SessionManager<G> {
    sessions: Arc<RwLock<HashMap<String, Arc<ImageChatService<G>>>>>,
    gateway: G,
}

impl<G: Clone> SessionManager<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            gateway,
        }
    }

    /// Creates an empty session with a fresh id.
    pub async fn create_session(&self) -> Arc<ImageChatService<G>> {
        let session_id = uuid::Uuid::new_v4().to_string();
        let service = Arc::new(ImageChatService::new(
            Session::new(session_id.clone()),
            self.gateway.clone(),
        ));

        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id.clone(), service.clone());
        tracing::info!(session_id = %session_id, "Session created");

        service
    }

    /// Returns the session with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`GlimpseError::NotFound`] if no such session is open.
    pub async fn get_session(&self, session_id: &str) -> Result<Arc<ImageChatService<G>>> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| GlimpseError::not_found("Session", session_id))
    }

    /// Removes a session and cancels its in-flight request.
    ///
    /// # Errors
    ///
    /// Returns [`GlimpseError::NotFound`] if no such session is open.
    pub async fn close_session(&self, session_id: &str) -> Result<()> {
        let removed = self.sessions.write().await.remove(session_id);
        let service = removed.ok_or_else(|| GlimpseError::not_found("Session", session_id))?;

        service.close();
        tracing::info!(session_id = %session_id, "Session closed");
        Ok(())
    }

    /// Lists open sessions, oldest first.
    pub async fn list_sessions(&self) -> Vec<SessionSummary> {
        let services: Vec<_> = self.sessions.read().await.values().cloned().collect();

        let mut summaries = Vec::with_capacity(services.len());
        for service in services {
            let session = service.snapshot().await;
            summaries.push(SessionSummary {
                id: session.id().to_string(),
                created_at: session.created_at().to_string(),
                image_count: session.images().len(),
                message_count: session.chat_history().len(),
            });
        }
        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        summaries
    }
}
