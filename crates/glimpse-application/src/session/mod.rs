//! Session application services.
//!
//! This module contains the per-session use cases and the registry that owns
//! open sessions.

mod in_flight;
mod manager;
mod service;

pub use manager::{SessionManager, SessionSummary};
pub use service::{ImageChatService, UploadOutcome};
