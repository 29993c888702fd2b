//! Application layer for Glimpse.
//!
//! This crate coordinates the session state model and the inference gateway:
//! uploads are analyzed, chat turns are answered, and superseded requests are
//! cancelled before they can write stale results.

pub mod session;

pub use session::{ImageChatService, SessionManager, SessionSummary, UploadOutcome};
