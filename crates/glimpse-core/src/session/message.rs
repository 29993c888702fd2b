//! Chat transcript types.

use serde::{Deserialize, Serialize};

use crate::inference::{InferenceReply, ReplyKind};

/// Who said a line in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    /// Message typed by the user.
    User,
    /// Reply produced through the inference gateway.
    Assistant,
}

impl Speaker {
    /// Label shown in front of each transcript line.
    pub fn label(self) -> &'static str {
        match self {
            Speaker::User => "You",
            Speaker::Assistant => "Bot",
        }
    }
}

/// A single line in the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub speaker: Speaker,
    pub text: String,
    /// Outcome tag for assistant replies; `None` for user lines.
    pub kind: Option<ReplyKind>,
    /// Timestamp when the entry was appended (ISO 8601 format).
    pub timestamp: String,
}

impl ChatEntry {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            kind: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Assistant entry carrying the reply's outcome tag.
    pub fn from_reply(reply: InferenceReply) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: reply.text,
            kind: Some(reply.kind),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Speaker and text, the shape the transcript is usually compared in.
    pub fn pair(&self) -> (Speaker, &str) {
        (self.speaker, self.text.as_str())
    }
}
