//! Tagged inference replies.
//!
//! Every backend call ends in exactly one [`InferenceReply`]: either the model's
//! answer or a placeholder describing why there is no answer. Placeholders are
//! stored and rendered like answers; only [`ReplyKind`] tells them apart.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Maximum number of prompt characters echoed back in a degraded reply.
pub const DEGRADED_ECHO_CHARS: usize = 100;

const DEGRADED_PREFIX: &str = "[Offline Mode] (Simulated answer)";

/// Failure reported by a backend implementation.
///
/// Backends classify transport and API errors into these variants; the
/// gateway converts each one into the matching placeholder reply.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Rate limit or quota exhausted
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Model is cold-starting (HTTP 503 style)
    #[error("Model is loading")]
    ModelLoading {
        /// Seconds until the model is expected to be ready, when the API says so
        estimated_time: Option<f64>,
    },

    /// No response within the allowed time
    #[error("Request timed out")]
    Timeout,

    /// Payload could not be read (bad JSON, empty result list, unexpected status)
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Connection, DNS or TLS failure
    #[error("Network error: {0}")]
    Network(String),
}

/// Outcome tag carried by every reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    /// Text produced by the model
    Answer,
    /// Quota exhausted; the text is a truncated echo of the prompt
    QuotaExceeded,
    /// Backend cold start; try again shortly
    ModelLoading,
    /// No response in time
    TimedOut,
    /// Response could not be interpreted
    MalformedResponse,
    /// Backend unreachable
    NetworkError,
}

impl ReplyKind {
    /// Short label for display next to a placeholder.
    pub fn label(self) -> &'static str {
        match self {
            ReplyKind::Answer => "answer",
            ReplyKind::QuotaExceeded => "degraded",
            ReplyKind::ModelLoading => "model loading",
            ReplyKind::TimedOut => "timed out",
            ReplyKind::MalformedResponse => "unexpected response",
            ReplyKind::NetworkError => "network error",
        }
    }
}

/// A renderable reply: outcome tag plus text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceReply {
    pub kind: ReplyKind,
    pub text: String,
}

impl InferenceReply {
    /// A real answer from the model, kept verbatim.
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Answer,
            text: text.into(),
        }
    }

    /// Degraded placeholder echoing the first characters of `prompt`.
    pub fn degraded(prompt: &str) -> Self {
        let echo: String = prompt.chars().take(DEGRADED_ECHO_CHARS).collect();
        Self {
            kind: ReplyKind::QuotaExceeded,
            text: format!("{DEGRADED_PREFIX} {echo}..."),
        }
    }

    pub fn model_loading(estimated_time: Option<f64>) -> Self {
        let text = match estimated_time {
            Some(secs) if secs.is_finite() && secs > 0.0 => format!(
                "[Model Loading] The model is starting up (about {:.0}s). Please try again shortly.",
                secs.ceil()
            ),
            _ => "[Model Loading] The model is starting up. Please try again shortly.".to_string(),
        };
        Self {
            kind: ReplyKind::ModelLoading,
            text,
        }
    }

    pub fn timed_out(after: Duration) -> Self {
        Self {
            kind: ReplyKind::TimedOut,
            text: format!(
                "[Timed Out] The model did not respond within {}s.",
                after.as_secs()
            ),
        }
    }

    pub fn malformed(detail: impl fmt::Display) -> Self {
        Self {
            kind: ReplyKind::MalformedResponse,
            text: format!(
                "[Unexpected Response] The model returned something unreadable: {detail}"
            ),
        }
    }

    pub fn network_error(cause: impl fmt::Display) -> Self {
        Self {
            kind: ReplyKind::NetworkError,
            text: format!("[Network Error] Could not reach the inference service: {cause}"),
        }
    }

    /// Normalizes a backend result into a reply.
    ///
    /// `prompt` is echoed for degraded replies, `timeout` is reported when the
    /// backend itself gave up waiting.
    pub fn from_backend(
        result: Result<String, BackendError>,
        prompt: &str,
        timeout: Duration,
    ) -> Self {
        match result {
            Ok(text) => Self::answer(text),
            Err(BackendError::QuotaExceeded(_)) => Self::degraded(prompt),
            Err(BackendError::ModelLoading { estimated_time }) => {
                Self::model_loading(estimated_time)
            }
            Err(BackendError::Timeout) => Self::timed_out(timeout),
            Err(BackendError::MalformedResponse(detail)) => Self::malformed(detail),
            Err(BackendError::Network(cause)) => Self::network_error(cause),
        }
    }

    pub fn is_answer(&self) -> bool {
        self.kind == ReplyKind::Answer
    }

    /// True when the text reflects the model's output, including the
    /// degraded echo. Model-loading, timeout and error placeholders are not.
    pub fn is_model_output(&self) -> bool {
        matches!(self.kind, ReplyKind::Answer | ReplyKind::QuotaExceeded)
    }
}

impl fmt::Display for InferenceReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
