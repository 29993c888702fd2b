//! Inference gateway: backend capability traits, tagged replies and the
//! gateways that normalize one into the other.

mod backend;
mod gateway;
mod outcome;
mod prompts;

pub use backend::{CaptionBackend, ImageInput, VisionChatBackend};
pub use gateway::{
    CaptionGateway, ChatResponder, DEFAULT_REQUEST_TIMEOUT, GatewaySettings, ImageAnalyzer,
    VisionChatGateway,
};
pub use outcome::{BackendError, DEGRADED_ECHO_CHARS, InferenceReply, ReplyKind};
pub use prompts::{AnalysisField, CAPTION_PROMPT};
