//! Core domain for Glimpse: the per-user session state model and the inference
//! gateway contract that fills it.

pub mod config;
pub mod error;
pub mod inference;
pub mod secret;
pub mod session;

// Re-export common error type
pub use error::{GlimpseError, Result};
