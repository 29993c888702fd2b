//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: the per-user [`Session`] state and its transitions
//! - `image`: uploaded images and accepted file types
//! - `annotation`: results attached to images (`Annotation`, `Analysis`)
//! - `message`: chat transcript types (`Speaker`, `ChatEntry`)

mod annotation;
mod image;
mod message;
mod model;

// Re-export public API
pub use annotation::{Analysis, Annotation};
pub use image::{SUPPORTED_EXTENSIONS, UploadedImage, infer_mime_type, is_supported_image};
pub use message::{ChatEntry, Speaker};
pub use model::Session;
