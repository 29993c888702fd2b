//! Uploaded images and accepted file types.

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use super::annotation::Annotation;
use crate::inference::ImageInput;

/// File extensions accepted for upload.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

const FALLBACK_MIME_TYPE: &str = "image/jpeg";

/// Returns true when `name` ends in one of [`SUPPORTED_EXTENSIONS`] (case-insensitive).
pub fn is_supported_image(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Infers the MIME type from a file name, falling back to `image/jpeg`.
pub fn infer_mime_type(name: &str) -> String {
    mime_guess::from_path(name)
        .first()
        .filter(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string())
}

/// An image uploaded into a session.
///
/// The payload is fixed at construction; only the annotation changes, once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedImage {
    name: String,
    #[serde(skip)]
    bytes: Arc<[u8]>,
    mime_type: String,
    annotation: Option<Annotation>,
    /// Timestamp when the image was uploaded (ISO 8601 format).
    uploaded_at: String,
}

impl UploadedImage {
    pub(crate) fn new(name: String, bytes: Arc<[u8]>) -> Self {
        let mime_type = infer_mime_type(&name);
        Self {
            name,
            bytes,
            mime_type,
            annotation: None,
            uploaded_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn annotation(&self) -> Option<&Annotation> {
        self.annotation.as_ref()
    }

    pub fn is_annotated(&self) -> bool {
        self.annotation.is_some()
    }

    pub fn uploaded_at(&self) -> &str {
        &self.uploaded_at
    }

    /// Payload for a backend call. Shares the bytes instead of copying them.
    pub fn to_input(&self) -> ImageInput {
        ImageInput {
            bytes: Arc::clone(&self.bytes),
            mime_type: self.mime_type.clone(),
        }
    }

    pub(crate) fn set_annotation(&mut self, annotation: Annotation) {
        self.annotation = Some(annotation);
    }
}
