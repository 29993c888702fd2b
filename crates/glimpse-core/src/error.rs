//! Error types for the Glimpse application.

use thiserror::Error;

/// A shared error type for the entire Glimpse application.
///
/// Backend failures are not represented here: the inference gateway turns
/// them into tagged replies (see [`crate::inference::InferenceReply`]) before
/// anything reaches the session state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlimpseError {
    /// A required configuration value (API key, model, endpoint) is missing.
    #[error("Missing configuration: {0}")]
    ConfigurationMissing(String),

    /// Configuration is present but invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// An image with the same name is already part of the session
    #[error("Image '{name}' has already been uploaded")]
    DuplicateName { name: String },

    /// Index does not point at an uploaded image
    #[error("Image index {index} is out of range (session holds {len} images)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The image already carries an annotation; annotations are written once.
    #[error("Image at index {index} is already annotated")]
    AnnotationAlreadySet { index: usize },

    /// File extension is not one of the accepted image types
    #[error("Unsupported image type: '{name}' (expected png, jpg, jpeg or webp)")]
    UnsupportedImageType { name: String },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// The in-flight request was cancelled before it completed
    #[error("Request cancelled")]
    Cancelled,

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GlimpseError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a ConfigurationMissing error
    pub fn configuration_missing(what: impl Into<String>) -> Self {
        Self::ConfigurationMissing(what.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a DuplicateName error
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error must stop startup
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ConfigurationMissing(_) | Self::Config(_))
    }

    /// Check if this is a DuplicateName error
    pub fn is_duplicate_name(&self) -> bool {
        matches!(self, Self::DuplicateName { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for GlimpseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for GlimpseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for GlimpseError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for GlimpseError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error
impl From<anyhow::Error> for GlimpseError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, GlimpseError>`.
pub type Result<T> = std::result::Result<T, GlimpseError>;
