//! HuggingFaceCaptionBackend - raw HTTP client for hosted image-captioning models.
//!
//! The image bytes are the request body. A successful response is a JSON array
//! of `{"generated_text": ...}` objects; failures come back as an object with an
//! `error` field (and `estimated_time` while the model is loading).

use async_trait::async_trait;
use glimpse_core::inference::{BackendError, CaptionBackend, DEFAULT_REQUEST_TIMEOUT, ImageInput};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::http::{build_client, classify_status, classify_transport};

pub const DEFAULT_HF_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Caption-only backend for the Hugging Face inference API.
#[derive(Clone)]
pub struct HuggingFaceCaptionBackend {
    client: Client,
    api_token: String,
    endpoint_url: String,
}

impl HuggingFaceCaptionBackend {
    /// Creates a backend for `model` on the public inference API.
    pub fn new(api_token: impl Into<String>, model: &str) -> Self {
        Self::with_endpoint(api_token, format!("{DEFAULT_HF_BASE_URL}/{model}"))
    }

    /// Creates a backend that posts to an explicit endpoint URL.
    pub fn with_endpoint(api_token: impl Into<String>, endpoint_url: impl Into<String>) -> Self {
        Self {
            client: build_client(DEFAULT_REQUEST_TIMEOUT),
            api_token: api_token.into(),
            endpoint_url: endpoint_url.into(),
        }
    }

    /// Applies a client-side timeout to every request (30s by default).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
}

#[async_trait]
impl CaptionBackend for HuggingFaceCaptionBackend {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn caption(&self, image: &ImageInput) -> Result<String, BackendError> {
        let response = self
            .client
            .post(&self.endpoint_url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_token))
            .header(CONTENT_TYPE, image.mime_type.as_str())
            .body(image.bytes.to_vec())
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_transport)?;
        parse_caption_response(status, &body)
    }
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: serde_json::Value,
    #[serde(default)]
    estimated_time: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CaptionResponse {
    Captions(Vec<GeneratedText>),
    Error(ErrorResponse),
}

/// Interprets a captioning response body.
fn parse_caption_response(status: StatusCode, body: &str) -> Result<String, BackendError> {
    let parsed = serde_json::from_str::<CaptionResponse>(body);

    match parsed {
        Ok(CaptionResponse::Captions(captions)) if status.is_success() => captions
            .into_iter()
            .find_map(|c| c.generated_text)
            .ok_or_else(|| {
                BackendError::MalformedResponse("caption list contained no generated_text".into())
            }),
        Ok(CaptionResponse::Error(err)) => Err(map_error_body(status, err)),
        Ok(CaptionResponse::Captions(_)) => Err(classify_status(status, body.to_string())),
        Err(_) if !status.is_success() => Err(classify_status(status, body.to_string())),
        Err(err) => Err(BackendError::MalformedResponse(format!(
            "invalid caption JSON: {err}"
        ))),
    }
}

fn map_error_body(status: StatusCode, err: ErrorResponse) -> BackendError {
    let message = match err.error {
        serde_json::Value::String(message) => message,
        other => other.to_string(),
    };
    let lower = message.to_lowercase();

    if status == StatusCode::SERVICE_UNAVAILABLE || lower.contains("currently loading") {
        BackendError::ModelLoading {
            estimated_time: err.estimated_time,
        }
    } else if status == StatusCode::TOO_MANY_REQUESTS
        || lower.contains("rate limit")
        || lower.contains("quota")
    {
        BackendError::QuotaExceeded(message)
    } else if status.is_success() {
        BackendError::MalformedResponse(message)
    } else {
        classify_status(status, message)
    }
}
