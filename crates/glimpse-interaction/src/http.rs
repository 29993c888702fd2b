//! Shared HTTP plumbing: client construction and classification of failures
//! into [`BackendError`].

use glimpse_core::inference::BackendError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Builds a client with a request timeout, falling back to the default client.
pub(crate) fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|err| {
            tracing::warn!("Falling back to default HTTP client: {}", err);
            Client::new()
        })
}

/// Classifies a transport-level failure.
///
/// The URL is stripped first so query parameters never end up in replies or logs.
pub(crate) fn classify_transport(err: reqwest::Error) -> BackendError {
    let err = err.without_url();
    if err.is_timeout() {
        BackendError::Timeout
    } else if err.is_decode() || err.is_body() {
        BackendError::MalformedResponse(err.to_string())
    } else {
        BackendError::Network(err.to_string())
    }
}

/// Classifies a non-success status; `message` is the best error text available.
pub(crate) fn classify_status(status: StatusCode, message: String) -> BackendError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => BackendError::QuotaExceeded(message),
        StatusCode::SERVICE_UNAVAILABLE => BackendError::ModelLoading {
            estimated_time: None,
        },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => BackendError::Timeout,
        _ => BackendError::MalformedResponse(format!("HTTP {}: {message}", status.as_u16())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, "slow down".into()),
            BackendError::QuotaExceeded(msg) if msg == "slow down"
        ));
        assert_eq!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE, String::new()),
            BackendError::ModelLoading {
                estimated_time: None
            }
        );
        assert_eq!(
            classify_status(StatusCode::GATEWAY_TIMEOUT, String::new()),
            BackendError::Timeout
        );
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED, "bad token".into()),
            BackendError::MalformedResponse("HTTP 401: bad token".into())
        );
    }
}
