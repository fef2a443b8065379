// Shared HTTP plumbing for the hotel and weather clients

use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

// Errors surfaced by the external API clients
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("API error: {status_code} - {message}")]
    ApiResponseError {
        status_code: u16,
        message: String,
        is_retryable: bool,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl ApiError {
    /// Whether the same request could succeed later; reported alongside the failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::NetworkError(_) | ApiError::Timeout(_) => true,
            ApiError::ApiResponseError { is_retryable, .. } => *is_retryable,
            ApiError::MalformedResponse(_) | ApiError::Other(_) => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else if err.is_decode() {
            ApiError::MalformedResponse(err.to_string())
        } else {
            ApiError::NetworkError(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

// Connection settings for one external API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    // None leaves the transport's own default in place
    pub timeout_ms: Option<u64>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_ms: None,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ClientError> {
        if self.api_key.trim().is_empty() {
            return Err(ClientError::ConfigError("API key must not be empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::ConfigError(format!(
                "Base URL must be http(s): {}",
                self.base_url
            )));
        }
        Ok(())
    }

    pub(crate) fn build_http_client(&self) -> Result<reqwest::Client, ClientError> {
        self.validate()?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_ms) = self.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        builder
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Sends the request and decodes a JSON body, mapping every failure onto `ApiError`.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let message = status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string();
        return Err(ApiError::ApiResponseError {
            status_code: status.as_u16(),
            message,
            is_retryable: status.is_server_error() || status.as_u16() == 429,
        });
    }

    let body: Bytes = response.bytes().await?;
    decode_json(&body)
}

pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}
