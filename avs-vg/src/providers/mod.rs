//! Provider clients
//!
//! Thin request/response wrappers around the external HTTP APIs. Each call
//! issues one request and parses one response; non-success statuses come
//! back as [`ProviderError::Api`] with the provider's status and body.

pub mod speech;
pub mod upload;
pub mod video;

pub use speech::SpeechClient;
pub use upload::AssetUploadClient;
pub use video::VideoClient;

use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("avs-vg/", env!("CARGO_PKG_VERSION"));

/// Provider client errors
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Request never got a response (DNS, TLS, timeout, connection reset)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Success status but a required field is missing
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Response body is not the expected JSON
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Shared reqwest client builder
pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Network(e.to_string()))
}

/// Pass 2xx responses through; turn anything else into `ProviderError::Api`
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Api {
        status: status.as_u16(),
        body,
    })
}

/// Parse a JSON body
pub(crate) async fn read_json(response: reqwest::Response) -> Result<serde_json::Value, ProviderError> {
    response
        .json()
        .await
        .map_err(|e| ProviderError::Parse(e.to_string()))
}

/// Pull a non-empty string out of `value` at a JSON pointer such as `/data/id`
pub(crate) fn required_str(value: &serde_json::Value, pointer: &str) -> Result<String, ProviderError> {
    value
        .pointer(pointer)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| ProviderError::MalformedResponse(format!("missing {} in response", pointer)))
}

/// Join a base URL and a path without doubling slashes
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
