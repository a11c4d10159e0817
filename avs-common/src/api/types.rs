//! Shared API response types

use serde::{Deserialize, Serialize};

/// One entry of the `GET /` endpoint listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub method: String,
    pub path: String,
    pub description: String,
}

impl EndpointInfo {
    pub fn new(method: &str, path: &str, description: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            description: description.to_string(),
        }
    }
}

/// `GET /` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name, e.g. "video-generator"
    pub service: String,
    /// Crate version
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

/// Plain `{ "error": "..." }` body used for client errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
