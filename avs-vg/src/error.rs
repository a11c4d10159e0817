//! Error types for avs-vg
//!
//! Stage failures are collected into [`WorkflowError`]; the HTTP layer turns
//! it into one of two shapes:
//! - validation problems: `400 { "error": ... }`
//! - every pipeline failure: `500 { "success": false, "error": ... }`

use avs_common::api::ErrorBody;
use avs_common::audio::TranscodeError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use thiserror::Error;

use crate::poller::PollError;
use crate::providers::ProviderError;

/// Pipeline stage that talks to a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SpeechSynthesis,
    AssetUpload,
    VideoSynthesis,
    VideoStatus,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::SpeechSynthesis => "speech synthesis",
            Stage::AssetUpload => "audio upload",
            Stage::VideoSynthesis => "video generation request",
            Stage::VideoStatus => "video status check",
        };
        f.write_str(s)
    }
}

/// Pipeline failure
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Bad or missing input
    #[error("{0}")]
    Validation(String),

    /// Provider answered with a non-success status or could not be reached
    #[error("{stage} failed{}: {message}", status_suffix(.status))]
    Provider {
        stage: Stage,
        status: Option<u16>,
        message: String,
    },

    /// Provider answered 2xx but without a field we need
    #[error("{stage} returned a malformed response: {detail}")]
    MalformedResponse { stage: Stage, detail: String },

    /// Local codec failure
    #[error("Audio conversion failed: {0}")]
    Transcode(#[from] TranscodeError),

    /// Provider reported the video job as failed
    #[error("Video generation failed: {0}")]
    VideoGenerationFailed(String),

    /// Polling exhausted without a terminal status
    #[error("Video generation timed out after {attempts} status checks")]
    Timeout { attempts: u32 },

    /// Polling abandoned because the service is shutting down
    #[error("Video status polling cancelled")]
    Cancelled,
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

impl WorkflowError {
    /// Attribute a provider error to the stage that produced it
    pub fn provider(stage: Stage, err: ProviderError) -> Self {
        match err {
            ProviderError::Api { status, body } => WorkflowError::Provider {
                stage,
                status: Some(status),
                message: body,
            },
            ProviderError::Network(message) => WorkflowError::Provider {
                stage,
                status: None,
                message,
            },
            ProviderError::MalformedResponse(detail) | ProviderError::Parse(detail) => {
                WorkflowError::MalformedResponse { stage, detail }
            }
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, WorkflowError::Validation(_))
    }
}

impl From<PollError> for WorkflowError {
    fn from(err: PollError) -> Self {
        match err {
            PollError::Provider(e) => WorkflowError::provider(Stage::VideoStatus, e),
            PollError::VideoGenerationFailed(job) => {
                WorkflowError::VideoGenerationFailed(job.failure_detail())
            }
            PollError::Timeout { attempts } => WorkflowError::Timeout { attempts },
            PollError::Cancelled => WorkflowError::Cancelled,
        }
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unparseable request body (400)
    #[error("{0}")]
    BadRequest(String),

    /// Pipeline failure (400 for validation, 500 otherwise)
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new(message))).into_response()
            }
            ApiError::Workflow(err) if err.is_validation() => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new(err.to_string()))).into_response()
            }
            ApiError::Workflow(err) => {
                tracing::error!(error = %err, "Video generation failed");
                let body = Json(json!({
                    "success": false,
                    "error": err.to_string(),
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_message_includes_stage_and_status() {
        let err = WorkflowError::provider(
            Stage::SpeechSynthesis,
            ProviderError::Api {
                status: 401,
                body: "invalid api key".to_string(),
            },
        );
        assert_eq!(err.to_string(), "speech synthesis failed (401): invalid api key");
    }

    #[test]
    fn missing_field_becomes_malformed_response() {
        let err = WorkflowError::provider(
            Stage::AssetUpload,
            ProviderError::MalformedResponse("missing data.id".to_string()),
        );
        assert!(matches!(
            err,
            WorkflowError::MalformedResponse {
                stage: Stage::AssetUpload,
                ..
            }
        ));
    }

    #[test]
    fn status_codes() {
        let bad = ApiError::from(WorkflowError::Validation("Script is required".into()));
        assert_eq!(bad.into_response().status(), StatusCode::BAD_REQUEST);

        let timeout = ApiError::from(WorkflowError::Timeout { attempts: 60 });
        assert_eq!(timeout.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let failed = ApiError::from(WorkflowError::VideoGenerationFailed("boom".into()));
        assert_eq!(failed.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
