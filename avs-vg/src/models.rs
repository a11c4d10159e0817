//! Request-scoped data model for the video pipeline
//!
//! Everything here lives for one request and is dropped with the response.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WorkflowError;

/// Inbound `POST /generate-video` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationRequest {
    /// Text to narrate; required, non-empty after trimming
    #[serde(rename = "Script", alias = "script", default)]
    pub script: String,
    #[serde(rename = "Titulo", alias = "title", default)]
    pub title: String,
    #[serde(rename = "Referencias", alias = "references", default)]
    pub references: String,
}

impl GenerationRequest {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_references(mut self, references: impl Into<String>) -> Self {
        self.references = references.into();
        self
    }

    /// Reject empty or whitespace-only scripts
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.script.trim().is_empty() {
            return Err(WorkflowError::Validation(
                "Script is required and cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Uploaded audio asset id inside the video provider's storage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetHandle(String);

impl AssetHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider-side video job state
///
/// Status strings other than the four known ones (e.g. `pending`,
/// `waiting`) are treated as still processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Queued,
    Completed,
    Failed,
    /// Catch-all; must stay the last variant
    #[serde(other)]
    Processing,
}

impl VideoStatus {
    /// `completed` and `failed` end polling
    pub fn is_terminal(&self) -> bool {
        matches!(self, VideoStatus::Completed | VideoStatus::Failed)
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VideoStatus::Queued => "queued",
            VideoStatus::Processing => "processing",
            VideoStatus::Completed => "completed",
            VideoStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Snapshot of a video job as reported by one status query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoJob {
    pub video_id: String,
    pub status: VideoStatus,
    /// Present once the job completed
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Seconds
    pub duration: Option<f64>,
    /// Provider error payload when the job failed
    pub error: Option<serde_json::Value>,
}

impl VideoJob {
    pub fn new(video_id: impl Into<String>, status: VideoStatus) -> Self {
        Self {
            video_id: video_id.into(),
            status,
            video_url: None,
            thumbnail_url: None,
            duration: None,
            error: None,
        }
    }

    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = Some(url.into());
        self
    }

    /// Human-readable failure reason for a failed job
    pub fn failure_detail(&self) -> String {
        match &self.error {
            Some(serde_json::Value::String(message)) => message.clone(),
            Some(serde_json::Value::Null) | None => format!("video {} reported status failed", self.video_id),
            Some(other) => other
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| other.to_string()),
        }
    }
}

/// Successful pipeline outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub video_id: String,
    pub video_url: String,
    pub audio_asset_id: String,
    pub title: String,
    pub references: String,
}

/// `200` response body for `POST /generate-video`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub success: bool,
    pub message: String,
    pub data: WorkflowResult,
}

impl GenerationResponse {
    pub fn succeeded(data: WorkflowResult) -> Self {
        Self {
            success: true,
            message: "Video generated successfully".to_string(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_uses_wire_names() {
        let request: GenerationRequest = serde_json::from_value(json!({
            "Script": "Hola mundo",
            "Titulo": "Saludo",
            "Referencias": "https://example.com"
        }))
        .unwrap();

        assert_eq!(request.script, "Hola mundo");
        assert_eq!(request.title, "Saludo");
        assert_eq!(request.references, "https://example.com");
    }

    #[test]
    fn optional_fields_default_to_empty() {
        let request: GenerationRequest = serde_json::from_value(json!({ "Script": "x" })).unwrap();
        assert_eq!(request.title, "");
        assert_eq!(request.references, "");
    }

    #[test]
    fn whitespace_script_fails_validation() {
        for script in ["", "   ", "\n\t "] {
            let err = GenerationRequest::new(script).validate().unwrap_err();
            assert!(matches!(err, WorkflowError::Validation(_)));
        }
        assert!(GenerationRequest::new(" ok ").validate().is_ok());
    }

    #[test]
    fn status_parsing_maps_unknown_to_processing() {
        let parse = |s: &str| serde_json::from_value::<VideoStatus>(json!(s)).unwrap();

        assert_eq!(parse("completed"), VideoStatus::Completed);
        assert_eq!(parse("failed"), VideoStatus::Failed);
        assert_eq!(parse("queued"), VideoStatus::Queued);
        assert_eq!(parse("processing"), VideoStatus::Processing);
        assert_eq!(parse("pending"), VideoStatus::Processing);
        assert_eq!(parse("waiting"), VideoStatus::Processing);
        assert!(VideoStatus::Failed.is_terminal());
        assert!(!VideoStatus::Queued.is_terminal());
    }

    #[test]
    fn job_serializes_status_as_lowercase_name() {
        let job = VideoJob::new("v1", VideoStatus::Processing);
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["status"], "processing");

        let done = serde_json::to_value(VideoJob::new("v1", VideoStatus::Completed)).unwrap();
        assert_eq!(done["status"], "completed");
    }

    #[test]
    fn failure_detail_prefers_provider_message() {
        let mut job = VideoJob::new("v1", VideoStatus::Failed);
        assert!(job.failure_detail().contains("v1"));

        job.error = Some(json!({ "code": 40001, "message": "avatar not found" }));
        assert_eq!(job.failure_detail(), "avatar not found");

        job.error = Some(json!("quota exceeded"));
        assert_eq!(job.failure_detail(), "quota exceeded");
    }
}
