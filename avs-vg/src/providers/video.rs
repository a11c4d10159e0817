//! Video synthesis client (HeyGen video API)
//!
//! - `POST /v2/video/generate` starts a job and returns `data.video_id`
//! - `GET /v1/video_status.get?video_id=...` reports job status

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{build_http_client, endpoint, ensure_success, read_json, required_str, ProviderError};
use crate::config::VideoProviderSettings;
use crate::models::{AssetHandle, VideoJob, VideoStatus};
use crate::stages::{VideoStatusSource, VideoSynthesizer};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `data` object of a status response
#[derive(Debug, Deserialize)]
struct StatusData {
    status: Option<VideoStatus>,
    video_url: Option<String>,
    thumbnail_url: Option<String>,
    duration: Option<f64>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    data: Option<StatusData>,
}

/// Video generation + status client
pub struct VideoClient {
    http_client: reqwest::Client,
    settings: VideoProviderSettings,
}

impl VideoClient {
    pub fn new(settings: VideoProviderSettings) -> Result<Self, ProviderError> {
        Ok(Self {
            http_client: build_http_client(REQUEST_TIMEOUT)?,
            settings,
        })
    }

    /// Generation request body for one avatar clip
    fn generate_body(&self, asset: &AssetHandle) -> serde_json::Value {
        json!({
            "video_inputs": [{
                "character": {
                    "type": "avatar",
                    "avatar_id": self.settings.avatar_id,
                    "avatar_style": "normal",
                },
                "voice": {
                    "type": "audio",
                    "audio_asset_id": asset.as_str(),
                },
            }],
            "dimension": {
                "width": self.settings.width,
                "height": self.settings.height,
            },
        })
    }
}

#[async_trait]
impl VideoSynthesizer for VideoClient {
    async fn generate(&self, asset: &AssetHandle) -> Result<String, ProviderError> {
        tracing::debug!(
            asset_id = %asset,
            avatar_id = %self.settings.avatar_id,
            "Requesting video generation"
        );

        let response = self
            .http_client
            .post(endpoint(&self.settings.api_base_url, "v2/video/generate"))
            .header("X-Api-Key", &self.settings.api_key)
            .json(&self.generate_body(asset))
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let response = ensure_success(response).await?;
        let body = read_json(response).await?;
        let video_id = required_str(&body, "/data/video_id")?;

        tracing::info!(video_id = %video_id, "Video generation started");

        Ok(video_id)
    }
}

#[async_trait]
impl VideoStatusSource for VideoClient {
    async fn status(&self, video_id: &str) -> Result<VideoJob, ProviderError> {
        let response = self
            .http_client
            .get(endpoint(&self.settings.api_base_url, "v1/video_status.get"))
            .query(&[("video_id", video_id)])
            .header("X-Api-Key", &self.settings.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let response = ensure_success(response).await?;
        let envelope: StatusEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let data = envelope
            .data
            .ok_or_else(|| ProviderError::MalformedResponse("missing /data in response".to_string()))?;
        let status = data
            .status
            .ok_or_else(|| ProviderError::MalformedResponse("missing /data/status in response".to_string()))?;

        Ok(VideoJob {
            video_id: video_id.to_string(),
            status,
            video_url: data.video_url.filter(|u| !u.trim().is_empty()),
            thumbnail_url: data.thumbnail_url,
            duration: data.duration,
            error: data.error.filter(|e| !e.is_null()),
        })
    }
}
