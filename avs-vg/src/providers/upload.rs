//! Asset upload client (HeyGen upload API)
//!
//! Sends the raw audio bytes to `POST /v1/asset` and returns the asset id
//! from `data.id`.

use async_trait::async_trait;
use avs_common::audio::AudioBuffer;
use std::time::Duration;

use super::{build_http_client, endpoint, ensure_success, read_json, required_str, ProviderError};
use crate::config::VideoProviderSettings;
use crate::models::AssetHandle;
use crate::stages::AssetUploader;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Audio asset upload client
pub struct AssetUploadClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AssetUploadClient {
    pub fn new(settings: &VideoProviderSettings) -> Result<Self, ProviderError> {
        Ok(Self {
            http_client: build_http_client(REQUEST_TIMEOUT)?,
            api_key: settings.api_key.clone(),
            base_url: settings.upload_base_url.clone(),
        })
    }
}

#[async_trait]
impl AssetUploader for AssetUploadClient {
    async fn upload(&self, audio: AudioBuffer) -> Result<AssetHandle, ProviderError> {
        let content_type = audio.codec.mime_type();
        let bytes = audio.len();

        tracing::debug!(bytes, content_type, "Uploading audio asset");

        let response = self
            .http_client
            .post(endpoint(&self.base_url, "v1/asset"))
            .header("X-Api-Key", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(audio.into_bytes())
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let response = ensure_success(response).await?;
        let body = read_json(response).await?;
        let asset_id = required_str(&body, "/data/id")?;

        tracing::info!(asset_id = %asset_id, bytes, "Audio asset uploaded");

        Ok(AssetHandle::new(asset_id))
    }
}
