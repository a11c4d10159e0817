//! Speech synthesis client (ElevenLabs text-to-speech API)
//!
//! One `POST /v1/text-to-speech/{voice_id}` per call; the response body is
//! the MP3 audio itself.

use async_trait::async_trait;
use avs_common::audio::{AudioBuffer, AudioCodec};
use serde::Serialize;
use std::time::Duration;

use super::{build_http_client, endpoint, ensure_success, ProviderError};
use crate::config::SpeechSettings;
use crate::stages::SpeechSynthesizer;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Fixed prosody for every synthesis request
pub const VOICE_SETTINGS: VoiceSettings = VoiceSettings {
    stability: 0.5,
    similarity_boost: 0.75,
    style: 0.0,
    use_speaker_boost: true,
    speed: 1.0,
};

/// Voice tuning sent with each request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
    pub speed: f32,
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

/// Text-to-speech client
pub struct SpeechClient {
    http_client: reqwest::Client,
    settings: SpeechSettings,
}

impl SpeechClient {
    pub fn new(settings: SpeechSettings) -> Result<Self, ProviderError> {
        Ok(Self {
            http_client: build_http_client(REQUEST_TIMEOUT)?,
            settings,
        })
    }

    fn url(&self) -> String {
        endpoint(
            &self.settings.base_url,
            &format!("v1/text-to-speech/{}", self.settings.voice_id),
        )
    }
}

#[async_trait]
impl SpeechSynthesizer for SpeechClient {
    async fn synthesize(&self, text: &str) -> Result<AudioBuffer, ProviderError> {
        let body = SynthesisRequest {
            text,
            model_id: &self.settings.model_id,
            voice_settings: VOICE_SETTINGS,
        };

        tracing::debug!(
            voice_id = %self.settings.voice_id,
            chars = text.chars().count(),
            "Requesting speech synthesis"
        );

        let response = self
            .http_client
            .post(self.url())
            .header("xi-api-key", &self.settings.api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let response = ensure_success(response).await?;
        let audio = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if audio.is_empty() {
            return Err(ProviderError::MalformedResponse(
                "empty audio body".to_string(),
            ));
        }

        tracing::info!(bytes = audio.len(), "Speech synthesized");

        Ok(AudioBuffer::new(audio.to_vec(), AudioCodec::Mp3))
    }
}
