//! Pipeline stage traits
//!
//! The orchestrator talks to every collaborator through these traits so the
//! whole chain can run against in-process stubs. Production implementations:
//!
//! | Trait                 | Implementation                          |
//! |-----------------------|-----------------------------------------|
//! | `SpeechSynthesizer`   | `providers::SpeechClient`               |
//! | `AudioConverter`      | `avs_common::audio::Transcoder`         |
//! | `AssetUploader`       | `providers::AssetUploadClient`          |
//! | `VideoSynthesizer`    | `providers::VideoClient`                |
//! | `VideoStatusSource`   | `providers::VideoClient`                |

use async_trait::async_trait;
use avs_common::audio::{AudioBuffer, TranscodeError, Transcoder};

use crate::models::{AssetHandle, VideoJob};
use crate::providers::ProviderError;

/// Text -> provider-native audio
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<AudioBuffer, ProviderError>;
}

/// Provider-native audio -> upload codec
#[async_trait]
pub trait AudioConverter: Send + Sync {
    async fn convert(&self, audio: AudioBuffer) -> Result<AudioBuffer, TranscodeError>;
}

/// Audio -> asset handle in the video provider's storage
#[async_trait]
pub trait AssetUploader: Send + Sync {
    async fn upload(&self, audio: AudioBuffer) -> Result<AssetHandle, ProviderError>;
}

/// Asset handle -> video job id
#[async_trait]
pub trait VideoSynthesizer: Send + Sync {
    async fn generate(&self, asset: &AssetHandle) -> Result<String, ProviderError>;
}

/// One status query for a video job
#[async_trait]
pub trait VideoStatusSource: Send + Sync {
    async fn status(&self, video_id: &str) -> Result<VideoJob, ProviderError>;
}

#[async_trait]
impl AudioConverter for Transcoder {
    async fn convert(&self, audio: AudioBuffer) -> Result<AudioBuffer, TranscodeError> {
        self.transcode(audio).await
    }
}
