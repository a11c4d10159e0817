//! In-process stand-ins for every pipeline stage
//!
//! Each stub counts its calls so tests can assert which stages ran.

#![allow(dead_code)]

use async_trait::async_trait;
use avs_common::audio::{AudioBuffer, AudioCodec, TranscodeError};
use avs_vg::config::PollSettings;
use avs_vg::models::{AssetHandle, VideoJob, VideoStatus};
use avs_vg::notifier::Notifier;
use avs_vg::poller::{Sleeper, StatusPoller};
use avs_vg::providers::ProviderError;
use avs_vg::stages::{
    AssetUploader, AudioConverter, SpeechSynthesizer, VideoStatusSource, VideoSynthesizer,
};
use avs_vg::{Stages, WorkflowOrchestrator};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const VIDEO_ID: &str = "vid-123";
pub const ASSET_ID: &str = "asset-456";
pub const VIDEO_URL: &str = "https://cdn.example/vid-123.mp4";

#[derive(Default)]
pub struct Counter(AtomicU32);

impl Counter {
    pub fn hit(&self) -> u32 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Returns fixed MP3 bytes and remembers the text it was given
#[derive(Default)]
pub struct StubSpeech {
    pub calls: Counter,
    pub last_text: Mutex<Option<String>>,
    pub fail_with: Option<u16>,
}

#[async_trait]
impl SpeechSynthesizer for StubSpeech {
    async fn synthesize(&self, text: &str) -> Result<AudioBuffer, ProviderError> {
        self.calls.hit();
        *self.last_text.lock().unwrap() = Some(text.to_string());
        if let Some(status) = self.fail_with {
            return Err(ProviderError::Api {
                status,
                body: "speech rejected".to_string(),
            });
        }
        Ok(AudioBuffer::new(b"ID3-fake-mp3".to_vec(), AudioCodec::Mp3))
    }
}

/// Relabels the audio as MPEG, or fails like a broken ffmpeg run
#[derive(Default)]
pub struct StubConverter {
    pub calls: Counter,
    pub fail: bool,
}

#[async_trait]
impl AudioConverter for StubConverter {
    async fn convert(&self, audio: AudioBuffer) -> Result<AudioBuffer, TranscodeError> {
        self.calls.hit();
        if self.fail {
            return Err(TranscodeError::Failed {
                code: Some(1),
                stderr: "Invalid data found when processing input".to_string(),
            });
        }
        Ok(AudioBuffer::new(audio.into_bytes(), AudioCodec::Mpeg))
    }
}

/// Hands out [`ASSET_ID`], or reports a response without an id
#[derive(Default)]
pub struct StubUploader {
    pub calls: Counter,
    pub last_codec: Mutex<Option<AudioCodec>>,
    pub missing_id: bool,
}

#[async_trait]
impl AssetUploader for StubUploader {
    async fn upload(&self, audio: AudioBuffer) -> Result<AssetHandle, ProviderError> {
        self.calls.hit();
        *self.last_codec.lock().unwrap() = Some(audio.codec);
        if self.missing_id {
            return Err(ProviderError::MalformedResponse(
                "missing /data/id in response".to_string(),
            ));
        }
        Ok(AssetHandle::new(ASSET_ID))
    }
}

#[derive(Default)]
pub struct StubVideo {
    pub calls: Counter,
    pub last_asset: Mutex<Option<String>>,
}

#[async_trait]
impl VideoSynthesizer for StubVideo {
    async fn generate(&self, asset: &AssetHandle) -> Result<String, ProviderError> {
        self.calls.hit();
        *self.last_asset.lock().unwrap() = Some(asset.to_string());
        Ok(VIDEO_ID.to_string())
    }
}

/// Reports `processing` until call `finish_on`, then the final job
pub struct StubStatus {
    pub calls: Counter,
    pub finish_on: u32,
    pub final_job: VideoJob,
}

impl StubStatus {
    pub fn completing_on(n: u32) -> Self {
        Self {
            calls: Counter::default(),
            finish_on: n,
            final_job: VideoJob::new(VIDEO_ID, VideoStatus::Completed).with_video_url(VIDEO_URL),
        }
    }

    pub fn finishing_with(n: u32, job: VideoJob) -> Self {
        Self {
            calls: Counter::default(),
            finish_on: n,
            final_job: job,
        }
    }
}

#[async_trait]
impl VideoStatusSource for StubStatus {
    async fn status(&self, video_id: &str) -> Result<VideoJob, ProviderError> {
        let call = self.calls.hit();
        if call >= self.finish_on {
            Ok(self.final_job.clone())
        } else {
            Ok(VideoJob::new(video_id, VideoStatus::Processing))
        }
    }
}

/// Sleeper that returns at once
pub struct NoSleep;

#[async_trait]
impl Sleeper for NoSleep {
    async fn sleep(&self, _duration: Duration) {}
}

/// Handles on every stub plus the orchestrator wired to them
pub struct Harness {
    pub speech: Arc<StubSpeech>,
    pub converter: Arc<StubConverter>,
    pub uploader: Arc<StubUploader>,
    pub video: Arc<StubVideo>,
    pub status: Arc<StubStatus>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            speech: Arc::new(StubSpeech::default()),
            converter: Arc::new(StubConverter::default()),
            uploader: Arc::new(StubUploader::default()),
            video: Arc::new(StubVideo::default()),
            status: Arc::new(StubStatus::completing_on(3)),
        }
    }

    pub fn stages(&self) -> Stages {
        Stages {
            speech: self.speech.clone(),
            converter: self.converter.clone(),
            uploader: self.uploader.clone(),
            video: self.video.clone(),
            status: self.status.clone(),
        }
    }

    pub fn orchestrator(&self, notifier: Notifier) -> WorkflowOrchestrator {
        let poller = StatusPoller::new(PollSettings {
            max_attempts: 60,
            interval: Duration::from_secs(30),
        })
        .with_sleeper(Arc::new(NoSleep));

        WorkflowOrchestrator::new(self.stages(), poller, notifier)
    }

    /// Calls per stage: speech, convert, upload, generate, status
    pub fn call_counts(&self) -> [u32; 5] {
        [
            self.speech.calls.get(),
            self.converter.calls.get(),
            self.uploader.calls.get(),
            self.video.calls.get(),
            self.status.calls.get(),
        ]
    }
}
