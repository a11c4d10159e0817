//! Video generation workflow orchestrator
//!
//! # Stage order
//! VALIDATE -> SPEECH -> CONVERT -> UPLOAD -> GENERATE -> POLL -> (NOTIFY)
//!
//! Each stage consumes the previous stage's output. The first failure ends
//! the run; later stages are never called. Notification happens only after
//! a full success, on a detached task, and cannot turn success into failure.

use avs_common::audio::Transcoder;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::VideoGenConfig;
use crate::error::{Stage, WorkflowError};
use crate::models::{GenerationRequest, WorkflowResult};
use crate::notifier::{Notifier, NotifyOutcome};
use crate::poller::StatusPoller;
use crate::providers::{AssetUploadClient, ProviderError, SpeechClient, VideoClient};
use crate::stages::{
    AssetUploader, AudioConverter, SpeechSynthesizer, VideoStatusSource, VideoSynthesizer,
};

/// The collaborators the orchestrator drives
#[derive(Clone)]
pub struct Stages {
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub converter: Arc<dyn AudioConverter>,
    pub uploader: Arc<dyn AssetUploader>,
    pub video: Arc<dyn VideoSynthesizer>,
    pub status: Arc<dyn VideoStatusSource>,
}

/// Completed run: the result plus the in-flight notification, if any
pub struct WorkflowRun {
    pub result: WorkflowResult,
    /// Detached notification task; awaiting it is optional
    pub notification: Option<JoinHandle<NotifyOutcome>>,
}

/// Workflow orchestrator service
pub struct WorkflowOrchestrator {
    stages: Stages,
    poller: StatusPoller,
    notifier: Arc<Notifier>,
}

impl WorkflowOrchestrator {
    pub fn new(stages: Stages, poller: StatusPoller, notifier: Notifier) -> Self {
        Self {
            stages,
            poller,
            notifier: Arc::new(notifier),
        }
    }

    /// Wire the production provider clients from configuration
    ///
    /// `shutdown` aborts in-flight status polling when cancelled.
    pub fn from_config(
        config: &VideoGenConfig,
        shutdown: CancellationToken,
    ) -> Result<Self, ProviderError> {
        let video = Arc::new(VideoClient::new(config.video.clone())?);

        let stages = Stages {
            speech: Arc::new(SpeechClient::new(config.speech.clone())?),
            converter: Arc::new(Transcoder::new().with_ffmpeg_path(&config.ffmpeg_path)),
            uploader: Arc::new(AssetUploadClient::new(&config.video)?),
            video: video.clone(),
            status: video,
        };

        let poller = StatusPoller::new(config.poll).with_cancellation(shutdown);
        let notifier = Notifier::new(config.webhook_url.clone())?;

        if notifier.is_enabled() {
            tracing::info!("Chat notifications enabled");
        } else {
            tracing::info!("No webhook configured, chat notifications disabled");
        }

        Ok(Self::new(stages, poller, notifier))
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifier.is_enabled()
    }

    /// Run the pipeline and, on success, start the notification
    pub async fn run(&self, request: GenerationRequest) -> Result<WorkflowRun, WorkflowError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("generate_video", %request_id);

        let result = self.execute(request).instrument(span.clone()).await?;

        let notification = if self.notifier.is_enabled() {
            let notifier = Arc::clone(&self.notifier);
            let summary = result.clone();
            Some(tokio::spawn(
                async move { notifier.notify(&summary).await }.instrument(span),
            ))
        } else {
            None
        };

        Ok(WorkflowRun {
            result,
            notification,
        })
    }

    /// Run every stage in order, stopping at the first failure
    pub async fn execute(&self, request: GenerationRequest) -> Result<WorkflowResult, WorkflowError> {
        request.validate()?;

        let GenerationRequest {
            script,
            title,
            references,
        } = request;

        tracing::info!(
            chars = script.chars().count(),
            title = %title,
            "Starting video generation"
        );

        // Stage 1: text -> speech (MP3)
        let speech = self
            .stages
            .speech
            .synthesize(script.trim())
            .await
            .map_err(|e| WorkflowError::provider(Stage::SpeechSynthesis, e))?;

        // Stage 2: MP3 -> MPEG
        let converted = self.stages.converter.convert(speech).await?;

        // Stage 3: upload audio to the video provider
        let asset = self
            .stages
            .uploader
            .upload(converted)
            .await
            .map_err(|e| WorkflowError::provider(Stage::AssetUpload, e))?;

        // Stage 4: start avatar video synthesis
        let video_id = self
            .stages
            .video
            .generate(&asset)
            .await
            .map_err(|e| WorkflowError::provider(Stage::VideoSynthesis, e))?;

        // Stage 5: wait for a terminal status
        let settings = self.poller.settings();
        tracing::info!(
            video_id = %video_id,
            max_attempts = settings.max_attempts,
            interval_secs = settings.interval.as_secs(),
            "Waiting for video"
        );
        let job = self
            .poller
            .wait_for_completion(self.stages.status.as_ref(), &video_id)
            .await?;

        let video_url = job
            .video_url
            .ok_or_else(|| WorkflowError::MalformedResponse {
                stage: Stage::VideoStatus,
                detail: "completed status without video_url".to_string(),
            })?;

        tracing::info!(video_id = %video_id, video_url = %video_url, "Video generation finished");

        Ok(WorkflowResult {
            video_id,
            video_url,
            audio_asset_id: asset.into_inner(),
            title,
            references,
        })
    }
}
