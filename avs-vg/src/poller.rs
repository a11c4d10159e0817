//! Video status poller
//!
//! # State machine
//! ```text
//! queued/processing --(wait interval)--> poll again
//! completed         --> Ok(job)
//! failed            --> Err(VideoGenerationFailed)
//! max_attempts hit  --> Err(Timeout)
//! token cancelled   --> Err(Cancelled)
//! ```
//!
//! The wait goes through [`Sleeper`] so tests can run the full loop without
//! real time passing. No wait follows the final attempt.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::PollSettings;
use crate::models::{VideoJob, VideoStatus};
use crate::providers::ProviderError;
use crate::stages::VideoStatusSource;

/// Poller errors
#[derive(Debug, Error)]
pub enum PollError {
    /// A status query itself failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Provider reported `failed`
    #[error("Video generation failed: {}", .0.failure_detail())]
    VideoGenerationFailed(VideoJob),

    /// No terminal status within the attempt budget
    #[error("No terminal status after {attempts} attempts")]
    Timeout { attempts: u32 },

    /// Cancellation token fired
    #[error("Polling cancelled")]
    Cancelled,
}

/// Suspension between polls
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Polls a video job until it reaches a terminal status
#[derive(Clone)]
pub struct StatusPoller {
    settings: PollSettings,
    sleeper: Arc<dyn Sleeper>,
    cancel: CancellationToken,
}

impl StatusPoller {
    pub fn new(settings: PollSettings) -> Self {
        Self {
            settings,
            sleeper: Arc::new(TokioSleeper),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Abandon in-flight polls when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    /// Query `source` until `video_id` completes, fails, or attempts run out
    pub async fn wait_for_completion(
        &self,
        source: &dyn VideoStatusSource,
        video_id: &str,
    ) -> Result<VideoJob, PollError> {
        let max_attempts = self.settings.max_attempts;

        for attempt in 1..=max_attempts {
            if self.cancel.is_cancelled() {
                return Err(PollError::Cancelled);
            }

            let job = source.status(video_id).await?;

            match job.status {
                VideoStatus::Completed => {
                    tracing::info!(video_id, attempt, "Video completed");
                    return Ok(job);
                }
                VideoStatus::Failed => {
                    tracing::warn!(video_id, attempt, detail = %job.failure_detail(), "Video failed");
                    return Err(PollError::VideoGenerationFailed(job));
                }
                status => {
                    tracing::debug!(
                        video_id,
                        attempt,
                        max_attempts,
                        status = %status,
                        "Video not ready"
                    );
                }
            }

            if attempt < max_attempts {
                tokio::select! {
                    _ = self.cancel.cancelled() => return Err(PollError::Cancelled),
                    _ = self.sleeper.sleep(self.settings.interval) => {}
                }
            }
        }

        tracing::warn!(video_id, attempts = max_attempts, "Video status polling exhausted");
        Err(PollError::Timeout {
            attempts: max_attempts,
        })
    }
}
