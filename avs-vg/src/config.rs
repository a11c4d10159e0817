//! Configuration for avs-vg
//!
//! Built once at startup from [`SettingsSource`] (ENV -> TOML -> default)
//! and handed to each client by value. Nothing here changes after startup.

use avs_common::config::SettingsSource;
use avs_common::{Error, Result};
use std::time::Duration;

pub const DEFAULT_SPEECH_BASE_URL: &str = "https://api.elevenlabs.io";
pub const DEFAULT_SPEECH_MODEL: &str = "eleven_multilingual_v2";
pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://upload.heygen.com";
pub const DEFAULT_VIDEO_BASE_URL: &str = "https://api.heygen.com";
pub const DEFAULT_VIDEO_WIDTH: u32 = 1280;
pub const DEFAULT_VIDEO_HEIGHT: u32 = 720;
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 60;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Speech synthesis provider settings
#[derive(Debug, Clone)]
pub struct SpeechSettings {
    pub api_key: String,
    pub voice_id: String,
    pub model_id: String,
    pub base_url: String,
}

/// Video provider settings (shared by the upload and synthesis clients)
#[derive(Debug, Clone)]
pub struct VideoProviderSettings {
    pub api_key: String,
    pub avatar_id: String,
    pub upload_base_url: String,
    pub api_base_url: String,
    pub width: u32,
    pub height: u32,
}

/// Status polling bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Status queries before giving up
    pub max_attempts: u32,
    /// Wait between consecutive queries
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}

impl PollSettings {
    /// Worst-case time spent waiting between polls, saturating at `Duration::MAX`
    pub fn worst_case_wait(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts.saturating_sub(1))
    }
}

/// Complete avs-vg configuration
#[derive(Debug, Clone)]
pub struct VideoGenConfig {
    pub speech: SpeechSettings,
    pub video: VideoProviderSettings,
    pub poll: PollSettings,
    /// Chat webhook; `None` disables notifications
    pub webhook_url: Option<String>,
    pub ffmpeg_path: String,
}

impl VideoGenConfig {
    /// Resolve every setting, failing on the first missing required value
    pub fn from_settings(settings: &SettingsSource) -> Result<Self> {
        let speech = SpeechSettings {
            api_key: settings.require("ELEVENLABS_API_KEY")?,
            voice_id: settings.require("ELEVENLABS_VOICE_ID")?,
            model_id: settings.get_or("ELEVENLABS_MODEL_ID", DEFAULT_SPEECH_MODEL),
            base_url: settings.get_or("ELEVENLABS_BASE_URL", DEFAULT_SPEECH_BASE_URL),
        };

        let video = VideoProviderSettings {
            api_key: settings.require("HEYGEN_API_KEY")?,
            avatar_id: settings.require("HEYGEN_AVATAR_ID")?,
            upload_base_url: settings.get_or("HEYGEN_UPLOAD_BASE_URL", DEFAULT_UPLOAD_BASE_URL),
            api_base_url: settings.get_or("HEYGEN_API_BASE_URL", DEFAULT_VIDEO_BASE_URL),
            width: settings.get_parsed("VIDEO_WIDTH", DEFAULT_VIDEO_WIDTH)?,
            height: settings.get_parsed("VIDEO_HEIGHT", DEFAULT_VIDEO_HEIGHT)?,
        };

        let max_attempts = settings.get_parsed("VIDEO_POLL_MAX_ATTEMPTS", DEFAULT_POLL_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            return Err(Error::Config(
                "VIDEO_POLL_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }
        let interval_secs = settings.get_parsed("VIDEO_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;

        Ok(Self {
            speech,
            video,
            poll: PollSettings {
                max_attempts,
                interval: Duration::from_secs(interval_secs),
            },
            webhook_url: settings.get("GOOGLE_CHAT_WEBHOOK_URL"),
            ffmpeg_path: settings.get_or("FFMPEG_PATH", "ffmpeg"),
        })
    }
}
