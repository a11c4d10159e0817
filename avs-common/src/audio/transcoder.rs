//! Audio transcoder
//!
//! Wraps the `ffmpeg` command-line tool. ffmpeg works on files, so every call
//! writes the input into a fresh temporary directory, runs the tool, reads
//! the output back, and removes the directory when the guard drops, on
//! success and on every error path.

use super::{AudioBuffer, AudioCodec};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

const DEFAULT_FFMPEG: &str = "ffmpeg";
const TEMP_PREFIX: &str = "avs-transcode-";
const MAX_STDERR_CHARS: usize = 2000;

/// Transcoder errors
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// Nothing to transcode
    #[error("Audio input is empty")]
    EmptyInput,

    /// ffmpeg could not be started (missing binary, permissions)
    #[error("Failed to run {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// ffmpeg ran but rejected the input or could not write the output
    #[error("Transcoding failed (exit code {code:?}): {stderr}")]
    Failed { code: Option<i32>, stderr: String },

    /// ffmpeg exited cleanly but wrote no audio
    #[error("Transcoding produced no output")]
    EmptyOutput,

    /// Temp file handling failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// ffmpeg-backed transcoder
#[derive(Debug, Clone)]
pub struct Transcoder {
    ffmpeg_path: PathBuf,
    scratch_dir: Option<PathBuf>,
    target: AudioCodec,
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcoder {
    /// Transcoder producing MPEG (Layer II) with `ffmpeg` from `PATH`
    pub fn new() -> Self {
        Self {
            ffmpeg_path: PathBuf::from(DEFAULT_FFMPEG),
            scratch_dir: None,
            target: AudioCodec::Mpeg,
        }
    }

    pub fn with_ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_path = path.into();
        self
    }

    /// Create per-call temp directories under `dir` instead of the OS temp dir
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn with_target(mut self, target: AudioCodec) -> Self {
        self.target = target;
        self
    }

    pub fn target(&self) -> AudioCodec {
        self.target
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }

    /// Convert `input` into the target codec
    pub async fn transcode(&self, input: AudioBuffer) -> Result<AudioBuffer, TranscodeError> {
        if input.is_empty() {
            return Err(TranscodeError::EmptyInput);
        }

        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX);
        let workdir = match &self.scratch_dir {
            Some(dir) => builder.tempdir_in(dir)?,
            None => builder.tempdir()?,
        };

        let input_path = workdir
            .path()
            .join(format!("input.{}", input.codec.extension()));
        let output_path = workdir
            .path()
            .join(format!("output.{}", self.target.extension()));

        tokio::fs::write(&input_path, &input.data).await?;

        tracing::debug!(
            from = %input.codec,
            to = %self.target,
            input_bytes = input.len(),
            workdir = %workdir.path().display(),
            "Running ffmpeg"
        );

        // Input buffer is no longer needed once it is on disk
        let source_codec = input.codec;
        drop(input);

        let output = Command::new(&self.ffmpeg_path)
            .args(["-hide_banner", "-loglevel", "error", "-nostdin", "-y"])
            .arg("-f")
            .arg(source_codec.ffmpeg_format())
            .arg("-i")
            .arg(&input_path)
            .arg("-vn")
            .arg("-f")
            .arg(self.target.ffmpeg_format())
            .arg(&output_path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| TranscodeError::Spawn {
                binary: self.ffmpeg_path.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscodeError::Failed {
                code: output.status.code(),
                stderr: truncate(stderr.trim(), MAX_STDERR_CHARS),
            });
        }

        let data = match tokio::fs::read(&output_path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TranscodeError::EmptyOutput)
            }
            Err(e) => return Err(e.into()),
        };
        if data.is_empty() {
            return Err(TranscodeError::EmptyOutput);
        }

        tracing::info!(
            from = %source_codec,
            to = %self.target,
            output_bytes = data.len(),
            "Audio transcoded"
        );

        Ok(AudioBuffer::new(data, self.target))
        // workdir dropped here: both temp files removed
    }

    /// Check whether the ffmpeg binary can be started
    pub fn is_available(&self) -> bool {
        std::process::Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
