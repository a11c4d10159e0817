//! Audio payloads and transcoding
//!
//! An [`AudioBuffer`] is moved stage to stage by value: the speech client
//! produces it, the [`Transcoder`] consumes it and hands back a new one, and
//! the upload client consumes that.

pub mod transcoder;

pub use transcoder::{TranscodeError, Transcoder};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Container/codec of an audio payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    /// MPEG-1 Layer III, as returned by the speech provider
    Mp3,
    /// MPEG-1 Layer II, as required by the video provider upload
    Mpeg,
    /// PCM WAV
    Wav,
}

impl AudioCodec {
    /// ffmpeg muxer/demuxer name
    pub fn ffmpeg_format(&self) -> &'static str {
        match self {
            AudioCodec::Mp3 => "mp3",
            AudioCodec::Mpeg => "mp2",
            AudioCodec::Wav => "wav",
        }
    }

    /// File extension used for temp files and download names
    pub fn extension(&self) -> &'static str {
        match self {
            AudioCodec::Mp3 => "mp3",
            AudioCodec::Mpeg => "mpeg",
            AudioCodec::Wav => "wav",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioCodec::Mp3 | AudioCodec::Mpeg => "audio/mpeg",
            AudioCodec::Wav => "audio/wav",
        }
    }
}

impl fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Raw audio bytes plus their declared codec
#[derive(Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    pub data: Vec<u8>,
    pub codec: AudioCodec,
}

impl AudioBuffer {
    pub fn new(data: Vec<u8>, codec: AudioCodec) -> Self {
        Self { data, codec }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

// Payloads can be megabytes; keep Debug output to the metadata
impl fmt::Debug for AudioBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioBuffer")
            .field("codec", &self.codec)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mpeg_is_layer_two() {
        assert_eq!(AudioCodec::Mpeg.ffmpeg_format(), "mp2");
        assert_eq!(AudioCodec::Mpeg.extension(), "mpeg");
        assert_eq!(AudioCodec::Mpeg.mime_type(), "audio/mpeg");
    }

    #[test]
    fn debug_omits_payload() {
        let buffer = AudioBuffer::new(vec![0u8; 4096], AudioCodec::Mp3);
        let printed = format!("{:?}", buffer);
        assert!(printed.contains("4096"));
        assert!(printed.len() < 100);
    }
}
