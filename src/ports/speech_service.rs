//! Speech Service Port - speech-to-text and text-to-speech.
//!
//! Speech is opaque to the drafting engine: transcriptions become answer
//! text, and final text can be read back as audio.

use async_trait::async_trait;

/// Errors from a speech backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SpeechError {
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("audio payload is empty")]
    EmptyAudio,

    #[error("text to synthesize is empty")]
    EmptyText,

    #[error("speech backend unavailable: {0}")]
    Unavailable(String),

    #[error("speech backend returned an unusable response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Transcribes an audio clip to text.
    ///
    /// `mime_type` is the clip's content type, e.g. `audio/webm`.
    async fn transcribe(&self, audio: Vec<u8>, mime_type: &str) -> Result<String, SpeechError>;

    /// Synthesizes speech for `text`, returning MP3 bytes.
    ///
    /// `voice` overrides the service's default voice.
    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<Vec<u8>, SpeechError>;
}

/// Maps an audio mime type to the file extension the transcription API
/// uses to detect the container format.
pub fn audio_file_extension(mime_type: &str) -> Option<&'static str> {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "audio/webm" | "video/webm" => Some("webm"),
        "audio/ogg" => Some("ogg"),
        "audio/wav" | "audio/x-wav" | "audio/wave" => Some("wav"),
        "audio/mpeg" | "audio/mp3" => Some("mp3"),
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" => Some("m4a"),
        "audio/flac" => Some("flac"),
        _ => None,
    }
}
