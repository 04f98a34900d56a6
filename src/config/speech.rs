//! Speech service configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Speech-to-text and text-to-speech settings. Uses the AI section's key
/// and base URL.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,

    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    #[serde(default = "default_voice")]
    pub default_voice: String,

    /// Largest accepted audio upload
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl SpeechConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.enabled && self.max_upload_bytes == 0 {
            return Err(ValidationError::InvalidUploadLimit);
        }
        Ok(())
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            transcription_model: default_transcription_model(),
            tts_model: default_tts_model(),
            default_voice: default_voice(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}

fn default_voice() -> String {
    "alloy".to_string()
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}
