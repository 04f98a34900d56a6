//! Mock speech service for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::ports::{audio_file_extension, SpeechError, SpeechService};

/// Returns a fixed transcript and echoes synthesized text back as bytes.
#[derive(Debug, Clone)]
pub struct MockSpeechService {
    transcript: String,
    synthesized: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl MockSpeechService {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            synthesized: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Texts (and voices) passed to `synthesize`, in call order.
    pub fn synthesized(&self) -> Vec<(String, Option<String>)> {
        self.synthesized.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechService for MockSpeechService {
    async fn transcribe(&self, audio: Vec<u8>, mime_type: &str) -> Result<String, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }
        if audio_file_extension(mime_type).is_none() {
            return Err(SpeechError::UnsupportedFormat(mime_type.to_string()));
        }
        Ok(self.transcript.clone())
    }

    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<Vec<u8>, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }
        self.synthesized
            .lock()
            .unwrap()
            .push((text.to_string(), voice.map(str::to_string)));
        Ok(text.as_bytes().to_vec())
    }
}
