//! OpenAI Speech Service - Whisper transcription and TTS synthesis.
//!
//! - `POST {base_url}/audio/transcriptions` (multipart upload)
//! - `POST {base_url}/audio/speech` (JSON, returns MP3 bytes)

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{audio_file_extension, SpeechError, SpeechService};

/// Configuration for the OpenAI speech service.
#[derive(Debug, Clone)]
pub struct OpenAISpeechConfig {
    api_key: Secret<String>,
    pub base_url: String,
    pub transcription_model: String,
    pub tts_model: String,
    pub default_voice: String,
    pub timeout: Duration,
}

impl OpenAISpeechConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://api.openai.com/v1".to_string(),
            transcription_model: "whisper-1".to_string(),
            tts_model: "tts-1".to_string(),
            default_voice: "alloy".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_models(
        mut self,
        transcription_model: impl Into<String>,
        tts_model: impl Into<String>,
    ) -> Self {
        self.transcription_model = transcription_model.into();
        self.tts_model = tts_model.into();
        self
    }

    pub fn with_default_voice(mut self, voice: impl Into<String>) -> Self {
        self.default_voice = voice.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Speech service calling OpenAI's audio endpoints.
pub struct OpenAISpeechService {
    config: OpenAISpeechConfig,
    client: Client,
}

impl OpenAISpeechService {
    /// # Errors
    ///
    /// Returns `Unavailable` if the HTTP client cannot be built.
    pub fn new(config: OpenAISpeechConfig) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SpeechError::Unavailable(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn speech_request(&self, text: &str, voice: Option<&str>) -> SpeechRequest {
        SpeechRequest {
            model: self.config.tts_model.clone(),
            input: text.to_string(),
            voice: voice
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(&self.config.default_voice)
                .to_string(),
            response_format: "mp3",
        }
    }

    async fn check_status(response: Response) -> Result<Response, SpeechError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(match status.as_u16() {
            400 | 415 => SpeechError::InvalidResponse(format!("rejected request: {}", body)),
            _ => SpeechError::Unavailable(format!("status {}: {}", status, body)),
        })
    }

    fn transport_error(err: reqwest::Error) -> SpeechError {
        SpeechError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl SpeechService for OpenAISpeechService {
    async fn transcribe(&self, audio: Vec<u8>, mime_type: &str) -> Result<String, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }
        let extension = audio_file_extension(mime_type)
            .ok_or_else(|| SpeechError::UnsupportedFormat(mime_type.to_string()))?;

        let size = audio.len();
        let part = Part::bytes(audio)
            .file_name(format!("recording.{}", extension))
            .mime_str(mime_type)
            .map_err(|_| SpeechError::UnsupportedFormat(mime_type.to_string()))?;
        let form = Form::new()
            .text("model", self.config.transcription_model.clone())
            .part("file", part);

        tracing::debug!(bytes = size, mime_type, "transcribing audio");

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.config.base_url))
            .bearer_auth(self.config.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(Self::transport_error)?;
        let response = Self::check_status(response).await?;

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(e.to_string()))?;
        Ok(body.text.trim().to_string())
    }

    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<Vec<u8>, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let response = self
            .client
            .post(format!("{}/audio/speech", self.config.base_url))
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&self.speech_request(text, voice))
            .send()
            .await
            .map_err(Self::transport_error)?;
        let response = Self::check_status(response).await?;

        let bytes = response.bytes().await.map_err(Self::transport_error)?;
        Ok(bytes.to_vec())
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest {
    model: String,
    input: String,
    voice: String,
    response_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}
