//! HTTP handlers for speech endpoints.
//!
//! Both endpoints answer 404 when no speech service is configured.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{header, HeaderMap};
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::ports::SpeechService;

use super::dto::{SynthesisRequest, TranscriptionResponse};

fn speech_service(state: &AppState) -> Result<Arc<dyn SpeechService>, ApiError> {
    state
        .speech
        .clone()
        .ok_or_else(|| ApiError::NotFound("Speech service".to_string(), "disabled".to_string()))
}

/// POST /api/speech/transcriptions - Transcribe an audio body.
///
/// The audio format is taken from the `Content-Type` header.
///
/// # Errors
/// - 400 Bad Request: Empty body
/// - 415 Unsupported Media Type: Audio format not accepted
/// - 502 Bad Gateway: Transcription service failed
pub async fn transcribe(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let speech = speech_service(&state)?;
    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    let text = speech
        .transcribe(body.to_vec(), mime_type)
        .await
        .map_err(|e| ApiError::from(e).verbose(state.verbose_errors))?;

    Ok(Json(TranscriptionResponse { text }))
}

/// POST /api/speech/synthesis - Render text as MP3 audio.
pub async fn synthesize(
    State(state): State<AppState>,
    Json(request): Json<SynthesisRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let speech = speech_service(&state)?;

    let audio = speech
        .synthesize(&request.text, request.voice.as_deref())
        .await
        .map_err(|e| ApiError::from(e).verbose(state.verbose_errors))?;

    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio))
}
