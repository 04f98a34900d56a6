//! Axum routes for speech endpoints.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{synthesize, transcribe};

/// Creates routes for speech endpoints.
///
/// Uploads larger than `max_upload_bytes` are rejected with 413.
pub fn speech_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/speech/transcriptions", post(transcribe))
        .route("/speech/synthesis", post(synthesize))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
