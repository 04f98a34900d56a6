//! HTTP DTOs for speech endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    /// Falls back to the configured voice.
    #[serde(default)]
    pub voice: Option<String>,
}
