//! HTTP adapter for speech endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{SynthesisRequest, TranscriptionResponse};
pub use routes::speech_routes;
