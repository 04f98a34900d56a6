//! Speech Adapters.
//!
//! - `OpenAISpeechService` - Whisper transcription and OpenAI TTS
//! - `MockSpeechService` - Fixed transcript, echoing synthesis

mod mock_speech;
mod openai_speech;

pub use mock_speech::MockSpeechService;
pub use openai_speech::{OpenAISpeechConfig, OpenAISpeechService};
