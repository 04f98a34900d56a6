//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Chat completion providers (OpenAI, mock)
//! - `oracle` - Language oracle built on an AI provider
//! - `storage` - Conversation stores (in-memory, YAML files)
//! - `speech` - Transcription and text-to-speech
//! - `http` - REST API

pub mod ai;
pub mod http;
pub mod oracle;
pub mod speech;
pub mod storage;
