//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Language Model Ports
//!
//! - `AIProvider` - Chat-completion transport (OpenAI, mock)
//! - `LanguageOracle` - The six drafting capabilities built on a provider
//!
//! ## Infrastructure Ports
//!
//! - `ConversationStore` - Conversation persistence
//! - `SpeechService` - Speech-to-text and text-to-speech

mod ai_provider;
mod conversation_store;
mod language_oracle;
mod speech_service;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, ResponseFormat, TokenUsage,
};
pub use conversation_store::{ConversationStore, ConversationStoreError};
pub use language_oracle::{
    DependencyQuery, LanguageOracle, OracleCapability, OracleError,
};
pub use speech_service::{audio_file_extension, SpeechError, SpeechService};
