//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! - `OpenAIProvider` - OpenAI chat completions (GPT-4o family)
//! - `MockAIProvider` - Scripted completions for testing

mod mock_provider;
mod openai_provider;

pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
