//! Language Oracle Adapters.
//!
//! - `LlmLanguageOracle` - Prompts an `AIProvider` and decodes its replies
//! - `MockLanguageOracle` - Scripted capabilities for testing

mod decoder;
mod llm_oracle;
mod mock_oracle;
pub mod prompts;

pub use decoder::{strip_code_fences, ResponseDecoder};
pub use llm_oracle::{LlmLanguageOracle, LlmOracleConfig};
pub use mock_oracle::{MockLanguageOracle, RecordedDependencyQuery};
