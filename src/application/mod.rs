//! Application layer - the conversation engine and its handlers.
//!
//! - `DependencyResolver` decides which answers survive an edit
//! - `FinalizationPipeline` turns a finished question set into final text
//! - `ConversationEngine` is the per-conversation state machine
//! - `ConversationLocks` serializes requests per conversation
//! - `handlers` are the CQRS-style commands and queries used by adapters

mod dependency_resolver;
mod engine;
mod finalization;
pub mod handlers;
mod locks;

pub use dependency_resolver::DependencyResolver;
pub use engine::{Advance, Answer, ConversationEngine, EngineError, SubmitOutcome, Submission};
pub use finalization::{FinalizationConfig, FinalizationPipeline, DEFAULT_MAX_FACT_CHECK_ATTEMPTS};
pub use handlers::*;
pub use locks::{ConversationGuard, ConversationLocks};
