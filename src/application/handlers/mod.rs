//! Application handlers.
//!
//! Command and query handlers that orchestrate the engine and the ports.

pub mod conversation;

pub use conversation::{
    AbandonConversationCommand, AbandonConversationError, AbandonConversationHandler,
    ComposeCommand, ComposeHandler, ComposeResult, FinishConversationCommand,
    FinishConversationError, FinishConversationHandler, FinishConversationResult,
    GetConversationError, GetConversationHandler, GetConversationQuery, StartConversationCommand,
    StartConversationError, StartConversationHandler, StartConversationResult,
    SubmitAnswerCommand, SubmitAnswerError, SubmitAnswerHandler, SubmitAnswerResult,
};
