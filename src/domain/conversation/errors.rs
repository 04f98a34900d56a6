//! Conversation lifecycle errors

use crate::domain::foundation::ValidationError;

use super::ConversationPhase;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversationError {
    #[error("Conversation is already finalizing")]
    AlreadyFinalizing,

    #[error("Conversation is closed")]
    Closed,

    #[error("Conversation is not finalizing (phase: {0:?})")]
    NotFinalizing(ConversationPhase),

    #[error("Invalid phase transition: {0}")]
    InvalidTransition(ValidationError),
}
