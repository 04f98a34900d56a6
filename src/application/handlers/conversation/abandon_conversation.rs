//! AbandonConversationHandler - Delete a conversation.
//!
//! Does not wait for the conversation's lock. A request still running for
//! the conversation finishes its oracle calls and then discards the result.

use std::sync::Arc;

use crate::application::ConversationLocks;
use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationStore, ConversationStoreError};

#[derive(Debug, Clone)]
pub struct AbandonConversationCommand {
    pub conversation_id: ConversationId,
}

#[derive(Debug, thiserror::Error)]
pub enum AbandonConversationError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<ConversationStoreError> for AbandonConversationError {
    fn from(err: ConversationStoreError) -> Self {
        match err {
            ConversationStoreError::NotFound(id) => AbandonConversationError::NotFound(id),
            other => AbandonConversationError::Storage(other.to_string()),
        }
    }
}

pub struct AbandonConversationHandler {
    store: Arc<dyn ConversationStore>,
    locks: ConversationLocks,
}

impl AbandonConversationHandler {
    pub fn new(store: Arc<dyn ConversationStore>, locks: ConversationLocks) -> Self {
        Self { store, locks }
    }

    pub async fn handle(
        &self,
        cmd: AbandonConversationCommand,
    ) -> Result<(), AbandonConversationError> {
        self.store.delete(cmd.conversation_id).await?;
        self.locks.forget(cmd.conversation_id);

        tracing::info!(conversation_id = %cmd.conversation_id, "conversation abandoned");
        Ok(())
    }
}
