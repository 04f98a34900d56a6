//! GetConversationHandler - Query handler for a conversation snapshot.

use std::sync::Arc;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationStore, ConversationStoreError};

#[derive(Debug, Clone)]
pub struct GetConversationQuery {
    pub conversation_id: ConversationId,
}

#[derive(Debug, thiserror::Error)]
pub enum GetConversationError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<ConversationStoreError> for GetConversationError {
    fn from(err: ConversationStoreError) -> Self {
        match err {
            ConversationStoreError::NotFound(id) => GetConversationError::NotFound(id),
            other => GetConversationError::Storage(other.to_string()),
        }
    }
}

pub struct GetConversationHandler {
    store: Arc<dyn ConversationStore>,
}

impl GetConversationHandler {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: GetConversationQuery,
    ) -> Result<Conversation, GetConversationError> {
        Ok(self.store.load(query.conversation_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryConversationStore;
    use crate::domain::conversation::DraftContext;

    #[tokio::test]
    async fn returns_stored_conversation() {
        let store = Arc::new(InMemoryConversationStore::new());
        let conv = Conversation::start("What would you like to write?", DraftContext::default());
        store.save(&conv).await.unwrap();

        let found = GetConversationHandler::new(store)
            .handle(GetConversationQuery {
                conversation_id: conv.id(),
            })
            .await
            .unwrap();

        assert_eq!(found.id(), conv.id());
    }

    #[tokio::test]
    async fn missing_conversation_is_not_found() {
        let store = Arc::new(InMemoryConversationStore::new());

        let err = GetConversationHandler::new(store)
            .handle(GetConversationQuery {
                conversation_id: ConversationId::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, GetConversationError::NotFound(_)));
    }
}
