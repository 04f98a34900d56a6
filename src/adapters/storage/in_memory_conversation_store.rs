//! In-Memory Conversation Store Adapter
//!
//! Keeps conversations in a process-local map. Used in development, in
//! tests, and whenever no data directory is configured.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationStore, ConversationStoreError};

/// In-memory storage for conversations
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    conversations: Arc<RwLock<HashMap<ConversationId, Conversation>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored conversations
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn save(&self, conversation: &Conversation) -> Result<(), ConversationStoreError> {
        let mut conversations = self.conversations.write().await;
        conversations.insert(conversation.id(), conversation.clone());
        Ok(())
    }

    async fn update(&self, conversation: &Conversation) -> Result<(), ConversationStoreError> {
        let mut conversations = self.conversations.write().await;
        match conversations.get_mut(&conversation.id()) {
            Some(stored) => {
                *stored = conversation.clone();
                Ok(())
            }
            None => Err(ConversationStoreError::NotFound(conversation.id())),
        }
    }

    async fn load(&self, id: ConversationId) -> Result<Conversation, ConversationStoreError> {
        let conversations = self.conversations.read().await;
        conversations
            .get(&id)
            .cloned()
            .ok_or(ConversationStoreError::NotFound(id))
    }

    async fn exists(&self, id: ConversationId) -> Result<bool, ConversationStoreError> {
        Ok(self.conversations.read().await.contains_key(&id))
    }

    async fn delete(&self, id: ConversationId) -> Result<(), ConversationStoreError> {
        let mut conversations = self.conversations.write().await;
        conversations
            .remove(&id)
            .map(|_| ())
            .ok_or(ConversationStoreError::NotFound(id))
    }
}
