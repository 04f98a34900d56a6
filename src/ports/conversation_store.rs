//! Conversation Store Port - Interface for persisting drafting conversations.
//!
//! The engine itself is stateless between requests; handlers load a
//! conversation, drive it, and save it back through this port.

use async_trait::async_trait;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::ConversationId;

/// Errors that can occur during conversation storage operations
#[derive(Debug, thiserror::Error)]
pub enum ConversationStoreError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Failed to serialize conversation: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize conversation: {0}")]
    DeserializationFailed(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Port for persisting and loading conversations
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Save a conversation, replacing any previous version.
    ///
    /// # Errors
    /// Returns `ConversationStoreError` if save fails
    async fn save(&self, conversation: &Conversation) -> Result<(), ConversationStoreError>;

    /// Replace a conversation that already exists.
    ///
    /// The existence check and the write happen as one step, so a
    /// conversation deleted concurrently is never written back.
    ///
    /// # Errors
    /// Returns `ConversationStoreError::NotFound` if no conversation exists
    async fn update(&self, conversation: &Conversation) -> Result<(), ConversationStoreError>;

    /// Load a conversation.
    ///
    /// # Errors
    /// Returns `ConversationStoreError::NotFound` if no conversation exists
    async fn load(&self, id: ConversationId) -> Result<Conversation, ConversationStoreError>;

    /// Check if a conversation exists
    async fn exists(&self, id: ConversationId) -> Result<bool, ConversationStoreError>;

    /// Delete a conversation.
    ///
    /// # Errors
    /// Returns `ConversationStoreError::NotFound` if no conversation exists
    async fn delete(&self, id: ConversationId) -> Result<(), ConversationStoreError>;
}
