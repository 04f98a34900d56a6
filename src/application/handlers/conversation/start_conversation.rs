//! StartConversationHandler - Create a conversation with its seed question.

use std::sync::Arc;

use crate::domain::conversation::{Conversation, DraftContext};
use crate::ports::{ConversationStore, ConversationStoreError};

/// Command to start a drafting conversation.
#[derive(Debug, Clone, Default)]
pub struct StartConversationCommand {
    /// Overrides the configured seed question when non-blank.
    pub seed_question: Option<String>,
    pub draft_context: DraftContext,
}

#[derive(Debug, Clone)]
pub struct StartConversationResult {
    pub conversation: Conversation,
}

#[derive(Debug, thiserror::Error)]
pub enum StartConversationError {
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<ConversationStoreError> for StartConversationError {
    fn from(err: ConversationStoreError) -> Self {
        StartConversationError::Storage(err.to_string())
    }
}

pub struct StartConversationHandler {
    store: Arc<dyn ConversationStore>,
    default_seed: String,
}

impl StartConversationHandler {
    pub fn new(store: Arc<dyn ConversationStore>, default_seed: impl Into<String>) -> Self {
        Self {
            store,
            default_seed: default_seed.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: StartConversationCommand,
    ) -> Result<StartConversationResult, StartConversationError> {
        let seed = cmd
            .seed_question
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.default_seed.clone());

        let conversation = Conversation::start(seed, cmd.draft_context);
        self.store.save(&conversation).await?;

        tracing::info!(
            conversation_id = %conversation.id(),
            kind = conversation.context().kind.as_str(),
            "conversation started"
        );

        Ok(StartConversationResult { conversation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryConversationStore;
    use crate::domain::conversation::DraftKind;

    const DEFAULT_SEED: &str = "What would you like to write?";

    #[tokio::test]
    async fn starts_with_default_seed_and_persists() {
        let store = Arc::new(InMemoryConversationStore::new());
        let handler = StartConversationHandler::new(store.clone(), DEFAULT_SEED);

        let result = handler
            .handle(StartConversationCommand::default())
            .await
            .unwrap();

        let questions = result.conversation.questions().questions();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, DEFAULT_SEED);
        assert!(store.exists(result.conversation.id()).await.unwrap());
    }

    #[tokio::test]
    async fn custom_seed_and_context_are_used() {
        let store = Arc::new(InMemoryConversationStore::new());
        let handler = StartConversationHandler::new(store, DEFAULT_SEED);

        let result = handler
            .handle(StartConversationCommand {
                seed_question: Some("What are you replying to?".to_string()),
                draft_context: DraftContext::new(DraftKind::Reply)
                    .with_external_context("Are you free Friday?"),
            })
            .await
            .unwrap();

        let conv = result.conversation;
        assert_eq!(conv.questions().questions()[0].text, "What are you replying to?");
        assert_eq!(conv.context().external_context(), Some("Are you free Friday?"));
    }

    #[tokio::test]
    async fn blank_seed_falls_back_to_default() {
        let store = Arc::new(InMemoryConversationStore::new());
        let handler = StartConversationHandler::new(store, DEFAULT_SEED);

        let result = handler
            .handle(StartConversationCommand {
                seed_question: Some("  ".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(result.conversation.questions().questions()[0].text, DEFAULT_SEED);
    }
}
