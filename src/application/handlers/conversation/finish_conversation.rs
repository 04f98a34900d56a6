//! FinishConversationHandler - Explicit finish signal for a stored conversation.
//!
//! Finalization holds the conversation's lock until its outcome is saved.
//! A conversation found in `Finalizing` with the lock free was left there by
//! a run that never completed (for example, the process stopped), so the
//! pipeline is started again.

use std::sync::Arc;

use crate::application::{ConversationEngine, ConversationLocks, EngineError};
use crate::domain::conversation::{Conversation, ConversationPhase, FinalText};
use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationStore, ConversationStoreError};

use super::{acquire, finalize_detached, save_unless_abandoned, AcquireError};

#[derive(Debug, Clone)]
pub struct FinishConversationCommand {
    pub conversation_id: ConversationId,
}

#[derive(Debug, Clone)]
pub struct FinishConversationResult {
    pub conversation: Conversation,
    pub final_text: FinalText,
}

#[derive(Debug, thiserror::Error)]
pub enum FinishConversationError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Conversation {0} is busy with another request")]
    Busy(ConversationId),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<ConversationStoreError> for FinishConversationError {
    fn from(err: ConversationStoreError) -> Self {
        match err {
            ConversationStoreError::NotFound(id) => FinishConversationError::NotFound(id),
            other => FinishConversationError::Storage(other.to_string()),
        }
    }
}

pub struct FinishConversationHandler {
    store: Arc<dyn ConversationStore>,
    engine: ConversationEngine,
    locks: ConversationLocks,
}

impl FinishConversationHandler {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        engine: ConversationEngine,
        locks: ConversationLocks,
    ) -> Self {
        Self {
            store,
            engine,
            locks,
        }
    }

    pub async fn handle(
        &self,
        cmd: FinishConversationCommand,
    ) -> Result<FinishConversationResult, FinishConversationError> {
        let id = cmd.conversation_id;
        let guard = acquire(&self.locks, self.store.as_ref(), id)
            .await
            .map_err(|err| match err {
                AcquireError::AlreadyFinalizing => EngineError::AlreadyFinalizing.into(),
                AcquireError::Busy => FinishConversationError::Busy(id),
                AcquireError::Store(err) => err.into(),
            })?;

        let mut conversation = self.store.load(id).await?;
        if conversation.phase() == ConversationPhase::Finalizing {
            tracing::warn!(conversation_id = %id, "resuming interrupted finalization");
        } else {
            self.engine.finish(&mut conversation)?;
            save_unless_abandoned(self.store.as_ref(), &conversation).await?;
        }

        let (conversation, finalized) =
            finalize_detached(self.store.clone(), self.engine.clone(), guard, conversation)
                .await?;

        Ok(FinishConversationResult {
            conversation,
            final_text: finalized?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::oracle::MockLanguageOracle;
    use crate::adapters::storage::InMemoryConversationStore;
    use crate::application::{FinalizationConfig, FinalizationPipeline};
    use crate::domain::conversation::DraftContext;
    use crate::ports::{LanguageOracle, OracleCapability};
    use std::time::Duration;

    fn handler(
        oracle: &MockLanguageOracle,
        store: Arc<InMemoryConversationStore>,
    ) -> FinishConversationHandler {
        let oracle: Arc<dyn LanguageOracle> = Arc::new(oracle.clone());
        let pipeline = FinalizationPipeline::new(oracle.clone(), FinalizationConfig::default());
        FinishConversationHandler::new(
            store,
            ConversationEngine::new(oracle, pipeline),
            ConversationLocks::new(),
        )
    }

    async fn answered_conversation(store: &InMemoryConversationStore) -> Conversation {
        let mut conv = Conversation::start("What would you like to write?", DraftContext::default());
        let mut staged = conv.questions().clone();
        staged.record_answer(0, "a birthday message for my sister").unwrap();
        staged.append_question("How old is she turning?");
        conv.commit_questions(staged).unwrap();
        store.save(&conv).await.unwrap();
        conv
    }

    #[tokio::test]
    async fn finish_finalizes_without_asking_oracle_for_more() {
        let oracle = MockLanguageOracle::new().with_final_text("Happy birthday!");
        let store = Arc::new(InMemoryConversationStore::new());
        let conv = answered_conversation(&store).await;

        let result = handler(&oracle, store.clone())
            .handle(FinishConversationCommand {
                conversation_id: conv.id(),
            })
            .await
            .unwrap();

        assert_eq!(result.final_text.text, "Happy birthday!");
        assert_eq!(result.conversation.questions().len(), 1);
        assert_eq!(oracle.call_count(OracleCapability::ProposeNext), 0);
        assert_eq!(store.load(conv.id()).await.unwrap().phase(), ConversationPhase::Done);
    }

    #[tokio::test]
    async fn finishing_a_done_conversation_is_rejected() {
        let oracle = MockLanguageOracle::new();
        let store = Arc::new(InMemoryConversationStore::new());
        let conv = answered_conversation(&store).await;
        let handler = handler(&oracle, store);
        let cmd = FinishConversationCommand {
            conversation_id: conv.id(),
        };

        handler.handle(cmd.clone()).await.unwrap();
        let err = handler.handle(cmd).await.unwrap_err();

        assert!(matches!(err, FinishConversationError::Engine(EngineError::ConversationClosed)));
    }

    #[tokio::test]
    async fn interrupted_finalization_completes_on_retry() {
        let oracle = MockLanguageOracle::new().with_delay(Duration::from_millis(100));
        let store = Arc::new(InMemoryConversationStore::new());
        let conv = answered_conversation(&store).await;
        let handler = handler(&oracle, store.clone());
        let cmd = FinishConversationCommand {
            conversation_id: conv.id(),
        };

        let cancelled =
            tokio::time::timeout(Duration::from_millis(20), handler.handle(cmd.clone())).await;
        assert!(cancelled.is_err());

        let mut result = handler.handle(cmd.clone()).await;
        for _ in 0..50 {
            if !matches!(
                result,
                Err(FinishConversationError::Engine(EngineError::AlreadyFinalizing))
            ) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
            result = handler.handle(cmd.clone()).await;
        }

        let stored = store.load(conv.id()).await.unwrap();
        assert_eq!(stored.phase(), ConversationPhase::Done);
        assert!(matches!(
            result,
            Err(FinishConversationError::Engine(EngineError::ConversationClosed))
        ));
        assert_eq!(oracle.call_count(OracleCapability::GenerateFinalText), 1);
    }

    #[tokio::test]
    async fn stranded_finalizing_conversation_is_resumed() {
        let oracle = MockLanguageOracle::new().with_final_text("Get well soon!");
        let store = Arc::new(InMemoryConversationStore::new());
        let mut conv = answered_conversation(&store).await;
        conv.begin_finalizing().unwrap();
        store.save(&conv).await.unwrap();

        let result = handler(&oracle, store.clone())
            .handle(FinishConversationCommand {
                conversation_id: conv.id(),
            })
            .await
            .unwrap();

        assert_eq!(result.final_text.text, "Get well soon!");
        assert_eq!(store.load(conv.id()).await.unwrap().phase(), ConversationPhase::Done);
    }

    #[tokio::test]
    async fn unanswered_conversation_cannot_finish() {
        let oracle = MockLanguageOracle::new();
        let store = Arc::new(InMemoryConversationStore::new());
        let conv = Conversation::start("What would you like to write?", DraftContext::default());
        store.save(&conv).await.unwrap();

        let err = handler(&oracle, store)
            .handle(FinishConversationCommand {
                conversation_id: conv.id(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, FinishConversationError::Engine(EngineError::NothingAnswered)));
    }
}
