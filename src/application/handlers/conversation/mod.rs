//! Conversation Command and Query Handlers
//!
//! ## Commands
//! - `StartConversation` - Create a conversation with its seed question
//! - `SubmitAnswer` - Answer, skip, or edit a question
//! - `FinishConversation` - Explicit finish signal
//! - `AbandonConversation` - Delete a conversation, discarding in-flight work
//! - `Compose` - Stateless round over a client-held question set
//!
//! ## Queries
//! - `GetConversation` - Current snapshot of a conversation

mod abandon_conversation;
mod compose;
mod finish_conversation;
mod get_conversation;
mod start_conversation;
mod submit_answer;

pub use abandon_conversation::{
    AbandonConversationCommand, AbandonConversationError, AbandonConversationHandler,
};
pub use compose::{ComposeCommand, ComposeHandler, ComposeResult};
pub use finish_conversation::{
    FinishConversationCommand, FinishConversationError, FinishConversationHandler,
    FinishConversationResult,
};
pub use get_conversation::{GetConversationError, GetConversationHandler, GetConversationQuery};
pub use start_conversation::{
    StartConversationCommand, StartConversationError, StartConversationHandler,
    StartConversationResult,
};
pub use submit_answer::{
    SubmitAnswerCommand, SubmitAnswerError, SubmitAnswerHandler, SubmitAnswerResult,
};

use std::sync::Arc;

use crate::application::{ConversationEngine, ConversationGuard, ConversationLocks, EngineError};
use crate::domain::conversation::{Conversation, ConversationPhase, FinalText};
use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationStore, ConversationStoreError};

/// Why a conversation could not be locked for a command.
#[derive(Debug)]
enum AcquireError {
    AlreadyFinalizing,
    Busy,
    Store(ConversationStoreError),
}

/// Takes the conversation's lock, classifying contention by the stored phase.
async fn acquire(
    locks: &ConversationLocks,
    store: &dyn ConversationStore,
    id: ConversationId,
) -> Result<ConversationGuard, AcquireError> {
    if let Some(guard) = locks.try_acquire(id) {
        return Ok(guard);
    }

    let conversation = store.load(id).await.map_err(AcquireError::Store)?;
    if conversation.phase() == ConversationPhase::Finalizing {
        Err(AcquireError::AlreadyFinalizing)
    } else {
        Err(AcquireError::Busy)
    }
}

/// Saves `conversation` unless it was deleted while the command ran.
async fn save_unless_abandoned(
    store: &dyn ConversationStore,
    conversation: &Conversation,
) -> Result<(), ConversationStoreError> {
    let result = store.update(conversation).await;
    if let Err(ConversationStoreError::NotFound(id)) = &result {
        tracing::info!(
            conversation_id = %id,
            "conversation abandoned mid-flight, discarding result"
        );
    }
    result
}

/// A finalization run: the conversation in its terminal state plus the
/// pipeline's result.
type Finalized = (Conversation, Result<FinalText, EngineError>);

/// Runs the pipeline for a `Finalizing` conversation and saves the outcome.
///
/// The work happens on its own task, which owns the conversation lock until
/// the outcome is saved. A request that is cancelled while waiting (client
/// disconnect, request timeout) leaves the task running, so the stored
/// conversation still reaches `Done`.
async fn finalize_detached(
    store: Arc<dyn ConversationStore>,
    engine: ConversationEngine,
    guard: ConversationGuard,
    mut conversation: Conversation,
) -> Result<Finalized, ConversationStoreError> {
    let task = tokio::spawn(async move {
        let _guard = guard;
        let finalized = engine.finalize(&mut conversation).await;
        save_unless_abandoned(store.as_ref(), &conversation).await?;
        Ok::<Finalized, ConversationStoreError>((conversation, finalized))
    });

    task.await.map_err(|e| {
        tracing::error!(error = %e, "finalization task did not complete");
        ConversationStoreError::Backend(format!("finalization task failed: {e}"))
    })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::oracle::MockLanguageOracle;
    use crate::adapters::storage::InMemoryConversationStore;
    use crate::application::{FinalizationConfig, FinalizationPipeline};
    use crate::domain::conversation::DraftContext;
    use crate::ports::LanguageOracle;
    use std::time::Duration;

    fn engine(oracle: MockLanguageOracle) -> ConversationEngine {
        let oracle: Arc<dyn LanguageOracle> = Arc::new(oracle);
        let pipeline = FinalizationPipeline::new(oracle.clone(), FinalizationConfig::default());
        ConversationEngine::new(oracle, pipeline)
    }

    fn finalizing_conversation() -> Conversation {
        let mut conv = Conversation::start("What would you like to write?", DraftContext::default());
        let mut staged = conv.questions().clone();
        staged.record_answer(0, "a get-well card").unwrap();
        conv.commit_questions(staged).unwrap();
        conv.begin_finalizing().unwrap();
        conv
    }

    #[tokio::test]
    async fn save_after_abandon_does_not_resurrect() {
        let store = InMemoryConversationStore::new();
        let conv = finalizing_conversation();
        store.save(&conv).await.unwrap();
        store.delete(conv.id()).await.unwrap();

        let err = save_unless_abandoned(&store, &conv).await.unwrap_err();

        assert!(matches!(err, ConversationStoreError::NotFound(_)));
        assert!(!store.exists(conv.id()).await.unwrap());
    }

    #[tokio::test]
    async fn detached_finalization_outlives_dropped_caller() {
        let store = Arc::new(InMemoryConversationStore::new());
        let locks = ConversationLocks::new();
        let conv = finalizing_conversation();
        store.save(&conv).await.unwrap();
        let guard = locks.try_acquire(conv.id()).unwrap();

        let oracle = MockLanguageOracle::new().with_delay(Duration::from_millis(50));
        let call = finalize_detached(store.clone(), engine(oracle), guard, conv.clone());
        let cancelled = tokio::time::timeout(Duration::from_millis(10), call).await;
        assert!(cancelled.is_err());
        assert!(locks.try_acquire(conv.id()).is_none());

        let mut phase = ConversationPhase::Finalizing;
        for _ in 0..100 {
            phase = store.load(conv.id()).await.unwrap().phase();
            if phase == ConversationPhase::Done {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(phase, ConversationPhase::Done);
        assert!(locks.try_acquire(conv.id()).is_some());
    }
}
