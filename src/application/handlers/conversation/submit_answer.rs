//! SubmitAnswerHandler - Answer, skip, or edit a question in a stored conversation.
//!
//! When the answer completes the conversation, the `Finalizing` phase is
//! saved before the pipeline runs so concurrent requests observe it. The
//! pipeline itself runs detached from the request; see
//! [`FinishConversationHandler`](super::FinishConversationHandler).

use std::sync::Arc;

use crate::application::{
    Advance, ConversationEngine, ConversationLocks, EngineError, SubmitOutcome, Submission,
};
use crate::domain::conversation::Conversation;
use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationStore, ConversationStoreError};

use super::{acquire, finalize_detached, save_unless_abandoned, AcquireError};

/// Command to submit one answer.
#[derive(Debug, Clone)]
pub struct SubmitAnswerCommand {
    pub conversation_id: ConversationId,
    pub submission: Submission,
}

#[derive(Debug, Clone)]
pub struct SubmitAnswerResult {
    pub conversation: Conversation,
    pub outcome: SubmitOutcome,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitAnswerError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Conversation {0} is busy with another request")]
    Busy(ConversationId),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<ConversationStoreError> for SubmitAnswerError {
    fn from(err: ConversationStoreError) -> Self {
        match err {
            ConversationStoreError::NotFound(id) => SubmitAnswerError::NotFound(id),
            other => SubmitAnswerError::Storage(other.to_string()),
        }
    }
}

impl SubmitAnswerError {
    fn from_acquire(id: ConversationId, err: AcquireError) -> Self {
        match err {
            AcquireError::AlreadyFinalizing => EngineError::AlreadyFinalizing.into(),
            AcquireError::Busy => SubmitAnswerError::Busy(id),
            AcquireError::Store(err) => err.into(),
        }
    }
}

pub struct SubmitAnswerHandler {
    store: Arc<dyn ConversationStore>,
    engine: ConversationEngine,
    locks: ConversationLocks,
}

impl SubmitAnswerHandler {
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
        cmd: SubmitAnswerCommand,
    ) -> Result<SubmitAnswerResult, SubmitAnswerError> {
        let id = cmd.conversation_id;
        let guard = acquire(&self.locks, self.store.as_ref(), id)
            .await
            .map_err(|e| SubmitAnswerError::from_acquire(id, e))?;

        // 1. Load and advance
        let mut conversation = self.store.load(id).await?;
        let advance = self.engine.advance(&mut conversation, cmd.submission).await?;

        // 2. Persist the new question, or the Finalizing phase
        save_unless_abandoned(self.store.as_ref(), &conversation).await?;

        match advance {
            Advance::Asked(question) => Ok(SubmitAnswerResult {
                conversation,
                outcome: SubmitOutcome::NextQuestion(question),
            }),
            Advance::ReadyToFinalize => {
                // 3. Run the pipeline and persist the terminal state either way
                let (conversation, finalized) = finalize_detached(
                    self.store.clone(),
                    self.engine.clone(),
                    guard,
                    conversation,
                )
                .await?;
                Ok(SubmitAnswerResult {
                    conversation,
                    outcome: SubmitOutcome::Finalized(finalized?),
                })
            }
        }
    }
}
