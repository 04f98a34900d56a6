//! Conversation aggregate - one drafting session from seed question to output.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, StateMachine, Timestamp};
use crate::domain::questions::QuestionSet;

use super::{ConversationError, ConversationOutcome, ConversationPhase, DraftContext, FinalText};

/// A drafting conversation.
///
/// Owns its [`QuestionSet`] exclusively. The question set only changes
/// while `Collecting`; the engine stages mutations on a copy and commits
/// them here once every oracle call for the submission has succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    questions: QuestionSet,
    phase: ConversationPhase,
    context: DraftContext,
    outcome: Option<ConversationOutcome>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Conversation {
    /// Starts a conversation with a single seed question.
    pub fn start(seed_question: impl Into<String>, context: DraftContext) -> Self {
        Self::from_question_set(ConversationId::new(), QuestionSet::with_seed(seed_question), context)
    }

    /// Wraps an existing question set in a fresh `Collecting` conversation.
    pub fn from_question_set(
        id: ConversationId,
        questions: QuestionSet,
        context: DraftContext,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            questions,
            phase: ConversationPhase::Collecting,
            context,
            outcome: None,
            created_at: now,
            updated_at: now,
        }
    }

    // === Accessors ===

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn phase(&self) -> ConversationPhase {
        self.phase
    }

    pub fn context(&self) -> &DraftContext {
        &self.context
    }

    pub fn outcome(&self) -> Option<&ConversationOutcome> {
        self.outcome.as_ref()
    }

    pub fn final_text(&self) -> Option<&FinalText> {
        match &self.outcome {
            Some(ConversationOutcome::Completed { final_text }) => Some(final_text),
            _ => None,
        }
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // === State Transitions ===

    /// Fails unless the conversation still accepts answers.
    pub fn ensure_collecting(&self) -> Result<(), ConversationError> {
        match self.phase {
            ConversationPhase::Collecting => Ok(()),
            ConversationPhase::Finalizing => Err(ConversationError::AlreadyFinalizing),
            ConversationPhase::Done => Err(ConversationError::Closed),
        }
    }

    /// Replaces the question set with a staged copy.
    pub fn commit_questions(&mut self, questions: QuestionSet) -> Result<(), ConversationError> {
        self.ensure_collecting()?;
        self.questions = questions;
        self.touch();
        Ok(())
    }

    /// Moves to `Finalizing`; the question set is marked complete.
    ///
    /// A second request while finalization is pending is rejected with
    /// `AlreadyFinalizing`.
    pub fn begin_finalizing(&mut self) -> Result<(), ConversationError> {
        self.ensure_collecting()?;
        self.phase = self
            .phase
            .transition_to(ConversationPhase::Finalizing)
            .map_err(ConversationError::InvalidTransition)?;
        self.questions.set_followup_needed(false);
        self.touch();
        Ok(())
    }

    /// Records the final text and closes the conversation.
    pub fn complete(&mut self, final_text: FinalText) -> Result<(), ConversationError> {
        self.finish_with(ConversationOutcome::Completed { final_text })
    }

    /// Records a finalization failure and closes the conversation.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), ConversationError> {
        self.finish_with(ConversationOutcome::Failed {
            reason: reason.into(),
        })
    }

    fn finish_with(&mut self, outcome: ConversationOutcome) -> Result<(), ConversationError> {
        if self.phase != ConversationPhase::Finalizing {
            return Err(ConversationError::NotFinalizing(self.phase));
        }
        self.phase = self
            .phase
            .transition_to(ConversationPhase::Done)
            .map_err(ConversationError::InvalidTransition)?;
        self.outcome = Some(outcome);
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
