//! ConversationEngine - drives one conversation from first answer to final text.
//!
//! Every submission is staged on a copy of the question set. The copy is
//! committed to the conversation only after the oracle has answered, so an
//! oracle failure leaves the conversation exactly as it was and the caller
//! may resubmit the same input.
//!
//! The engine is not synchronized. Callers serialize access per
//! conversation (see [`ConversationLocks`](super::ConversationLocks)).

use std::sync::Arc;

use crate::domain::analysis::{DependencyVerdict, NextStep};
use crate::domain::conversation::{Conversation, ConversationError, ConversationPhase, FinalText};
use crate::domain::foundation::ConversationId;
use crate::domain::questions::{Question, QuestionSet, QuestionSetError};
use crate::ports::{LanguageOracle, OracleError};

use super::{DependencyResolver, FinalizationPipeline};

/// The user's reply to a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Skip,
}

/// One answer (or skip) aimed at a question position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub index: usize,
    pub answer: Answer,
    /// Caller's claim that this changes an earlier answer. Positions before
    /// the frontier are always treated as edits.
    pub is_edit: bool,
    /// Finish after recording the answer, without asking the oracle.
    pub finish: bool,
}

impl Submission {
    pub fn answer(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            answer: Answer::Text(text.into()),
            is_edit: false,
            finish: false,
        }
    }

    pub fn skip(index: usize) -> Self {
        Self {
            index,
            answer: Answer::Skip,
            is_edit: false,
            finish: false,
        }
    }

    pub fn as_edit(mut self) -> Self {
        self.is_edit = true;
        self
    }

    pub fn finishing(mut self) -> Self {
        self.finish = true;
        self
    }
}

/// What happened to the conversation after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// A new question was appended; still collecting.
    Asked(Question),
    /// The conversation entered `Finalizing`.
    ReadyToFinalize,
}

/// Result of a full submission, finalization included.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    NextQuestion(Question),
    Finalized(FinalText),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("Language oracle unavailable: {0}")]
    OracleUnavailable(#[source] OracleError),

    #[error("Question index {index} is out of bounds (set has {len} questions)")]
    InvalidIndex { index: usize, len: usize },

    #[error("Conversation is already finalizing")]
    AlreadyFinalizing,

    #[error("Conversation is closed")]
    ConversationClosed,

    #[error("Answer text must not be empty")]
    EmptyAnswer,

    #[error("Nothing has been answered yet")]
    NothingAnswered,

    #[error("Invalid question set: {0}")]
    InvalidQuestionSet(QuestionSetError),

    #[error(transparent)]
    Lifecycle(ConversationError),
}

impl From<ConversationError> for EngineError {
    fn from(err: ConversationError) -> Self {
        match err {
            ConversationError::AlreadyFinalizing => EngineError::AlreadyFinalizing,
            ConversationError::Closed => EngineError::ConversationClosed,
            other => EngineError::Lifecycle(other),
        }
    }
}

impl From<QuestionSetError> for EngineError {
    fn from(err: QuestionSetError) -> Self {
        match err {
            QuestionSetError::InvalidIndex { index, len } => EngineError::InvalidIndex { index, len },
            other => EngineError::InvalidQuestionSet(other),
        }
    }
}

/// State machine over a single conversation.
#[derive(Clone)]
pub struct ConversationEngine {
    oracle: Arc<dyn LanguageOracle>,
    resolver: DependencyResolver,
    pipeline: FinalizationPipeline,
}

impl ConversationEngine {
    pub fn new(oracle: Arc<dyn LanguageOracle>, pipeline: FinalizationPipeline) -> Self {
        Self {
            resolver: DependencyResolver::new(oracle.clone()),
            oracle,
            pipeline,
        }
    }

    /// Records a submission and either asks the next question or moves the
    /// conversation to `Finalizing`. Does not run the pipeline.
    ///
    /// # Errors
    ///
    /// - `AlreadyFinalizing` / `ConversationClosed` outside `Collecting`
    /// - `InvalidIndex` for a position outside the question set
    /// - `EmptyAnswer` for blank answer text
    /// - `OracleUnavailable` if next-question generation fails; nothing is
    ///   committed in that case
    pub async fn advance(
        &self,
        conversation: &mut Conversation,
        submission: Submission,
    ) -> Result<Advance, EngineError> {
        conversation.ensure_collecting()?;

        let conversation_id = conversation.id();
        let mut staged = conversation.questions().clone();
        let index = submission.index;
        let target = staged
            .get(index)
            .cloned()
            .ok_or(EngineError::InvalidIndex {
                index,
                len: staged.len(),
            })?;

        match submission.answer {
            Answer::Skip => {
                staged.record_skip(index)?;
                staged.set_followup_needed(true);
                tracing::debug!(conversation_id = %conversation_id, index, "question skipped");
            }
            Answer::Text(text) => {
                if text.trim().is_empty() {
                    return Err(EngineError::EmptyAnswer);
                }
                let before_frontier = staged.frontier_index().is_some_and(|frontier| index < frontier);
                if before_frontier || (submission.is_edit && target.is_answered()) {
                    self.resolve_edit(conversation_id, &mut staged, index, text)
                        .await?;
                } else {
                    staged.record_answer(index, text)?;
                }
            }
        }

        if submission.finish {
            return self.enter_finalizing(conversation, staged);
        }

        let step = self
            .oracle
            .propose_next_or_finish(conversation_id, &staged)
            .await
            .map_err(|err| {
                tracing::warn!(
                    conversation_id = %conversation_id,
                    index,
                    error = %err,
                    "next question generation failed, submission not applied"
                );
                EngineError::OracleUnavailable(err)
            })?;

        match step {
            NextStep::Ask { question } => {
                staged.set_followup_needed(true);
                let asked = staged.append_question(question).clone();
                conversation.commit_questions(staged)?;
                tracing::debug!(
                    conversation_id = %conversation_id,
                    question_id = %asked.id,
                    "asked next question"
                );
                Ok(Advance::Asked(asked))
            }
            NextStep::Finish => self.enter_finalizing(conversation, staged),
        }
    }

    /// Applies an edit of an answered question to a staged question set.
    ///
    /// Downstream answers survive up to the first one the oracle judges
    /// affected. Unchanged text keeps every downstream answer without an
    /// oracle call. Trailing unanswered questions are dropped and another
    /// question is requested.
    pub async fn resolve_edit(
        &self,
        conversation_id: ConversationId,
        staged: &mut QuestionSet,
        index: usize,
        new_answer: String,
    ) -> Result<Vec<DependencyVerdict>, EngineError> {
        let original = staged
            .get(index)
            .cloned()
            .ok_or(EngineError::InvalidIndex {
                index,
                len: staged.len(),
            })?;
        let unchanged = original.is_answered() && original.response == new_answer;

        staged.record_answer(index, new_answer.as_str())?;

        let verdicts = if unchanged {
            Vec::new()
        } else {
            let verdicts = self
                .resolver
                .resolve(
                    conversation_id,
                    &original.response,
                    &new_answer,
                    original.id,
                    staged.questions(),
                )
                .await;
            let removed = DependencyResolver::apply(staged, &verdicts);
            tracing::info!(
                conversation_id = %conversation_id,
                question_id = %original.id,
                removed,
                "answer edited"
            );
            verdicts
        };

        staged.drop_unanswered_tail();
        staged.set_followup_needed(true);
        Ok(verdicts)
    }

    /// The explicit finish signal: moves to `Finalizing` whatever the
    /// follow-up flag says. Unanswered trailing questions are dropped.
    pub fn finish(&self, conversation: &mut Conversation) -> Result<(), EngineError> {
        conversation.ensure_collecting()?;
        let staged = conversation.questions().clone();
        self.enter_finalizing(conversation, staged).map(|_| ())
    }

    /// Runs the finalization pipeline for a conversation in `Finalizing`.
    ///
    /// A generation failure closes the conversation as failed and is
    /// reported as `OracleUnavailable`.
    pub async fn finalize(&self, conversation: &mut Conversation) -> Result<FinalText, EngineError> {
        match conversation.phase() {
            ConversationPhase::Finalizing => {}
            ConversationPhase::Done => return Err(EngineError::ConversationClosed),
            phase => return Err(ConversationError::NotFinalizing(phase).into()),
        }

        let result = self
            .pipeline
            .finalize(conversation.id(), conversation.questions(), conversation.context())
            .await;

        match result {
            Ok(final_text) => {
                conversation.complete(final_text.clone())?;
                tracing::info!(
                    conversation_id = %conversation.id(),
                    unverified = final_text.is_unverified(),
                    "conversation completed"
                );
                Ok(final_text)
            }
            Err(err) => {
                conversation.fail(err.to_string())?;
                tracing::warn!(
                    conversation_id = %conversation.id(),
                    error = %err,
                    "conversation failed during finalization"
                );
                Err(EngineError::OracleUnavailable(err))
            }
        }
    }

    /// `advance` followed by `finalize` when the conversation is ready.
    pub async fn submit_answer(
        &self,
        conversation: &mut Conversation,
        submission: Submission,
    ) -> Result<SubmitOutcome, EngineError> {
        match self.advance(conversation, submission).await? {
            Advance::Asked(question) => Ok(SubmitOutcome::NextQuestion(question)),
            Advance::ReadyToFinalize => self
                .finalize(conversation)
                .await
                .map(SubmitOutcome::Finalized),
        }
    }

    fn enter_finalizing(
        &self,
        conversation: &mut Conversation,
        mut staged: QuestionSet,
    ) -> Result<Advance, EngineError> {
        staged.drop_unanswered_tail();
        if staged.answered().next().is_none() {
            return Err(EngineError::NothingAnswered);
        }

        conversation.commit_questions(staged)?;
        conversation.begin_finalizing()?;
        tracing::info!(
            conversation_id = %conversation.id(),
            questions = conversation.questions().len(),
            "conversation finalizing"
        );
        Ok(Advance::ReadyToFinalize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::oracle::MockLanguageOracle;
    use crate::application::FinalizationConfig;
    use crate::domain::conversation::{DraftContext, Verification};
    use crate::domain::questions::{QuestionId, QuestionStatus, SKIP_SENTINEL};
    use crate::ports::OracleCapability;

    const SEED: &str = "What would you like to write?";

    fn engine(oracle: &MockLanguageOracle) -> ConversationEngine {
        let oracle: Arc<dyn LanguageOracle> = Arc::new(oracle.clone());
        let pipeline = FinalizationPipeline::new(oracle.clone(), FinalizationConfig::default());
        ConversationEngine::new(oracle, pipeline)
    }

    fn conversation() -> Conversation {
        Conversation::start(SEED, DraftContext::default())
    }

    /// Conversation with `answered` answered questions and one open frontier.
    fn conversation_with(answered: usize) -> Conversation {
        let mut set = QuestionSet::with_seed(SEED);
        for i in 0..answered {
            set.record_answer(i, format!("answer {}", i + 1)).unwrap();
            set.append_question(format!("Question {}", i + 2));
        }
        Conversation::from_question_set(ConversationId::new(), set, DraftContext::default())
    }

    fn timeout() -> OracleError {
        OracleError::Timeout {
            capability: OracleCapability::ProposeNext,
            timeout_secs: 30,
        }
    }

    #[tokio::test]
    async fn answer_at_frontier_asks_next_question() {
        let oracle = MockLanguageOracle::new().with_next_question("Who is it for?");
        let mut conv = conversation();

        let advance = engine(&oracle)
            .advance(&mut conv, Submission::answer(0, "a thank-you note"))
            .await
            .unwrap();

        let Advance::Asked(question) = advance else {
            panic!("expected a question");
        };
        assert_eq!(question.id, QuestionId::new(2));
        assert_eq!(question.text, "Who is it for?");
        assert_eq!(conv.questions().len(), 2);
        assert_eq!(conv.questions().questions()[0].response, "a thank-you note");
        assert!(conv.questions().followup_needed());
        assert_eq!(conv.phase(), ConversationPhase::Collecting);
    }

    #[tokio::test]
    async fn oracle_finish_moves_to_finalizing() {
        let oracle = MockLanguageOracle::new().with_finish();
        let mut conv = conversation();

        let advance = engine(&oracle)
            .advance(&mut conv, Submission::answer(0, "a note"))
            .await
            .unwrap();

        assert_eq!(advance, Advance::ReadyToFinalize);
        assert_eq!(conv.phase(), ConversationPhase::Finalizing);
        assert!(conv.questions().is_complete());
    }

    #[tokio::test]
    async fn oracle_failure_leaves_conversation_untouched() {
        let oracle = MockLanguageOracle::new()
            .with_next_step_error(timeout())
            .with_next_question("Who is it for?");
        let engine = engine(&oracle);
        let mut conv = conversation_with(2);
        let before = conv.questions().clone();

        let err = engine
            .advance(&mut conv, Submission::answer(2, "tomorrow"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::OracleUnavailable(_)));
        assert_eq!(conv.questions(), &before);

        let retry = engine
            .advance(&mut conv, Submission::answer(2, "tomorrow"))
            .await
            .unwrap();
        assert!(matches!(retry, Advance::Asked(_)));
    }

    #[tokio::test]
    async fn out_of_bounds_index_is_rejected() {
        let oracle = MockLanguageOracle::new();
        let mut conv = conversation();

        let err = engine(&oracle)
            .advance(&mut conv, Submission::answer(3, "x"))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::InvalidIndex { index: 3, len: 1 }));
        assert_eq!(oracle.call_count(OracleCapability::ProposeNext), 0);
    }

    #[tokio::test]
    async fn blank_answer_is_rejected() {
        let oracle = MockLanguageOracle::new();
        let mut conv = conversation();

        let err = engine(&oracle)
            .advance(&mut conv, Submission::answer(0, "   "))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::EmptyAnswer));
    }

    #[tokio::test]
    async fn skip_truncates_without_dependency_analysis() {
        let oracle = MockLanguageOracle::new().with_next_question("Replacement?");
        let mut conv = conversation_with(3);

        engine(&oracle)
            .advance(&mut conv, Submission::skip(1))
            .await
            .unwrap();

        let questions = conv.questions().questions();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[1].status, QuestionStatus::Skipped);
        assert_eq!(questions[1].response, SKIP_SENTINEL);
        assert_eq!(questions[2].text, "Replacement?");
        assert_eq!(oracle.call_count(OracleCapability::AnalyzeDependencies), 0);
    }

    #[tokio::test]
    async fn earlier_position_is_an_edit_even_without_flag() {
        let oracle = MockLanguageOracle::new()
            .with_verdicts(vec![
                DependencyVerdict::unaffected(QuestionId::new(2), "independent"),
                DependencyVerdict::affected(QuestionId::new(3), "depends on recipient"),
            ])
            .with_next_question("New follow-up?");
        let mut conv = conversation_with(3);

        engine(&oracle)
            .advance(&mut conv, Submission::answer(0, "a resignation letter"))
            .await
            .unwrap();

        let questions = conv.questions().questions();
        assert_eq!(oracle.call_count(OracleCapability::AnalyzeDependencies), 1);
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].response, "a resignation letter");
        assert_eq!(questions[1].response, "answer 2");
        assert_eq!(questions[2].text, "New follow-up?");
        assert_eq!(questions[2].id, QuestionId::new(5));
    }

    #[tokio::test]
    async fn unchanged_edit_keeps_downstream_without_oracle() {
        let oracle = MockLanguageOracle::new();
        let engine = engine(&oracle);
        let mut staged = conversation_with(3).questions().clone();

        let verdicts = engine
            .resolve_edit(ConversationId::new(), &mut staged, 0, "answer 1".to_string())
            .await
            .unwrap();

        assert!(verdicts.is_empty());
        assert_eq!(oracle.call_count(OracleCapability::AnalyzeDependencies), 0);
        assert_eq!(staged.len(), 3);
        assert!(staged.followup_needed());
    }

    #[tokio::test]
    async fn finish_flag_skips_next_question_generation() {
        let oracle = MockLanguageOracle::new().with_next_question("never asked");
        let mut conv = conversation_with(1);

        let advance = engine(&oracle)
            .advance(&mut conv, Submission::answer(1, "Friday").finishing())
            .await
            .unwrap();

        assert_eq!(advance, Advance::ReadyToFinalize);
        assert_eq!(oracle.call_count(OracleCapability::ProposeNext), 0);
        assert_eq!(conv.questions().len(), 2);
    }

    #[tokio::test]
    async fn finish_signal_drops_open_question() {
        let oracle = MockLanguageOracle::new();
        let mut conv = conversation_with(2);

        engine(&oracle).finish(&mut conv).unwrap();

        assert_eq!(conv.phase(), ConversationPhase::Finalizing);
        assert_eq!(conv.questions().len(), 2);
        assert_eq!(conv.questions().answered().count(), 2);
    }

    #[tokio::test]
    async fn finish_with_nothing_answered_is_rejected() {
        let oracle = MockLanguageOracle::new();
        let mut conv = conversation();

        let err = engine(&oracle).finish(&mut conv).unwrap_err();

        assert!(matches!(err, EngineError::NothingAnswered));
        assert_eq!(conv.phase(), ConversationPhase::Collecting);
    }

    #[tokio::test]
    async fn second_submission_while_finalizing_is_rejected() {
        let oracle = MockLanguageOracle::new().with_finish();
        let engine = engine(&oracle);
        let mut conv = conversation();
        engine
            .advance(&mut conv, Submission::answer(0, "a note"))
            .await
            .unwrap();

        let err = engine
            .advance(&mut conv, Submission::answer(0, "again"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::AlreadyFinalizing));
        assert!(matches!(engine.finish(&mut conv), Err(EngineError::AlreadyFinalizing)));
    }

    #[tokio::test]
    async fn submit_answer_runs_pipeline_to_done() {
        let oracle = MockLanguageOracle::new()
            .with_finish()
            .with_final_text("Thank you, Ms. Lee.");
        let mut conv = conversation();

        let outcome = engine(&oracle)
            .submit_answer(&mut conv, Submission::answer(0, "a thank-you note"))
            .await
            .unwrap();

        let SubmitOutcome::Finalized(final_text) = outcome else {
            panic!("expected final text");
        };
        assert_eq!(final_text.text, "Thank you, Ms. Lee.");
        assert_eq!(final_text.verification, Verification::Verified { attempts: 1 });
        assert_eq!(conv.phase(), ConversationPhase::Done);
        assert_eq!(conv.final_text(), Some(&final_text));
    }

    #[tokio::test]
    async fn generation_failure_closes_conversation_as_failed() {
        let oracle = MockLanguageOracle::new()
            .with_finish()
            .with_generation_error(OracleError::malformed(
                OracleCapability::GenerateFinalText,
                "empty reply",
            ));
        let engine = engine(&oracle);
        let mut conv = conversation();

        let err = engine
            .submit_answer(&mut conv, Submission::answer(0, "a note"))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::OracleUnavailable(_)));
        assert_eq!(conv.phase(), ConversationPhase::Done);
        assert!(conv.final_text().is_none());
        assert!(matches!(
            engine.finalize(&mut conv).await,
            Err(EngineError::ConversationClosed)
        ));
    }

    #[tokio::test]
    async fn finalize_requires_finalizing_phase() {
        let oracle = MockLanguageOracle::new();
        let mut conv = conversation();

        let err = engine(&oracle).finalize(&mut conv).await.unwrap_err();

        assert!(matches!(
            err,
            EngineError::Lifecycle(ConversationError::NotFinalizing(ConversationPhase::Collecting))
        ));
    }
}
