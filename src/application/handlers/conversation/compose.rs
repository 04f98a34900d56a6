//! ComposeHandler - Stateless drafting round over a client-held question set.
//!
//! The client sends its whole question set with each answer. Nothing is
//! stored; the returned question set replaces the client's copy.

use crate::application::{Advance, ConversationEngine, EngineError, Submission};
use crate::domain::conversation::{Conversation, DraftContext, FinalText};
use crate::domain::foundation::ConversationId;
use crate::domain::questions::{Question, QuestionSet};

#[derive(Debug, Clone)]
pub struct ComposeCommand {
    pub question_set: QuestionSet,
    /// Position of an earlier question being changed; the frontier when absent.
    pub changed_index: Option<usize>,
    pub answer_text: String,
    pub is_skip: bool,
    pub is_finish_command: bool,
    pub draft_context: DraftContext,
}

#[derive(Debug, Clone)]
pub enum ComposeResult {
    NextQuestion {
        next_question: Question,
        question_set: QuestionSet,
    },
    Final {
        final_text: FinalText,
        question_set: QuestionSet,
    },
}

pub struct ComposeHandler {
    engine: ConversationEngine,
}

impl ComposeHandler {
    pub fn new(engine: ConversationEngine) -> Self {
        Self { engine }
    }

    pub async fn handle(&self, cmd: ComposeCommand) -> Result<ComposeResult, EngineError> {
        let index = cmd
            .changed_index
            .or_else(|| cmd.question_set.frontier_index())
            .unwrap_or(0);
        let bare_finish =
            cmd.is_finish_command && !cmd.is_skip && cmd.answer_text.trim().is_empty();

        let mut conversation = Conversation::from_question_set(
            ConversationId::new(),
            cmd.question_set,
            cmd.draft_context,
        );

        let advance = if bare_finish {
            self.engine.finish(&mut conversation)?;
            Advance::ReadyToFinalize
        } else {
            let mut submission = if cmd.is_skip {
                Submission::skip(index)
            } else {
                Submission::answer(index, cmd.answer_text)
            };
            submission.is_edit = cmd.changed_index.is_some();
            submission.finish = cmd.is_finish_command;
            self.engine.advance(&mut conversation, submission).await?
        };

        match advance {
            Advance::Asked(next_question) => Ok(ComposeResult::NextQuestion {
                next_question,
                question_set: conversation.questions().clone(),
            }),
            Advance::ReadyToFinalize => {
                let final_text = self.engine.finalize(&mut conversation).await?;
                Ok(ComposeResult::Final {
                    final_text,
                    question_set: conversation.questions().clone(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::oracle::MockLanguageOracle;
    use crate::application::{FinalizationConfig, FinalizationPipeline};
    use crate::domain::analysis::DependencyVerdict;
    use crate::domain::questions::QuestionId;
    use crate::ports::{LanguageOracle, OracleCapability};
    use std::sync::Arc;

    fn handler(oracle: &MockLanguageOracle) -> ComposeHandler {
        let oracle: Arc<dyn LanguageOracle> = Arc::new(oracle.clone());
        let pipeline = FinalizationPipeline::new(oracle.clone(), FinalizationConfig::default());
        ComposeHandler::new(ConversationEngine::new(oracle, pipeline))
    }

    fn command(question_set: QuestionSet, answer: &str) -> ComposeCommand {
        ComposeCommand {
            question_set,
            changed_index: None,
            answer_text: answer.to_string(),
            is_skip: false,
            is_finish_command: false,
            draft_context: DraftContext::default(),
        }
    }

    fn three_answered() -> QuestionSet {
        let mut set = QuestionSet::with_seed("What would you like to write?");
        set.record_answer(0, "an apology").unwrap();
        set.append_question("Who is it to?");
        set.record_answer(1, "my neighbour").unwrap();
        set.append_question("What happened?");
        set.record_answer(2, "my dog dug up their garden").unwrap();
        set.append_question("Anything else?");
        set
    }

    #[tokio::test]
    async fn answers_frontier_by_default() {
        let oracle = MockLanguageOracle::new().with_next_question("Who is it for?");

        let result = handler(&oracle)
            .handle(command(QuestionSet::with_seed("What would you like to write?"), "a toast"))
            .await
            .unwrap();

        let ComposeResult::NextQuestion {
            next_question,
            question_set,
        } = result
        else {
            panic!("expected a next question");
        };
        assert_eq!(next_question.text, "Who is it for?");
        assert_eq!(question_set.len(), 2);
        assert!(question_set.followup_needed());
    }

    #[tokio::test]
    async fn changed_index_runs_dependency_analysis() {
        let oracle = MockLanguageOracle::new()
            .with_verdicts(vec![
                DependencyVerdict::affected(QuestionId::new(2), "new recipient"),
                DependencyVerdict::unaffected(QuestionId::new(3), ""),
            ])
            .with_next_question("Who is it to now?");
        let mut cmd = command(three_answered(), "a thank-you");
        cmd.changed_index = Some(0);

        let result = handler(&oracle).handle(cmd).await.unwrap();

        let ComposeResult::NextQuestion { question_set, .. } = result else {
            panic!("expected a next question");
        };
        assert_eq!(question_set.len(), 2);
        assert_eq!(question_set.questions()[0].response, "a thank-you");
        assert_eq!(oracle.call_count(OracleCapability::AnalyzeDependencies), 1);
    }

    #[tokio::test]
    async fn bare_finish_command_finalizes_answered_questions() {
        let oracle = MockLanguageOracle::new().with_final_text("Sorry about the garden.");
        let mut cmd = command(three_answered(), "");
        cmd.is_finish_command = true;

        let result = handler(&oracle).handle(cmd).await.unwrap();

        let ComposeResult::Final {
            final_text,
            question_set,
        } = result
        else {
            panic!("expected final text");
        };
        assert_eq!(final_text.text, "Sorry about the garden.");
        assert_eq!(question_set.len(), 3);
        assert!(question_set.is_complete());
        assert_eq!(oracle.call_count(OracleCapability::ProposeNext), 0);
    }

    #[tokio::test]
    async fn empty_question_set_is_invalid_index() {
        let oracle = MockLanguageOracle::new();

        let err = handler(&oracle)
            .handle(command(QuestionSet::empty(), "hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::InvalidIndex { index: 0, len: 0 }));
    }
}
