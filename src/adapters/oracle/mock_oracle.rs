//! Mock LanguageOracle for testing.
//!
//! Each capability has its own scripted queue. When a queue runs dry the
//! capability falls back to a fixed default:
//!
//! | Capability              | Default                          |
//! |-------------------------|----------------------------------|
//! | `propose_next_or_finish`| `Finish`                         |
//! | `classify_tone`         | `neutral` at 0.5                 |
//! | `generate_final_text`   | [`MockLanguageOracle::DEFAULT_TEXT`] |
//! | `fact_check`            | passed                           |
//! | `correct_text`          | the draft, unchanged             |
//! | `analyze_dependencies`  | no verdicts                      |
//!
//! ```ignore
//! let oracle = MockLanguageOracle::new()
//!     .with_next_question("Who is it for?")
//!     .with_finish()
//!     .with_final_text("Dear Sam, ...");
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::analysis::{
    DependencyVerdict, FactCheckIssue, FactCheckResult, NextStep, Tone, ToneClassification,
};
use crate::domain::conversation::DraftContext;
use crate::domain::foundation::ConversationId;
use crate::domain::questions::{QuestionId, QuestionSet};
use crate::ports::{DependencyQuery, LanguageOracle, OracleCapability, OracleError};

type Script<T> = Arc<Mutex<VecDeque<Result<T, OracleError>>>>;

/// Scripted oracle with call counting.
#[derive(Debug, Clone, Default)]
pub struct MockLanguageOracle {
    next_steps: Script<NextStep>,
    tones: Script<ToneClassification>,
    final_texts: Script<String>,
    fact_checks: Script<FactCheckResult>,
    corrections: Script<String>,
    verdicts: Script<Vec<DependencyVerdict>>,
    delay: Duration,
    calls: Arc<Mutex<HashMap<OracleCapability, usize>>>,
    proposals_seen: Arc<Mutex<Vec<QuestionSet>>>,
    dependency_queries: Arc<Mutex<Vec<RecordedDependencyQuery>>>,
}

/// Owned copy of a [`DependencyQuery`] received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDependencyQuery {
    pub original_answer: String,
    pub new_answer: String,
    pub changed_question_id: QuestionId,
    pub downstream_ids: Vec<QuestionId>,
}

impl MockLanguageOracle {
    pub const DEFAULT_TEXT: &'static str = "Mock final text";

    pub fn new() -> Self {
        Self::default()
    }

    // === Scripting ===

    pub fn with_next_question(self, question: impl Into<String>) -> Self {
        push(&self.next_steps, Ok(NextStep::ask(question)));
        self
    }

    pub fn with_finish(self) -> Self {
        push(&self.next_steps, Ok(NextStep::Finish));
        self
    }

    pub fn with_next_step_error(self, error: OracleError) -> Self {
        push(&self.next_steps, Err(error));
        self
    }

    pub fn with_tone(self, tone: Tone, confidence: f32) -> Self {
        push(&self.tones, Ok(ToneClassification::new(tone, confidence, "scripted")));
        self
    }

    pub fn with_tone_error(self, error: OracleError) -> Self {
        push(&self.tones, Err(error));
        self
    }

    pub fn with_final_text(self, text: impl Into<String>) -> Self {
        push(&self.final_texts, Ok(text.into()));
        self
    }

    pub fn with_generation_error(self, error: OracleError) -> Self {
        push(&self.final_texts, Err(error));
        self
    }

    pub fn with_fact_check(self, result: FactCheckResult) -> Self {
        push(&self.fact_checks, Ok(result));
        self
    }

    pub fn with_fact_check_error(self, error: OracleError) -> Self {
        push(&self.fact_checks, Err(error));
        self
    }

    pub fn with_correction(self, text: impl Into<String>) -> Self {
        push(&self.corrections, Ok(text.into()));
        self
    }

    pub fn with_correction_error(self, error: OracleError) -> Self {
        push(&self.corrections, Err(error));
        self
    }

    pub fn with_verdicts(self, verdicts: Vec<DependencyVerdict>) -> Self {
        push(&self.verdicts, Ok(verdicts));
        self
    }

    pub fn with_dependency_error(self, error: OracleError) -> Self {
        push(&self.verdicts, Err(error));
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    // === Inspection ===

    pub fn call_count(&self, capability: OracleCapability) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&capability)
            .copied()
            .unwrap_or(0)
    }

    /// Question sets passed to `propose_next_or_finish`, in call order.
    pub fn proposals_seen(&self) -> Vec<QuestionSet> {
        self.proposals_seen.lock().unwrap().clone()
    }

    pub fn dependency_queries(&self) -> Vec<RecordedDependencyQuery> {
        self.dependency_queries.lock().unwrap().clone()
    }

    async fn enter(&self, capability: OracleCapability) {
        *self.calls.lock().unwrap().entry(capability).or_insert(0) += 1;
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

fn push<T>(script: &Script<T>, item: Result<T, OracleError>) {
    script.lock().unwrap().push_back(item);
}

fn next<T>(script: &Script<T>) -> Option<Result<T, OracleError>> {
    script.lock().unwrap().pop_front()
}

#[async_trait]
impl LanguageOracle for MockLanguageOracle {
    async fn propose_next_or_finish(
        &self,
        _conversation_id: ConversationId,
        questions: &QuestionSet,
    ) -> Result<NextStep, OracleError> {
        self.proposals_seen.lock().unwrap().push(questions.clone());
        self.enter(OracleCapability::ProposeNext).await;
        next(&self.next_steps).unwrap_or(Ok(NextStep::Finish))
    }

    async fn generate_final_text(
        &self,
        _conversation_id: ConversationId,
        _questions: &QuestionSet,
        _context: &DraftContext,
        _tone: Option<&ToneClassification>,
    ) -> Result<String, OracleError> {
        self.enter(OracleCapability::GenerateFinalText).await;
        next(&self.final_texts).unwrap_or_else(|| Ok(Self::DEFAULT_TEXT.to_string()))
    }

    async fn classify_tone(
        &self,
        _conversation_id: ConversationId,
        _questions: &QuestionSet,
        _context: &DraftContext,
    ) -> Result<ToneClassification, OracleError> {
        self.enter(OracleCapability::ClassifyTone).await;
        next(&self.tones).unwrap_or_else(|| Ok(ToneClassification::new(Tone::Neutral, 0.5, "")))
    }

    async fn fact_check(
        &self,
        _conversation_id: ConversationId,
        _questions: &QuestionSet,
        _draft: &str,
    ) -> Result<FactCheckResult, OracleError> {
        self.enter(OracleCapability::FactCheck).await;
        next(&self.fact_checks).unwrap_or_else(|| Ok(FactCheckResult::passed()))
    }

    async fn correct_text(
        &self,
        _conversation_id: ConversationId,
        _questions: &QuestionSet,
        draft: &str,
        _issues: &[FactCheckIssue],
    ) -> Result<String, OracleError> {
        self.enter(OracleCapability::CorrectText).await;
        next(&self.corrections).unwrap_or_else(|| Ok(draft.to_string()))
    }

    async fn analyze_dependencies(
        &self,
        _conversation_id: ConversationId,
        query: &DependencyQuery<'_>,
    ) -> Result<Vec<DependencyVerdict>, OracleError> {
        self.dependency_queries
            .lock()
            .unwrap()
            .push(RecordedDependencyQuery {
                original_answer: query.original_answer.to_string(),
                new_answer: query.new_answer.to_string(),
                changed_question_id: query.changed_question_id,
                downstream_ids: query.downstream().map(|q| q.id).collect(),
            });
        self.enter(OracleCapability::AnalyzeDependencies).await;
        next(&self.verdicts).unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_steps_then_default_finish() {
        let oracle = MockLanguageOracle::new().with_next_question("Who is it for?");
        let set = QuestionSet::with_seed("Seed");
        let id = ConversationId::new();

        assert_eq!(
            oracle.propose_next_or_finish(id, &set).await.unwrap(),
            NextStep::ask("Who is it for?")
        );
        assert_eq!(oracle.propose_next_or_finish(id, &set).await.unwrap(), NextStep::Finish);
        assert_eq!(oracle.call_count(OracleCapability::ProposeNext), 2);
        assert_eq!(oracle.proposals_seen().len(), 2);
    }

    #[tokio::test]
    async fn scripted_errors_are_returned() {
        let oracle = MockLanguageOracle::new().with_fact_check_error(OracleError::Timeout {
            capability: OracleCapability::FactCheck,
            timeout_secs: 1,
        });
        let result = oracle
            .fact_check(ConversationId::new(), &QuestionSet::empty(), "draft")
            .await;
        assert!(matches!(result, Err(OracleError::Timeout { .. })));
    }

    #[tokio::test]
    async fn correction_defaults_to_unchanged_draft() {
        let oracle = MockLanguageOracle::new();
        let text = oracle
            .correct_text(ConversationId::new(), &QuestionSet::empty(), "as is", &[])
            .await
            .unwrap();
        assert_eq!(text, "as is");
        assert_eq!(oracle.call_count(OracleCapability::GenerateFinalText), 0);
    }
}
