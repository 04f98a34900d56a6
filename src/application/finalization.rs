//! FinalizationPipeline - turns a completed question set into final text.
//!
//! Steps:
//! 1. Tone classification (optional). Failure continues without a tone.
//! 2. Output generation. Failure aborts finalization.
//! 3. Fact-check loop (optional). Alternates check and correct and always
//!    ends on a check: with `max_fact_check_attempts = N` there are at most
//!    N checks and N - 1 corrections. A failing Nth check, or any check or
//!    correction error, returns the current draft as unverified.

use std::sync::Arc;

use crate::domain::analysis::{FactCheckIssue, ToneClassification};
use crate::domain::conversation::{DraftContext, FinalText, Verification};
use crate::domain::foundation::ConversationId;
use crate::domain::questions::QuestionSet;
use crate::ports::{LanguageOracle, OracleError};

/// Default bound on fact-check calls per finalization.
pub const DEFAULT_MAX_FACT_CHECK_ATTEMPTS: u32 = 5;

/// Pipeline switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizationConfig {
    pub classify_tone: bool,
    pub fact_check: bool,
    pub max_fact_check_attempts: u32,
}

impl Default for FinalizationConfig {
    fn default() -> Self {
        Self {
            classify_tone: true,
            fact_check: true,
            max_fact_check_attempts: DEFAULT_MAX_FACT_CHECK_ATTEMPTS,
        }
    }
}

impl FinalizationConfig {
    pub fn without_tone(mut self) -> Self {
        self.classify_tone = false;
        self
    }

    pub fn without_fact_check(mut self) -> Self {
        self.fact_check = false;
        self
    }

    pub fn with_max_fact_check_attempts(mut self, attempts: u32) -> Self {
        self.max_fact_check_attempts = attempts;
        self
    }
}

/// Produces the user-facing output for a finished conversation.
#[derive(Clone)]
pub struct FinalizationPipeline {
    oracle: Arc<dyn LanguageOracle>,
    config: FinalizationConfig,
}

impl FinalizationPipeline {
    pub fn new(oracle: Arc<dyn LanguageOracle>, config: FinalizationConfig) -> Self {
        Self { oracle, config }
    }

    pub fn config(&self) -> &FinalizationConfig {
        &self.config
    }

    /// Runs the pipeline.
    ///
    /// # Errors
    ///
    /// Returns the oracle error only when output generation fails. Tone and
    /// fact-check failures degrade instead.
    pub async fn finalize(
        &self,
        conversation_id: ConversationId,
        questions: &QuestionSet,
        context: &DraftContext,
    ) -> Result<FinalText, OracleError> {
        let tone = if self.config.classify_tone {
            self.classify_tone(conversation_id, questions, context).await
        } else {
            None
        };

        let draft = self
            .oracle
            .generate_final_text(conversation_id, questions, context, tone.as_ref())
            .await
            .map_err(|err| {
                tracing::warn!(
                    conversation_id = %conversation_id,
                    error = %err,
                    "final text generation failed"
                );
                err
            })?;

        let (text, verification) = if self.config.fact_check {
            self.verify(conversation_id, questions, draft).await
        } else {
            (draft, Verification::Skipped)
        };

        tracing::info!(
            conversation_id = %conversation_id,
            tone = tone.as_ref().map(|t| t.tone.as_str()),
            verification = ?verification,
            "finalization complete"
        );

        Ok(FinalText {
            text,
            tone,
            verification,
        })
    }

    async fn classify_tone(
        &self,
        conversation_id: ConversationId,
        questions: &QuestionSet,
        context: &DraftContext,
    ) -> Option<ToneClassification> {
        match self
            .oracle
            .classify_tone(conversation_id, questions, context)
            .await
        {
            Ok(tone) => Some(tone),
            Err(err) => {
                tracing::warn!(
                    conversation_id = %conversation_id,
                    error = %err,
                    "tone classification failed, continuing without tone"
                );
                None
            }
        }
    }

    async fn verify(
        &self,
        conversation_id: ConversationId,
        questions: &QuestionSet,
        mut draft: String,
    ) -> (String, Verification) {
        let max_attempts = self.config.max_fact_check_attempts.max(1);
        let mut outstanding: Vec<FactCheckIssue> = Vec::new();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let result = match self.oracle.fact_check(conversation_id, questions, &draft).await {
                Ok(result) => result,
                Err(err) => {
                    tracing::warn!(
                        conversation_id = %conversation_id,
                        attempt,
                        error = %err,
                        "fact-check failed, returning draft unverified"
                    );
                    return (draft, unverified(attempt - 1, outstanding));
                }
            };

            if result.passed {
                return (draft, Verification::Verified { attempts: attempt });
            }

            tracing::debug!(
                conversation_id = %conversation_id,
                attempt,
                issues = result.issues.len(),
                "fact-check found issues"
            );
            outstanding = result.issues;

            if attempt >= max_attempts {
                tracing::warn!(
                    conversation_id = %conversation_id,
                    attempt,
                    "fact-check attempts exhausted, returning draft unverified"
                );
                return (draft, unverified(attempt, outstanding));
            }

            match self
                .oracle
                .correct_text(conversation_id, questions, &draft, &outstanding)
                .await
            {
                Ok(corrected) => draft = corrected,
                Err(err) => {
                    tracing::warn!(
                        conversation_id = %conversation_id,
                        attempt,
                        error = %err,
                        "correction failed, returning draft unverified"
                    );
                    return (draft, unverified(attempt, outstanding));
                }
            }
        }
    }
}

fn unverified(attempts: u32, outstanding_issues: Vec<FactCheckIssue>) -> Verification {
    Verification::Unverified {
        attempts,
        outstanding_issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::oracle::MockLanguageOracle;
    use crate::domain::analysis::{FactCheckResult, Tone};
    use crate::ports::OracleCapability;

    fn questions() -> QuestionSet {
        let mut set = QuestionSet::with_seed("What would you like to write?");
        set.record_answer(0, "a thank-you note to my mentor").unwrap();
        set.set_followup_needed(false);
        set
    }

    fn issue(detail: &str) -> FactCheckIssue {
        FactCheckIssue::new("contradiction", detail, "")
    }

    fn timeout(capability: OracleCapability) -> OracleError {
        OracleError::Timeout {
            capability,
            timeout_secs: 30,
        }
    }

    async fn run(oracle: &MockLanguageOracle, config: FinalizationConfig) -> Result<FinalText, OracleError> {
        FinalizationPipeline::new(Arc::new(oracle.clone()), config)
            .finalize(ConversationId::new(), &questions(), &DraftContext::default())
            .await
    }

    #[tokio::test]
    async fn passing_first_check_is_verified() {
        let oracle = MockLanguageOracle::new()
            .with_tone(Tone::Grateful, 0.9)
            .with_final_text("Dear Mr. Brown, thank you.");

        let result = run(&oracle, FinalizationConfig::default()).await.unwrap();

        assert_eq!(result.text, "Dear Mr. Brown, thank you.");
        assert_eq!(result.tone.unwrap().tone, Tone::Grateful);
        assert_eq!(result.verification, Verification::Verified { attempts: 1 });
        assert_eq!(oracle.call_count(OracleCapability::GenerateFinalText), 1);
        assert_eq!(oracle.call_count(OracleCapability::CorrectText), 0);
    }

    #[tokio::test]
    async fn disabled_fact_check_only_generates() {
        let oracle = MockLanguageOracle::new();

        let result = run(&oracle, FinalizationConfig::default().without_fact_check())
            .await
            .unwrap();

        assert_eq!(result.verification, Verification::Skipped);
        assert_eq!(oracle.call_count(OracleCapability::GenerateFinalText), 1);
        assert_eq!(oracle.call_count(OracleCapability::FactCheck), 0);
        assert_eq!(oracle.call_count(OracleCapability::CorrectText), 0);
    }

    #[tokio::test]
    async fn disabled_tone_is_not_classified() {
        let oracle = MockLanguageOracle::new();

        let result = run(&oracle, FinalizationConfig::default().without_tone())
            .await
            .unwrap();

        assert!(result.tone.is_none());
        assert_eq!(oracle.call_count(OracleCapability::ClassifyTone), 0);
    }

    #[tokio::test]
    async fn tone_failure_continues_without_tone() {
        let oracle = MockLanguageOracle::new()
            .with_tone_error(timeout(OracleCapability::ClassifyTone))
            .with_final_text("Draft");

        let result = run(&oracle, FinalizationConfig::default()).await.unwrap();

        assert!(result.tone.is_none());
        assert_eq!(result.text, "Draft");
    }

    #[tokio::test]
    async fn generation_failure_is_returned() {
        let oracle = MockLanguageOracle::new()
            .with_generation_error(timeout(OracleCapability::GenerateFinalText));

        let err = run(&oracle, FinalizationConfig::default()).await.unwrap_err();

        assert_eq!(err.capability(), OracleCapability::GenerateFinalText);
        assert_eq!(oracle.call_count(OracleCapability::FactCheck), 0);
    }

    #[tokio::test]
    async fn exhausted_checks_return_last_correction_unverified() {
        let mut oracle = MockLanguageOracle::new().with_final_text("draft 0");
        for n in 1..=3 {
            oracle = oracle
                .with_fact_check(FactCheckResult::failed(vec![issue(&format!("issue {}", n))]))
                .with_correction(format!("draft {}", n));
        }

        let result = run(&oracle, FinalizationConfig::default().with_max_fact_check_attempts(3))
            .await
            .unwrap();

        assert_eq!(result.text, "draft 2");
        assert_eq!(
            result.verification,
            Verification::Unverified {
                attempts: 3,
                outstanding_issues: vec![issue("issue 3")],
            }
        );
        assert_eq!(oracle.call_count(OracleCapability::FactCheck), 3);
        assert_eq!(oracle.call_count(OracleCapability::CorrectText), 2);
    }

    #[tokio::test]
    async fn correction_that_passes_is_verified_on_later_attempt() {
        let oracle = MockLanguageOracle::new()
            .with_final_text("wrong date")
            .with_fact_check(FactCheckResult::failed(vec![issue("date")]))
            .with_correction("right date")
            .with_fact_check(FactCheckResult::passed());

        let result = run(&oracle, FinalizationConfig::default()).await.unwrap();

        assert_eq!(result.text, "right date");
        assert_eq!(result.verification, Verification::Verified { attempts: 2 });
    }

    #[tokio::test]
    async fn fact_check_error_returns_current_draft_unverified() {
        let oracle = MockLanguageOracle::new()
            .with_final_text("first")
            .with_fact_check(FactCheckResult::failed(vec![issue("name")]))
            .with_correction("second")
            .with_fact_check_error(timeout(OracleCapability::FactCheck));

        let result = run(&oracle, FinalizationConfig::default()).await.unwrap();

        assert_eq!(result.text, "second");
        assert_eq!(
            result.verification,
            Verification::Unverified {
                attempts: 1,
                outstanding_issues: vec![issue("name")],
            }
        );
    }

    #[tokio::test]
    async fn failed_first_check_reports_no_completed_attempts() {
        let oracle = MockLanguageOracle::new()
            .with_final_text("first")
            .with_fact_check_error(timeout(OracleCapability::FactCheck));

        let result = run(&oracle, FinalizationConfig::default()).await.unwrap();

        assert_eq!(result.text, "first");
        assert_eq!(
            result.verification,
            Verification::Unverified {
                attempts: 0,
                outstanding_issues: vec![],
            }
        );
    }

    #[tokio::test]
    async fn correction_error_returns_current_draft_unverified() {
        let oracle = MockLanguageOracle::new()
            .with_final_text("first")
            .with_fact_check(FactCheckResult::failed(vec![issue("name")]))
            .with_correction_error(timeout(OracleCapability::CorrectText));

        let result = run(&oracle, FinalizationConfig::default()).await.unwrap();

        assert_eq!(result.text, "first");
        assert_eq!(
            result.verification,
            Verification::Unverified {
                attempts: 1,
                outstanding_issues: vec![issue("name")],
            }
        );
        assert_eq!(oracle.call_count(OracleCapability::FactCheck), 1);
    }

    #[tokio::test]
    async fn zero_attempts_still_checks_once() {
        let oracle = MockLanguageOracle::new()
            .with_fact_check(FactCheckResult::failed(vec![issue("x")]));

        let result = run(&oracle, FinalizationConfig::default().with_max_fact_check_attempts(0))
            .await
            .unwrap();

        assert!(result.is_unverified());
        assert_eq!(oracle.call_count(OracleCapability::FactCheck), 1);
        assert_eq!(oracle.call_count(OracleCapability::CorrectText), 0);
    }
}
