//! Language Oracle Port - the drafting capabilities backed by a language model.
//!
//! The engine never builds prompts or parses model output itself. It calls
//! these narrow capabilities and applies its own fallback policy when one
//! fails:
//!
//! | Capability              | Failure policy (caller side)                 |
//! |-------------------------|----------------------------------------------|
//! | `propose_next_or_finish`| surfaced as `OracleUnavailable`, no mutation |
//! | `analyze_dependencies`  | every downstream answer treated as affected  |
//! | `classify_tone`         | finalization continues without a tone        |
//! | `generate_final_text`   | finalization fails                           |
//! | `fact_check`            | current draft returned unverified            |
//! | `correct_text`          | current draft returned unverified            |
//!
//! Implementations must bound every call with a timeout and report it as
//! [`OracleError::Timeout`].

use async_trait::async_trait;
use std::fmt;

use crate::domain::analysis::{
    DependencyVerdict, FactCheckIssue, FactCheckResult, NextStep, ToneClassification,
};
use crate::domain::conversation::DraftContext;
use crate::domain::foundation::ConversationId;
use crate::domain::questions::{Question, QuestionId, QuestionSet};

use super::AIError;

#[async_trait]
pub trait LanguageOracle: Send + Sync {
    /// Decides whether another clarifying question is needed.
    async fn propose_next_or_finish(
        &self,
        conversation_id: ConversationId,
        questions: &QuestionSet,
    ) -> Result<NextStep, OracleError>;

    /// Produces the first draft of the final text.
    async fn generate_final_text(
        &self,
        conversation_id: ConversationId,
        questions: &QuestionSet,
        context: &DraftContext,
        tone: Option<&ToneClassification>,
    ) -> Result<String, OracleError>;

    /// Classifies the tone the final text should take.
    async fn classify_tone(
        &self,
        conversation_id: ConversationId,
        questions: &QuestionSet,
        context: &DraftContext,
    ) -> Result<ToneClassification, OracleError>;

    /// Checks a draft against the user's answers.
    async fn fact_check(
        &self,
        conversation_id: ConversationId,
        questions: &QuestionSet,
        draft: &str,
    ) -> Result<FactCheckResult, OracleError>;

    /// Rewrites a draft so the listed issues are resolved.
    async fn correct_text(
        &self,
        conversation_id: ConversationId,
        questions: &QuestionSet,
        draft: &str,
        issues: &[FactCheckIssue],
    ) -> Result<String, OracleError>;

    /// Judges which downstream answers still hold after an edit.
    async fn analyze_dependencies(
        &self,
        conversation_id: ConversationId,
        query: &DependencyQuery<'_>,
    ) -> Result<Vec<DependencyVerdict>, OracleError>;
}

/// Input to dependency analysis.
#[derive(Debug, Clone, Copy)]
pub struct DependencyQuery<'a> {
    pub original_answer: &'a str,
    pub new_answer: &'a str,
    pub changed_question_id: QuestionId,
    pub questions: &'a [Question],
}

impl DependencyQuery<'_> {
    /// Questions the verdicts must cover.
    pub fn downstream(&self) -> impl Iterator<Item = &Question> {
        let changed = self.changed_question_id;
        self.questions.iter().filter(move |q| q.id > changed)
    }
}

/// The capability a call was made for; used in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OracleCapability {
    ProposeNext,
    GenerateFinalText,
    ClassifyTone,
    FactCheck,
    CorrectText,
    AnalyzeDependencies,
}

impl OracleCapability {
    pub fn as_str(&self) -> &'static str {
        match self {
            OracleCapability::ProposeNext => "propose_next",
            OracleCapability::GenerateFinalText => "generate_final_text",
            OracleCapability::ClassifyTone => "classify_tone",
            OracleCapability::FactCheck => "fact_check",
            OracleCapability::CorrectText => "correct_text",
            OracleCapability::AnalyzeDependencies => "analyze_dependencies",
        }
    }
}

impl fmt::Display for OracleCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any failure to get a usable answer from the oracle.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OracleError {
    #[error("{capability} request failed: {source}")]
    Transport {
        capability: OracleCapability,
        #[source]
        source: AIError,
    },

    #[error("{capability} timed out after {timeout_secs}s")]
    Timeout {
        capability: OracleCapability,
        timeout_secs: u64,
    },

    #[error("{capability} returned an unusable response: {reason}")]
    Malformed {
        capability: OracleCapability,
        reason: String,
    },
}

impl OracleError {
    pub fn transport(capability: OracleCapability, source: AIError) -> Self {
        Self::Transport { capability, source }
    }

    pub fn malformed(capability: OracleCapability, reason: impl Into<String>) -> Self {
        Self::Malformed {
            capability,
            reason: reason.into(),
        }
    }

    pub fn capability(&self) -> OracleCapability {
        match self {
            OracleError::Transport { capability, .. }
            | OracleError::Timeout { capability, .. }
            | OracleError::Malformed { capability, .. } => *capability,
        }
    }
}
