//! Finalization results held by a finished conversation.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::{FactCheckIssue, ToneClassification};

/// How far the final text was verified against the user's answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verification {
    /// Fact-checking was disabled.
    Skipped,
    /// A fact-check passed on the given (1-indexed) attempt.
    Verified { attempts: u32 },
    /// Checks ran out (or the checker failed) without a pass; the text is
    /// best-effort output. `attempts` counts fact-checks that returned a
    /// result, so a checker failure on the first call reports 0.
    Unverified {
        attempts: u32,
        outstanding_issues: Vec<FactCheckIssue>,
    },
}

/// User-facing output of the finalization pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalText {
    pub text: String,
    pub tone: Option<ToneClassification>,
    pub verification: Verification,
}

impl FinalText {
    /// True when the text should be shown with a "could not verify" warning.
    pub fn is_unverified(&self) -> bool {
        matches!(self.verification, Verification::Unverified { .. })
    }
}

/// Terminal state of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ConversationOutcome {
    Completed { final_text: FinalText },
    Failed { reason: String },
}
