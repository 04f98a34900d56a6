//! Analysis value objects.
//!
//! Results the language oracle hands back to the engine: dependency
//! verdicts, tone classifications, fact-check results, and the decision
//! whether another clarifying question is needed.

mod dependency;
mod fact_check;
mod tone;

pub use dependency::{DependencyStatus, DependencyVerdict};
pub use fact_check::{FactCheckIssue, FactCheckResult};
pub use tone::{Tone, ToneClassification, UnknownTone};

/// The oracle's answer to "ask another question, or finish?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    /// Another clarifying question is needed.
    Ask { question: String },
    /// Enough information has been collected.
    Finish,
}

impl NextStep {
    pub fn ask(question: impl Into<String>) -> Self {
        NextStep::Ask {
            question: question.into(),
        }
    }

    pub fn followup_needed(&self) -> bool {
        matches!(self, NextStep::Ask { .. })
    }
}
