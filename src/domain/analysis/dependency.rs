//! Dependency verdicts produced when an earlier answer is edited.

use serde::{Deserialize, Serialize};

use crate::domain::questions::QuestionId;

/// Whether a downstream answer still holds after an upstream edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DependencyStatus {
    Affected,
    Unaffected,
}

/// Verdict for one question downstream of an edited answer.
///
/// Produced fresh for every edit and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyVerdict {
    pub question_id: QuestionId,
    pub status: DependencyStatus,
    #[serde(default)]
    pub reasoning: String,
}

impl DependencyVerdict {
    pub fn affected(question_id: QuestionId, reasoning: impl Into<String>) -> Self {
        Self {
            question_id,
            status: DependencyStatus::Affected,
            reasoning: reasoning.into(),
        }
    }

    pub fn unaffected(question_id: QuestionId, reasoning: impl Into<String>) -> Self {
        Self {
            question_id,
            status: DependencyStatus::Unaffected,
            reasoning: reasoning.into(),
        }
    }

    pub fn is_affected(&self) -> bool {
        self.status == DependencyStatus::Affected
    }
}
