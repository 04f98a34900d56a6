//! Fact-check results for a draft checked against the user's answers.

use serde::{Deserialize, Serialize};

/// One discrepancy between the draft and the source answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheckIssue {
    /// Category such as "contradiction" or "unsupported_claim".
    pub kind: String,
    pub detail: String,
    /// The answer or draft excerpt the issue refers to.
    #[serde(default)]
    pub reference: String,
}

impl FactCheckIssue {
    pub fn new(
        kind: impl Into<String>,
        detail: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            detail: detail.into(),
            reference: reference.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheckResult {
    pub passed: bool,
    #[serde(default)]
    pub issues: Vec<FactCheckIssue>,
}

impl FactCheckResult {
    pub fn passed() -> Self {
        Self {
            passed: true,
            issues: Vec::new(),
        }
    }

    pub fn failed(issues: Vec<FactCheckIssue>) -> Self {
        Self {
            passed: false,
            issues,
        }
    }
}
