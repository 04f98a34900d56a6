//! A single clarifying question and the user's response to it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Response text recorded for a question the user chose to skip.
pub const SKIP_SENTINEL: &str = "user has skipped this question";

/// Identifier of a question within one conversation.
///
/// Assigned monotonically by the owning [`QuestionSet`](super::QuestionSet)
/// and never reused, even after truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(u32);

impl QuestionId {
    /// The id given to the first question of a conversation.
    pub const FIRST: QuestionId = QuestionId(1);

    /// Largest id accepted from outside. Everything above it is reserved
    /// for ids issued by `append_question`.
    pub const MAX_SUPPLIED: QuestionId = QuestionId(i32::MAX as u32);

    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Returns the id that follows this one.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Answer state of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionStatus {
    #[default]
    Unanswered,
    Answered,
    Skipped,
}

/// A clarifying question asked during drafting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub status: QuestionStatus,
}

impl Question {
    /// Creates an unanswered question.
    pub fn new(id: QuestionId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            response: String::new(),
            status: QuestionStatus::Unanswered,
        }
    }

    /// Skipped questions count as answered for completion purposes.
    pub fn is_answered(&self) -> bool {
        matches!(self.status, QuestionStatus::Answered | QuestionStatus::Skipped)
    }

    pub fn is_skipped(&self) -> bool {
        self.status == QuestionStatus::Skipped
    }

    pub(super) fn answer(&mut self, text: impl Into<String>) {
        self.response = text.into();
        self.status = QuestionStatus::Answered;
    }

    pub(super) fn skip(&mut self) {
        self.response = SKIP_SENTINEL.to_string();
        self.status = QuestionStatus::Skipped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_question_is_unanswered_with_empty_response() {
        let q = Question::new(QuestionId::FIRST, "What would you like to write?");
        assert_eq!(q.status, QuestionStatus::Unanswered);
        assert!(q.response.is_empty());
        assert!(!q.is_answered());
    }

    #[test]
    fn skip_counts_as_answered() {
        let mut q = Question::new(QuestionId::new(2), "Who is it for?");
        q.skip();
        assert!(q.is_answered());
        assert!(q.is_skipped());
        assert_eq!(q.response, SKIP_SENTINEL);
    }

    #[test]
    fn status_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&QuestionStatus::Unanswered).unwrap();
        assert_eq!(json, "\"UNANSWERED\"");
        let json = serde_json::to_string(&QuestionStatus::Skipped).unwrap();
        assert_eq!(json, "\"SKIPPED\"");
    }

    #[test]
    fn question_deserializes_with_missing_response_fields() {
        let q: Question = serde_json::from_str(r#"{"id":3,"text":"Tone?"}"#).unwrap();
        assert_eq!(q.id, QuestionId::new(3));
        assert_eq!(q.status, QuestionStatus::Unanswered);
        assert!(q.response.is_empty());
    }
}
