//! DependencyResolver - decides which answers survive an upstream edit.
//!
//! The oracle judges every question downstream of the edited one. The
//! question set keeps only the prefix that precedes the first AFFECTED
//! question: anything after an invalidated answer may have been built on it.
//!
//! Resolution never fails from the caller's point of view. If the oracle
//! call fails, every downstream question is treated as AFFECTED.

use std::sync::Arc;

use crate::domain::analysis::DependencyVerdict;
use crate::domain::foundation::ConversationId;
use crate::domain::questions::{Question, QuestionId, QuestionSet};
use crate::ports::{DependencyQuery, LanguageOracle};

/// Applies oracle dependency analysis to edited answers.
#[derive(Clone)]
pub struct DependencyResolver {
    oracle: Arc<dyn LanguageOracle>,
}

impl DependencyResolver {
    pub fn new(oracle: Arc<dyn LanguageOracle>) -> Self {
        Self { oracle }
    }

    /// Returns exactly one verdict per question with id greater than
    /// `changed_question_id`, in question order.
    ///
    /// A downstream question the oracle gave no verdict for is AFFECTED.
    /// Verdicts for other ids are ignored.
    pub async fn resolve(
        &self,
        conversation_id: ConversationId,
        original_answer: &str,
        new_answer: &str,
        changed_question_id: QuestionId,
        all_questions: &[Question],
    ) -> Vec<DependencyVerdict> {
        let downstream: Vec<&Question> = all_questions
            .iter()
            .filter(|q| q.id > changed_question_id)
            .collect();
        if downstream.is_empty() {
            return Vec::new();
        }

        let query = DependencyQuery {
            original_answer,
            new_answer,
            changed_question_id,
            questions: all_questions,
        };

        let verdicts = match self.oracle.analyze_dependencies(conversation_id, &query).await {
            Ok(verdicts) => verdicts,
            Err(err) => {
                tracing::warn!(
                    conversation_id = %conversation_id,
                    changed_question_id = %changed_question_id,
                    error = %err,
                    "dependency analysis failed, invalidating all downstream answers"
                );
                return downstream
                    .iter()
                    .map(|q| DependencyVerdict::affected(q.id, "dependency analysis unavailable"))
                    .collect();
            }
        };

        downstream
            .iter()
            .map(|q| {
                verdicts
                    .iter()
                    .find(|v| v.question_id == q.id)
                    .cloned()
                    .unwrap_or_else(|| DependencyVerdict::affected(q.id, "no verdict returned"))
            })
            .collect()
    }

    /// Truncates `questions` just before the first AFFECTED question.
    ///
    /// Returns the number of questions removed.
    pub fn apply(questions: &mut QuestionSet, verdicts: &[DependencyVerdict]) -> usize {
        let first_affected = questions.questions().iter().position(|q| {
            verdicts
                .iter()
                .any(|v| v.question_id == q.id && v.is_affected())
        });

        match first_affected {
            Some(position) => {
                let before = questions.len();
                questions.truncate_from(position);
                before - questions.len()
            }
            None => 0,
        }
    }
}
