//! QuestionSet - the ordered question/answer record of one conversation.
//!
//! Invariants:
//! - questions are ordered by strictly ascending id
//! - ids are issued from a high-water mark, so a question appended after a
//!   truncation never collides with (or reuses) the id of a removed question
//! - `followup_needed == false` means every question the pipeline will use
//!   has a response (skips carry [`SKIP_SENTINEL`](super::SKIP_SENTINEL))

use serde::{Deserialize, Serialize};

use super::{Question, QuestionId, QuestionSetError};

/// Ordered sequence of questions plus the "ask another?" flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestionSet")]
pub struct QuestionSet {
    questions: Vec<Question>,
    followup_needed: bool,
    last_issued_id: u32,
}

impl QuestionSet {
    /// Creates an empty set that still expects questions.
    pub fn empty() -> Self {
        Self {
            questions: Vec::new(),
            followup_needed: true,
            last_issued_id: 0,
        }
    }

    /// Creates a set holding a single unanswered seed question.
    pub fn with_seed(seed_question: impl Into<String>) -> Self {
        let mut set = Self::empty();
        set.append_question(seed_question);
        set
    }

    /// Rebuilds a set from externally supplied questions.
    ///
    /// # Errors
    ///
    /// Returns `NonAscendingIds` if the ids are not strictly ascending, and
    /// `IdOutOfRange` if any id exceeds [`QuestionId::MAX_SUPPLIED`].
    pub fn from_parts(
        questions: Vec<Question>,
        followup_needed: bool,
    ) -> Result<Self, QuestionSetError> {
        for pair in questions.windows(2) {
            if pair[1].id <= pair[0].id {
                return Err(QuestionSetError::NonAscendingIds {
                    previous: pair[0].id,
                    next: pair[1].id,
                });
            }
        }

        let last_issued_id = questions.last().map(|q| q.id.value()).unwrap_or(0);
        if last_issued_id > QuestionId::MAX_SUPPLIED.value() {
            return Err(QuestionSetError::id_out_of_range(last_issued_id));
        }
        Ok(Self {
            questions,
            followup_needed,
            last_issued_id,
        })
    }

    /// Appends a new unanswered question and returns it.
    pub fn append_question(&mut self, text: impl Into<String>) -> &Question {
        let id = self.next_id();
        self.last_issued_id = id.value();
        self.questions.push(Question::new(id, text));
        &self.questions[self.questions.len() - 1]
    }

    /// Records an answer at `index`.
    pub fn record_answer(
        &mut self,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), QuestionSetError> {
        let len = self.questions.len();
        let question = self
            .questions
            .get_mut(index)
            .ok_or(QuestionSetError::invalid_index(index, len))?;
        question.answer(text);
        Ok(())
    }

    /// Marks the question at `index` skipped and drops everything after it.
    ///
    /// Skips never run dependency analysis: a skip admits missing
    /// information, which could affect any later answer.
    pub fn record_skip(&mut self, index: usize) -> Result<(), QuestionSetError> {
        let len = self.questions.len();
        let question = self
            .questions
            .get_mut(index)
            .ok_or(QuestionSetError::invalid_index(index, len))?;
        question.skip();
        self.truncate_after(index);
        Ok(())
    }

    /// Removes every question positioned after `index`.
    pub fn truncate_after(&mut self, index: usize) {
        self.questions.truncate(index.saturating_add(1));
    }

    /// Removes the question at `index` and every question after it.
    pub fn truncate_from(&mut self, index: usize) {
        self.questions.truncate(index);
    }

    /// Removes trailing questions that have not been answered yet.
    pub fn drop_unanswered_tail(&mut self) {
        while self.questions.last().is_some_and(|q| !q.is_answered()) {
            self.questions.pop();
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.followup_needed
    }

    pub fn followup_needed(&self) -> bool {
        self.followup_needed
    }

    pub fn set_followup_needed(&mut self, needed: bool) {
        self.followup_needed = needed;
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Position of the most recently appended question.
    pub fn frontier_index(&self) -> Option<usize> {
        self.questions.len().checked_sub(1)
    }

    pub fn frontier(&self) -> Option<&Question> {
        self.questions.last()
    }

    /// Questions whose id is greater than `id`.
    pub fn downstream_of(&self, id: QuestionId) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(move |q| q.id > id)
    }

    /// Questions that carry a response (answered or skipped).
    pub fn answered(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| q.is_answered())
    }

    fn next_id(&self) -> QuestionId {
        let max_existing = self.questions.last().map(|q| q.id.value()).unwrap_or(0);
        QuestionId::new(max_existing.max(self.last_issued_id)).next()
    }
}

/// Wire shape; validated into a [`QuestionSet`] on deserialization.
#[derive(Deserialize)]
struct RawQuestionSet {
    questions: Vec<Question>,
    #[serde(default = "default_followup_needed")]
    followup_needed: bool,
    #[serde(default)]
    last_issued_id: u32,
}

fn default_followup_needed() -> bool {
    true
}

impl TryFrom<RawQuestionSet> for QuestionSet {
    type Error = QuestionSetError;

    fn try_from(raw: RawQuestionSet) -> Result<Self, Self::Error> {
        let mut set = QuestionSet::from_parts(raw.questions, raw.followup_needed)?;
        if raw.last_issued_id > QuestionId::MAX_SUPPLIED.value() {
            return Err(QuestionSetError::id_out_of_range(raw.last_issued_id));
        }
        set.last_issued_id = set.last_issued_id.max(raw.last_issued_id);
        Ok(set)
    }
}
