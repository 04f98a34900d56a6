//! Question set errors

use super::QuestionId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionSetError {
    #[error("Question index {index} is out of bounds (set has {len} questions)")]
    InvalidIndex { index: usize, len: usize },

    #[error("Question ids must be strictly ascending: {previous} is followed by {next}")]
    NonAscendingIds { previous: QuestionId, next: QuestionId },

    #[error("Question id {id} is out of range (maximum is {max})")]
    IdOutOfRange { id: u32, max: QuestionId },
}

impl QuestionSetError {
    pub fn invalid_index(index: usize, len: usize) -> Self {
        Self::InvalidIndex { index, len }
    }

    pub fn id_out_of_range(id: u32) -> Self {
        Self::IdOutOfRange {
            id,
            max: QuestionId::MAX_SUPPLIED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_index_message_names_bounds() {
        let err = QuestionSetError::invalid_index(4, 2);
        assert_eq!(
            err.to_string(),
            "Question index 4 is out of bounds (set has 2 questions)"
        );
    }
}
