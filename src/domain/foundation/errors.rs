//! Error types shared across the domain layer.

use thiserror::Error;

/// A lifecycle rule was broken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

impl ValidationError {
    pub fn invalid_transition(from: impl std::fmt::Debug, to: impl std::fmt::Debug) -> Self {
        ValidationError::InvalidTransition {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_names_both_states() {
        let err = ValidationError::invalid_transition("Done", "Collecting");
        assert_eq!(
            err.to_string(),
            "Cannot transition from \"Done\" to \"Collecting\""
        );
    }
}
