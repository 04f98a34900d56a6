//! Conversation phase state machine.
//!
//! - `Collecting`: asking clarifying questions (entry state)
//! - `Finalizing`: the finalization pipeline is running
//! - `Done`: terminal, holds the final text or the failure

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversationPhase {
    #[default]
    Collecting,
    Finalizing,
    Done,
}

impl ConversationPhase {
    /// Returns true if answers may still be submitted.
    pub fn accepts_answers(&self) -> bool {
        matches!(self, Self::Collecting)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Collecting => "collecting",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
        }
    }
}

impl StateMachine for ConversationPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConversationPhase::*;
        matches!((self, target), (Collecting, Finalizing) | (Finalizing, Done))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConversationPhase::*;
        match self {
            Collecting => vec![Finalizing],
            Finalizing => vec![Done],
            Done => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_is_the_entry_phase() {
        assert_eq!(ConversationPhase::default(), ConversationPhase::Collecting);
        assert!(ConversationPhase::Collecting.accepts_answers());
    }

    #[test]
    fn phases_only_move_forward() {
        use ConversationPhase::*;
        assert_eq!(Collecting.transition_to(Finalizing), Ok(Finalizing));
        assert_eq!(Finalizing.transition_to(Done), Ok(Done));
        assert!(Finalizing.transition_to(Collecting).is_err());
        assert!(Collecting.transition_to(Done).is_err());
        assert!(Finalizing.transition_to(Finalizing).is_err());
    }

    #[test]
    fn done_is_terminal() {
        assert!(ConversationPhase::Done.is_terminal());
        assert!(!ConversationPhase::Collecting.is_terminal());
        assert!(!ConversationPhase::Finalizing.is_terminal());
    }

    #[test]
    fn valid_transitions_agree_with_can_transition_to() {
        for phase in [
            ConversationPhase::Collecting,
            ConversationPhase::Finalizing,
            ConversationPhase::Done,
        ] {
            for target in phase.valid_transitions() {
                assert!(phase.can_transition_to(&target));
            }
        }
    }
}
