//! Validated transitions for lifecycle enums.

use super::ValidationError;

/// Implementors list their legal transitions; `transition_to` rejects the rest.
///
/// ```ignore
/// impl StateMachine for ConversationPhase {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!(
///             (self, target),
///             (Collecting, Finalizing) | (Finalizing, Done)
///         )
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Collecting => vec![Finalizing],
///             Finalizing => vec![Done],
///             Done => vec![],
///         }
///     }
/// }
///
/// // Usage:
/// let next = current_phase.transition_to(ConversationPhase::Finalizing)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_transition(self, target))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
