//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, validation errors, and the state machine trait
//! that the rest of the drafting domain is built from.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::ConversationId;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
