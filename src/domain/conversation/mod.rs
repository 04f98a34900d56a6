//! Conversation domain module.
//!
//! The drafting conversation aggregate: its question set, lifecycle phase,
//! draft context, and final outcome.

mod conversation;
mod draft_context;
mod errors;
mod outcome;
mod phase;

pub use conversation::Conversation;
pub use draft_context::{DraftContext, DraftKind};
pub use errors::ConversationError;
pub use outcome::{ConversationOutcome, FinalText, Verification};
pub use phase::ConversationPhase;
