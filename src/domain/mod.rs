//! Domain layer - pure drafting logic with no I/O.
//!
//! - `foundation`: identifiers, timestamps, validation errors, state machines
//! - `questions`: the question/answer record of a conversation
//! - `analysis`: value objects produced by the language oracle
//! - `conversation`: the conversation aggregate and its lifecycle

pub mod analysis;
pub mod conversation;
pub mod foundation;
pub mod questions;
