//! Questions domain module.
//!
//! The ordered question/answer record that a drafting conversation builds
//! up, plus the skip sentinel and id allocation rules.

mod errors;
mod question;
mod question_set;

pub use errors::QuestionSetError;
pub use question::{Question, QuestionId, QuestionStatus, SKIP_SENTINEL};
pub use question_set::QuestionSet;
