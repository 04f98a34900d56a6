//! Draftwise - Guided Writing Assistant
//!
//! Asks clarifying questions one at a time, tracks which answers depend on
//! which, and turns the finished question set into a tone-aware,
//! fact-checked draft.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
