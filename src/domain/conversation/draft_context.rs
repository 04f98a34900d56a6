//! What kind of artifact is being drafted, and what it responds to.

use serde::{Deserialize, Serialize};

/// The artifact the conversation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DraftKind {
    Email,
    #[default]
    Message,
    /// A reply to the message held in `DraftContext::external_context`.
    Reply,
}

impl DraftKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftKind::Email => "email",
            DraftKind::Message => "message",
            DraftKind::Reply => "reply",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DraftContext {
    #[serde(default)]
    pub kind: DraftKind,
    /// Text outside the Q&A that the draft must account for, such as the
    /// message being replied to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_context: Option<String>,
}

impl DraftContext {
    pub fn new(kind: DraftKind) -> Self {
        Self {
            kind,
            external_context: None,
        }
    }

    /// Blank context text is treated as absent.
    pub fn with_external_context(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.external_context = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };
        self
    }

    pub fn external_context(&self) -> Option<&str> {
        self.external_context.as_deref()
    }
}
