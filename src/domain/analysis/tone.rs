//! Tone catalog and classification result.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed catalog of tones a draft can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Formal,
    Informal,
    Friendly,
    Professional,
    Empathetic,
    Enthusiastic,
    Apologetic,
    Assertive,
    Grateful,
    Humorous,
    Persuasive,
    Sympathetic,
    Urgent,
    Neutral,
}

impl Tone {
    pub const ALL: [Tone; 14] = [
        Tone::Formal,
        Tone::Informal,
        Tone::Friendly,
        Tone::Professional,
        Tone::Empathetic,
        Tone::Enthusiastic,
        Tone::Apologetic,
        Tone::Assertive,
        Tone::Grateful,
        Tone::Humorous,
        Tone::Persuasive,
        Tone::Sympathetic,
        Tone::Urgent,
        Tone::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Informal => "informal",
            Tone::Friendly => "friendly",
            Tone::Professional => "professional",
            Tone::Empathetic => "empathetic",
            Tone::Enthusiastic => "enthusiastic",
            Tone::Apologetic => "apologetic",
            Tone::Assertive => "assertive",
            Tone::Grateful => "grateful",
            Tone::Humorous => "humorous",
            Tone::Persuasive => "persuasive",
            Tone::Sympathetic => "sympathetic",
            Tone::Urgent => "urgent",
            Tone::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tone: {0}")]
pub struct UnknownTone(pub String);

impl FromStr for Tone {
    type Err = UnknownTone;

    /// Case-insensitive; tolerates surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Tone::ALL
            .iter()
            .copied()
            .find(|tone| tone.as_str() == needle)
            .ok_or_else(|| UnknownTone(s.to_string()))
    }
}

/// Result of classifying the tone a draft should take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneClassification {
    pub tone: Tone,
    /// Clamped to `[0, 1]`.
    pub confidence: f32,
    #[serde(default)]
    pub reasoning: String,
}

impl ToneClassification {
    pub fn new(tone: Tone, confidence: f32, reasoning: impl Into<String>) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            tone,
            confidence,
            reasoning: reasoning.into(),
        }
    }
}
