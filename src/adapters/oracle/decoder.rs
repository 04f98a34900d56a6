//! Response decoding for oracle replies.
//!
//! Each structured reply goes through two stages:
//!
//! 1. **Strict**: the first JSON value in the reply (markdown fences
//!    stripped) is deserialized into a wire schema and validated.
//! 2. **Field extraction**: if that fails, the fields the capability needs
//!    are pulled out with regular expressions.
//!
//! If both fail the reply is rejected as [`OracleError::Malformed`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::analysis::{
    DependencyStatus, DependencyVerdict, FactCheckIssue, FactCheckResult, NextStep, Tone,
    ToneClassification,
};
use crate::domain::questions::QuestionId;
use crate::ports::{OracleCapability, OracleError};

static QUESTION_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""question"\s*:\s*"((?:[^"\\]|\\.)*)""#).unwrap());
static FOLLOWUP_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""followup_needed"\s*:\s*(true|false)"#).unwrap());
static TONE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""tone"\s*:\s*"([A-Za-z_ ]+)""#).unwrap());
static CONFIDENCE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""confidence"\s*:\s*([0-9]*\.?[0-9]+)"#).unwrap());
static PASSED_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""passed"\s*:\s*(true|false)"#).unwrap());
static VERDICT_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\{[^{}]*\}"#).unwrap());
static QUESTION_ID_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""question_id"\s*:\s*"?(\d+)"?"#).unwrap());
static STATUS_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""status"\s*:\s*"([A-Za-z_]+)""#).unwrap());

const DEFAULT_TONE_CONFIDENCE: f32 = 0.5;

/// Decodes raw model replies into domain values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseDecoder;

impl ResponseDecoder {
    pub fn next_step(&self, raw: &str) -> Result<NextStep, OracleError> {
        decode_with_fallback(
            OracleCapability::ProposeNext,
            raw,
            |wire: NextStepWire| match (wire.followup_needed, non_blank(wire.question)) {
                (false, _) => Ok(NextStep::Finish),
                (true, Some(question)) => Ok(NextStep::ask(question)),
                (true, None) => Err("followup_needed is true but no question was given".into()),
            },
            |raw| {
                let followup = capture(&FOLLOWUP_FIELD, raw)? == "true";
                if !followup {
                    return Some(NextStep::Finish);
                }
                capture(&QUESTION_FIELD, raw)
                    .map(unescape)
                    .and_then(|q| non_blank(Some(q)))
                    .map(NextStep::ask)
            },
        )
    }

    pub fn tone(&self, raw: &str) -> Result<ToneClassification, OracleError> {
        decode_with_fallback(
            OracleCapability::ClassifyTone,
            raw,
            |wire: ToneWire| {
                let tone = wire.tone.parse::<Tone>().map_err(|e| e.to_string())?;
                Ok(ToneClassification::new(tone, wire.confidence, wire.reasoning))
            },
            |raw| {
                let tone = capture(&TONE_FIELD, raw)?.parse::<Tone>().ok()?;
                let confidence = capture(&CONFIDENCE_FIELD, raw)
                    .and_then(|c| c.parse::<f32>().ok())
                    .unwrap_or(DEFAULT_TONE_CONFIDENCE);
                Some(ToneClassification::new(tone, confidence, ""))
            },
        )
    }

    pub fn fact_check(&self, raw: &str) -> Result<FactCheckResult, OracleError> {
        decode_with_fallback(
            OracleCapability::FactCheck,
            raw,
            |wire: FactCheckWire| {
                if wire.passed {
                    return Ok(FactCheckResult::passed());
                }
                let issues: Vec<FactCheckIssue> = wire
                    .issues
                    .into_iter()
                    .map(|i| FactCheckIssue::new(i.kind, i.detail, i.reference))
                    .collect();
                Ok(failed_with(issues))
            },
            |raw| match capture(&PASSED_FIELD, raw)? {
                "true" => Some(FactCheckResult::passed()),
                _ => Some(failed_with(Vec::new())),
            },
        )
    }

    /// Verdicts with an unrecognised status are dropped; the resolver treats
    /// a missing verdict as affected.
    pub fn dependency_verdicts(&self, raw: &str) -> Result<Vec<DependencyVerdict>, OracleError> {
        decode_with_fallback(
            OracleCapability::AnalyzeDependencies,
            raw,
            |wire: VerdictsWire| {
                let verdicts = match wire {
                    VerdictsWire::Wrapped { verdicts } => verdicts,
                    VerdictsWire::Bare(verdicts) => verdicts,
                };
                Ok(verdicts
                    .into_iter()
                    .filter_map(|v| {
                        let status = parse_status(&v.status)?;
                        Some(DependencyVerdict {
                            question_id: QuestionId::new(v.question_id),
                            status,
                            reasoning: v.reasoning,
                        })
                    })
                    .collect())
            },
            |raw| {
                // Fields are only paired within one object; a verdict without
                // a status is dropped and so counts as affected.
                let verdicts: Vec<DependencyVerdict> = VERDICT_OBJECT
                    .find_iter(raw)
                    .filter_map(|object| {
                        let object = object.as_str();
                        let id = capture(&QUESTION_ID_FIELD, object)?.parse::<u32>().ok()?;
                        let status = parse_status(capture(&STATUS_FIELD, object)?)?;
                        Some(DependencyVerdict {
                            question_id: QuestionId::new(id),
                            status,
                            reasoning: String::new(),
                        })
                    })
                    .collect();
                (!verdicts.is_empty()).then_some(verdicts)
            },
        )
    }

    /// Free-text replies: fences and surrounding whitespace removed.
    pub fn plain_text(&self, capability: OracleCapability, raw: &str) -> Result<String, OracleError> {
        let text = strip_code_fences(raw);
        if text.is_empty() {
            return Err(OracleError::malformed(capability, "empty reply"));
        }
        Ok(text.to_string())
    }
}

fn decode_with_fallback<W, T>(
    capability: OracleCapability,
    raw: &str,
    strict: impl FnOnce(W) -> Result<T, String>,
    fallback: impl FnOnce(&str) -> Option<T>,
) -> Result<T, OracleError>
where
    W: DeserializeOwned,
{
    let strict_error = match first_json_value(raw) {
        Some(value) => match serde_json::from_value::<W>(value) {
            Ok(wire) => match strict(wire) {
                Ok(decoded) => return Ok(decoded),
                Err(reason) => reason,
            },
            Err(e) => e.to_string(),
        },
        None => "no JSON value in reply".to_string(),
    };

    tracing::debug!(
        capability = %capability,
        reason = %strict_error,
        "strict decode failed, falling back to field extraction"
    );

    fallback(raw).ok_or_else(|| OracleError::malformed(capability, strict_error))
}

/// Removes a surrounding markdown code fence, if any.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening fence line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parses the first JSON object or array appearing in the reply.
fn first_json_value(raw: &str) -> Option<Value> {
    let body = strip_code_fences(raw);
    let start = body.find(|c: char| c == '{' || c == '[')?;
    serde_json::Deserializer::from_str(&body[start..])
        .into_iter::<Value>()
        .next()?
        .ok()
}

fn capture<'a>(re: &Regex, raw: &'a str) -> Option<&'a str> {
    re.captures(raw).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn unescape(captured: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{}\"", captured))
        .unwrap_or_else(|_| captured.to_string())
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

fn parse_status(raw: &str) -> Option<DependencyStatus> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "AFFECTED" => Some(DependencyStatus::Affected),
        "UNAFFECTED" => Some(DependencyStatus::Unaffected),
        _ => None,
    }
}

/// A failed check always carries at least one issue for the corrector.
fn failed_with(mut issues: Vec<FactCheckIssue>) -> FactCheckResult {
    if issues.is_empty() {
        issues.push(FactCheckIssue::new(
            "unspecified",
            "the checker reported a mismatch without details",
            "",
        ));
    }
    FactCheckResult::failed(issues)
}

// ----- Wire schemas -----

#[derive(Debug, Deserialize)]
struct NextStepWire {
    followup_needed: bool,
    #[serde(default)]
    question: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ToneWire {
    tone: String,
    #[serde(default = "default_confidence")]
    confidence: f32,
    #[serde(default)]
    reasoning: String,
}

fn default_confidence() -> f32 {
    DEFAULT_TONE_CONFIDENCE
}

#[derive(Debug, Deserialize)]
struct FactCheckWire {
    passed: bool,
    #[serde(default)]
    issues: Vec<IssueWire>,
}

#[derive(Debug, Deserialize)]
struct IssueWire {
    #[serde(default = "unspecified_kind")]
    kind: String,
    #[serde(default)]
    detail: String,
    #[serde(default)]
    reference: String,
}

fn unspecified_kind() -> String {
    "unspecified".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VerdictsWire {
    Wrapped { verdicts: Vec<VerdictWire> },
    Bare(Vec<VerdictWire>),
}

#[derive(Debug, Deserialize)]
struct VerdictWire {
    question_id: u32,
    status: String,
    #[serde(default)]
    reasoning: String,
}
