//! HTTP DTOs for drafting endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::Submission;
use crate::domain::analysis::ToneClassification;
use crate::domain::conversation::{
    Conversation, ConversationOutcome, DraftContext, DraftKind, FinalText, Verification,
};
use crate::domain::questions::{Question, QuestionId, QuestionSet, QuestionStatus, SKIP_SENTINEL};

use crate::adapters::http::error::ApiError;

// ════════════════════════════════════════════════════════════════════════════════
// Shared DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A question as exchanged with clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub response: String,
    /// Inferred from `response` when a client omits it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<QuestionStatus>,
}

impl QuestionDto {
    fn into_question(self) -> Question {
        let status = self.status.unwrap_or_else(|| {
            if self.response.is_empty() {
                QuestionStatus::Unanswered
            } else if self.response == SKIP_SENTINEL {
                QuestionStatus::Skipped
            } else {
                QuestionStatus::Answered
            }
        });
        Question {
            id: QuestionId::new(self.id),
            text: self.text,
            response: self.response,
            status,
        }
    }
}

impl From<&Question> for QuestionDto {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id.value(),
            text: q.text.clone(),
            response: q.response.clone(),
            status: Some(q.status),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSetDto {
    #[serde(default)]
    pub questions: Vec<QuestionDto>,
    #[serde(default = "default_followup_needed")]
    pub followup_needed: bool,
}

fn default_followup_needed() -> bool {
    true
}

impl QuestionSetDto {
    pub fn into_question_set(self) -> Result<QuestionSet, ApiError> {
        let questions = self.questions.into_iter().map(QuestionDto::into_question).collect();
        QuestionSet::from_parts(questions, self.followup_needed)
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

impl From<&QuestionSet> for QuestionSetDto {
    fn from(set: &QuestionSet) -> Self {
        Self {
            questions: set.questions().iter().map(QuestionDto::from).collect(),
            followup_needed: set.followup_needed(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftContextDto {
    #[serde(default)]
    pub kind: DraftKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_context: Option<String>,
}

impl From<DraftContextDto> for DraftContext {
    fn from(dto: DraftContextDto) -> Self {
        let ctx = DraftContext::new(dto.kind);
        match dto.external_context {
            Some(text) => ctx.with_external_context(text),
            None => ctx,
        }
    }
}

impl From<&DraftContext> for DraftContextDto {
    fn from(ctx: &DraftContext) -> Self {
        Self {
            kind: ctx.kind,
            external_context: ctx.external_context.clone(),
        }
    }
}

/// Final text with its verification status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalTextDto {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<ToneClassification>,
    pub verification: Verification,
    /// Clients show a "could not verify" warning when set.
    pub unverified: bool,
}

impl From<&FinalText> for FinalTextDto {
    fn from(text: &FinalText) -> Self {
        Self {
            text: text.text.clone(),
            tone: text.tone.clone(),
            verification: text.verification.clone(),
            unverified: text.is_unverified(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Stateless drafting round: the client holds the question set.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeRequest {
    pub question_set: QuestionSetDto,
    #[serde(default)]
    pub changed_index: Option<usize>,
    #[serde(default)]
    pub answer_text: String,
    #[serde(default)]
    pub is_skip: bool,
    #[serde(default)]
    pub is_finish_command: bool,
    #[serde(default)]
    pub context: Option<DraftContextDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConversationRequest {
    #[serde(default)]
    pub seed_question: Option<String>,
    #[serde(default)]
    pub context: Option<DraftContextDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    pub index: usize,
    #[serde(default)]
    pub answer_text: Option<String>,
    #[serde(default)]
    pub is_skip: bool,
    #[serde(default)]
    pub is_edit: bool,
    #[serde(default)]
    pub finish: bool,
}

impl SubmitAnswerRequest {
    pub fn into_submission(self) -> Submission {
        let mut submission = if self.is_skip {
            Submission::skip(self.index)
        } else {
            Submission::answer(self.index, self.answer_text.unwrap_or_default())
        };
        submission.is_edit = self.is_edit;
        submission.finish = self.finish;
        submission
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeResponse {
    pub followup_needed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<QuestionDto>,
    pub question_set: QuestionSetDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_text: Option<FinalTextDto>,
}

/// Snapshot of a stored conversation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub id: String,
    pub phase: String,
    pub question_set: QuestionSetDto,
    pub context: DraftContextDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_text: Option<FinalTextDto>,
    /// Set when finalization failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Conversation> for ConversationResponse {
    fn from(conv: &Conversation) -> Self {
        let failure = match conv.outcome() {
            Some(ConversationOutcome::Failed { reason }) => Some(reason.clone()),
            _ => None,
        };
        Self {
            id: conv.id().to_string(),
            phase: conv.phase().label().to_string(),
            question_set: conv.questions().into(),
            context: conv.context().into(),
            final_text: conv.final_text().map(FinalTextDto::from),
            failure,
            created_at: conv.created_at().to_string(),
            updated_at: conv.updated_at().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerResponse {
    pub conversation_id: String,
    pub followup_needed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<QuestionDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_text: Option<FinalTextDto>,
}
