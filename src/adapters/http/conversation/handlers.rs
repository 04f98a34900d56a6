//! HTTP handlers for drafting endpoints.
//!
//! These handlers connect Axum routes to application layer operations.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::{
    AbandonConversationCommand, ComposeCommand, ComposeResult, FinishConversationCommand,
    GetConversationQuery, StartConversationCommand, SubmitAnswerCommand, SubmitOutcome,
};
use crate::domain::foundation::ConversationId;

use super::dto::{
    ComposeRequest, ComposeResponse, ConversationResponse, FinalTextDto, QuestionDto,
    StartConversationRequest, SubmitAnswerRequest, SubmitAnswerResponse,
};

fn parse_conversation_id(raw: &str) -> Result<ConversationId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid conversation ID: {}", raw)))
}

fn to_api_error(state: &AppState, err: impl Into<ApiError>) -> ApiError {
    err.into().verbose(state.verbose_errors)
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/compose
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/compose - One stateless drafting round.
///
/// The client sends its question set with every request and replaces it
/// with the one in the response.
///
/// # Errors
/// - 400 Bad Request: Malformed question set or empty answer
/// - 422 Unprocessable Entity: Index outside the question set
/// - 502 Bad Gateway: Language service failed
pub async fn compose(
    State(state): State<AppState>,
    Json(request): Json<ComposeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ComposeCommand {
        question_set: request.question_set.into_question_set()?,
        changed_index: request.changed_index,
        answer_text: request.answer_text,
        is_skip: request.is_skip,
        is_finish_command: request.is_finish_command,
        draft_context: request.context.unwrap_or_default().into(),
    };

    let result = state
        .compose_handler()
        .handle(cmd)
        .await
        .map_err(|e| to_api_error(&state, e))?;

    let response = match result {
        ComposeResult::NextQuestion {
            next_question,
            question_set,
        } => ComposeResponse {
            followup_needed: true,
            next_question: Some(QuestionDto::from(&next_question)),
            question_set: (&question_set).into(),
            final_text: None,
        },
        ComposeResult::Final {
            final_text,
            question_set,
        } => ComposeResponse {
            followup_needed: false,
            next_question: None,
            question_set: (&question_set).into(),
            final_text: Some(FinalTextDto::from(&final_text)),
        },
    };

    Ok(Json(response))
}

// ════════════════════════════════════════════════════════════════════════════════
// Stored conversations
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/conversations - Start a conversation with its seed question.
pub async fn start_conversation(
    State(state): State<AppState>,
    Json(request): Json<StartConversationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = StartConversationCommand {
        seed_question: request.seed_question,
        draft_context: request.context.unwrap_or_default().into(),
    };

    let result = state
        .start_conversation_handler()
        .handle(cmd)
        .await
        .map_err(|e| to_api_error(&state, e))?;

    Ok((
        StatusCode::CREATED,
        Json(ConversationResponse::from(&result.conversation)),
    ))
}

/// GET /api/conversations/:id - Conversation snapshot.
///
/// # Errors
/// - 400 Bad Request: Invalid conversation ID format
/// - 404 Not Found: Conversation doesn't exist
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation_id = parse_conversation_id(&conversation_id)?;

    let conversation = state
        .get_conversation_handler()
        .handle(GetConversationQuery { conversation_id })
        .await
        .map_err(|e| to_api_error(&state, e))?;

    Ok(Json(ConversationResponse::from(&conversation)))
}

/// DELETE /api/conversations/:id - Abandon a conversation.
///
/// Requests still in flight for the conversation discard their results.
pub async fn abandon_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation_id = parse_conversation_id(&conversation_id)?;

    state
        .abandon_conversation_handler()
        .handle(AbandonConversationCommand { conversation_id })
        .await
        .map_err(|e| to_api_error(&state, e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/conversations/:id/answers - Answer, skip, or edit a question.
///
/// # Errors
/// - 404 Not Found: Conversation doesn't exist
/// - 409 Conflict: Conversation is finalizing, done, or busy
/// - 422 Unprocessable Entity: Index outside the question set
/// - 502 Bad Gateway: Language service failed
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation_id = parse_conversation_id(&conversation_id)?;

    let result = state
        .submit_answer_handler()
        .handle(SubmitAnswerCommand {
            conversation_id,
            submission: request.into_submission(),
        })
        .await
        .map_err(|e| to_api_error(&state, e))?;

    let response = match result.outcome {
        SubmitOutcome::NextQuestion(question) => SubmitAnswerResponse {
            conversation_id: conversation_id.to_string(),
            followup_needed: true,
            next_question: Some(QuestionDto::from(&question)),
            final_text: None,
        },
        SubmitOutcome::Finalized(final_text) => SubmitAnswerResponse {
            conversation_id: conversation_id.to_string(),
            followup_needed: false,
            next_question: None,
            final_text: Some(FinalTextDto::from(&final_text)),
        },
    };

    Ok(Json(response))
}

/// POST /api/conversations/:id/finish - Finalize with the answers so far.
pub async fn finish_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation_id = parse_conversation_id(&conversation_id)?;

    let result = state
        .finish_conversation_handler()
        .handle(FinishConversationCommand { conversation_id })
        .await
        .map_err(|e| to_api_error(&state, e))?;

    Ok(Json(ConversationResponse::from(&result.conversation)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_conversation_id_rejects_garbage() {
        assert!(matches!(
            parse_conversation_id("not-a-uuid"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn parse_conversation_id_accepts_uuid() {
        let id = ConversationId::new();
        assert_eq!(parse_conversation_id(&id.to_string()).unwrap(), id);
    }
}
