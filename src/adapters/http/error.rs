//! API error responses.
//!
//! Every handler error becomes `(StatusCode, Json<ErrorResponse>)` with a
//! stable `code` string. Server-side (5xx) messages are generic unless
//! verbose errors are enabled.

use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::{
    AbandonConversationError, EngineError, FinishConversationError, GetConversationError,
    StartConversationError, SubmitAnswerError,
};
use crate::ports::SpeechError;

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::new("NOT_FOUND", format!("{} not found: {}", resource_type, id))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn invalid_index(index: usize, len: usize) -> Self {
        Self {
            details: Some(serde_json::json!({ "index": index, "len": len })),
            ..Self::new(
                "INVALID_INDEX",
                format!("Question index {} is out of bounds (set has {} questions)", index, len),
            )
        }
    }

    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::new("UNSUPPORTED_MEDIA_TYPE", message)
    }

    pub fn oracle_unavailable(message: impl Into<String>) -> Self {
        Self::new("ORACLE_UNAVAILABLE", message)
    }

    pub fn speech_unavailable(message: impl Into<String>) -> Self {
        Self::new("SPEECH_UNAVAILABLE", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

/// Error type returned by every HTTP handler.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String, String),
    Conflict(String),
    InvalidIndex { index: usize, len: usize },
    UnsupportedMediaType(String),
    OracleUnavailable { message: String, verbose: bool },
    SpeechUnavailable { message: String, verbose: bool },
    Internal { message: String, verbose: bool },
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal {
            message: message.into(),
            verbose: false,
        }
    }

    /// Controls whether 5xx responses carry the underlying message.
    pub fn verbose(self, enabled: bool) -> Self {
        match self {
            ApiError::OracleUnavailable { message, .. } => ApiError::OracleUnavailable {
                message,
                verbose: enabled,
            },
            ApiError::SpeechUnavailable { message, .. } => ApiError::SpeechUnavailable {
                message,
                verbose: enabled,
            },
            ApiError::Internal { message, .. } => ApiError::Internal {
                message,
                verbose: enabled,
            },
            other => other,
        }
    }

    fn conversation_not_found(id: impl ToString) -> Self {
        ApiError::NotFound("Conversation".to_string(), id.to_string())
    }

    fn storage(message: String) -> Self {
        ApiError::internal(format!("Storage error: {}", message))
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::OracleUnavailable(source) => ApiError::OracleUnavailable {
                message: source.to_string(),
                verbose: false,
            },
            EngineError::InvalidIndex { index, len } => ApiError::InvalidIndex { index, len },
            EngineError::AlreadyFinalizing | EngineError::ConversationClosed => {
                ApiError::Conflict(err.to_string())
            }
            EngineError::EmptyAnswer
            | EngineError::NothingAnswered
            | EngineError::InvalidQuestionSet(_) => ApiError::BadRequest(err.to_string()),
            EngineError::Lifecycle(_) => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<StartConversationError> for ApiError {
    fn from(err: StartConversationError) -> Self {
        match err {
            StartConversationError::Storage(message) => ApiError::storage(message),
        }
    }
}

impl From<SubmitAnswerError> for ApiError {
    fn from(err: SubmitAnswerError) -> Self {
        match err {
            SubmitAnswerError::NotFound(id) => ApiError::conversation_not_found(id),
            SubmitAnswerError::Busy(_) => ApiError::Conflict(err.to_string()),
            SubmitAnswerError::Storage(message) => ApiError::storage(message),
            SubmitAnswerError::Engine(err) => err.into(),
        }
    }
}

impl From<FinishConversationError> for ApiError {
    fn from(err: FinishConversationError) -> Self {
        match err {
            FinishConversationError::NotFound(id) => ApiError::conversation_not_found(id),
            FinishConversationError::Busy(_) => ApiError::Conflict(err.to_string()),
            FinishConversationError::Storage(message) => ApiError::storage(message),
            FinishConversationError::Engine(err) => err.into(),
        }
    }
}

impl From<GetConversationError> for ApiError {
    fn from(err: GetConversationError) -> Self {
        match err {
            GetConversationError::NotFound(id) => ApiError::conversation_not_found(id),
            GetConversationError::Storage(message) => ApiError::storage(message),
        }
    }
}

impl From<AbandonConversationError> for ApiError {
    fn from(err: AbandonConversationError) -> Self {
        match err {
            AbandonConversationError::NotFound(id) => ApiError::conversation_not_found(id),
            AbandonConversationError::Storage(message) => ApiError::storage(message),
        }
    }
}

impl From<SpeechError> for ApiError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::UnsupportedFormat(_) => ApiError::UnsupportedMediaType(err.to_string()),
            SpeechError::EmptyAudio | SpeechError::EmptyText => {
                ApiError::BadRequest(err.to_string())
            }
            SpeechError::Unavailable(_) | SpeechError::InvalidResponse(_) => {
                ApiError::SpeechUnavailable {
                    message: err.to_string(),
                    verbose: false,
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg)),
            ApiError::NotFound(resource, id) => {
                (StatusCode::NOT_FOUND, ErrorResponse::not_found(&resource, &id))
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, ErrorResponse::conflict(msg)),
            ApiError::InvalidIndex { index, len } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::invalid_index(index, len),
            ),
            ApiError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                ErrorResponse::unsupported_media_type(msg),
            ),
            ApiError::OracleUnavailable { message, verbose } => {
                tracing::warn!("Oracle unavailable: {}", message);
                let shown = if verbose {
                    message
                } else {
                    "The language service is unavailable, please retry".to_string()
                };
                (StatusCode::BAD_GATEWAY, ErrorResponse::oracle_unavailable(shown))
            }
            ApiError::SpeechUnavailable { message, verbose } => {
                tracing::warn!("Speech service unavailable: {}", message);
                let shown = if verbose {
                    message
                } else {
                    "The speech service is unavailable".to_string()
                };
                (StatusCode::BAD_GATEWAY, ErrorResponse::speech_unavailable(shown))
            }
            ApiError::Internal { message, verbose } => {
                tracing::error!("Internal error: {}", message);
                let shown = if verbose {
                    message
                } else {
                    "An internal error occurred".to_string()
                };
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal(shown))
            }
        };

        (status, Json(error)).into_response()
    }
}
