//! HTTP adapter for drafting endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{
    ComposeRequest, ComposeResponse, ConversationResponse, FinalTextDto, QuestionDto,
    QuestionSetDto, StartConversationRequest, SubmitAnswerRequest, SubmitAnswerResponse,
};
pub use routes::conversation_routes;
