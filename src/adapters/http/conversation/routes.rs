//! Axum routes for drafting endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{
    abandon_conversation, compose, finish_conversation, get_conversation, start_conversation,
    submit_answer,
};

/// Creates routes for drafting endpoints.
///
/// - POST /compose - Stateless round over a client-held question set
/// - POST /conversations - Start a stored conversation
/// - GET /conversations/:id - Conversation snapshot
/// - DELETE /conversations/:id - Abandon a conversation
/// - POST /conversations/:id/answers - Answer, skip, or edit
/// - POST /conversations/:id/finish - Finalize now
pub fn conversation_routes() -> Router<AppState> {
    Router::new()
        .route("/compose", post(compose))
        .route("/conversations", post(start_conversation))
        .route(
            "/conversations/:conversation_id",
            get(get_conversation).delete(abandon_conversation),
        )
        .route("/conversations/:conversation_id/answers", post(submit_answer))
        .route("/conversations/:conversation_id/finish", post(finish_conversation))
}
