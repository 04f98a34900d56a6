//! HTTP adapter - REST API over the drafting engine.
//!
//! Each area has its own dto/handlers/routes module; `api_router` wires them
//! together with tracing, CORS, and request timeouts.

pub mod conversation;
pub mod speech;

mod error;
mod router;
mod state;

pub use error::{ApiError, ErrorResponse};
pub use router::api_router;
pub use state::{AppState, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_SEED_QUESTION};
