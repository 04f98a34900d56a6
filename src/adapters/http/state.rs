//! Shared state handed to every HTTP handler.

use std::sync::Arc;

use crate::application::{
    AbandonConversationHandler, ComposeHandler, ConversationEngine, ConversationLocks,
    FinishConversationHandler, GetConversationHandler, StartConversationHandler,
    SubmitAnswerHandler,
};
use crate::ports::{ConversationStore, SpeechService};

/// Seed question used when neither the config nor the request supplies one.
pub const DEFAULT_SEED_QUESTION: &str = "What would you like to write?";

/// 25 MiB, the largest upload the transcription API accepts.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ConversationStore>,
    pub engine: ConversationEngine,
    pub locks: ConversationLocks,
    /// `None` when speech endpoints are disabled.
    pub speech: Option<Arc<dyn SpeechService>>,
    pub seed_question: String,
    pub max_upload_bytes: usize,
    pub verbose_errors: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn ConversationStore>, engine: ConversationEngine) -> Self {
        Self {
            store,
            engine,
            locks: ConversationLocks::new(),
            speech: None,
            seed_question: DEFAULT_SEED_QUESTION.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            verbose_errors: false,
        }
    }

    pub fn with_speech(mut self, speech: Arc<dyn SpeechService>) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn with_seed_question(mut self, seed: impl Into<String>) -> Self {
        self.seed_question = seed.into();
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    pub fn with_verbose_errors(mut self, verbose: bool) -> Self {
        self.verbose_errors = verbose;
        self
    }

    pub fn compose_handler(&self) -> ComposeHandler {
        ComposeHandler::new(self.engine.clone())
    }

    pub fn start_conversation_handler(&self) -> StartConversationHandler {
        StartConversationHandler::new(self.store.clone(), self.seed_question.clone())
    }

    pub fn get_conversation_handler(&self) -> GetConversationHandler {
        GetConversationHandler::new(self.store.clone())
    }

    pub fn submit_answer_handler(&self) -> SubmitAnswerHandler {
        SubmitAnswerHandler::new(self.store.clone(), self.engine.clone(), self.locks.clone())
    }

    pub fn finish_conversation_handler(&self) -> FinishConversationHandler {
        FinishConversationHandler::new(self.store.clone(), self.engine.clone(), self.locks.clone())
    }

    pub fn abandon_conversation_handler(&self) -> AbandonConversationHandler {
        AbandonConversationHandler::new(self.store.clone(), self.locks.clone())
    }
}
