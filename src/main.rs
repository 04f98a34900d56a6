//! Draftwise server binary - composition root.
//!
//! 1. Load configuration from the environment (`DRAFTWISE__*`, `.env`)
//! 2. Initialize tracing
//! 3. Build the OpenAI-backed language oracle and the finalization pipeline
//! 4. Pick a conversation store and the optional speech service
//! 5. Start the axum REST API server

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use draftwise::adapters::ai::{OpenAIConfig, OpenAIProvider};
use draftwise::adapters::http::{api_router, AppState};
use draftwise::adapters::oracle::{LlmLanguageOracle, LlmOracleConfig};
use draftwise::adapters::speech::{OpenAISpeechConfig, OpenAISpeechService};
use draftwise::adapters::storage::{FileConversationStore, InMemoryConversationStore};
use draftwise::application::{ConversationEngine, FinalizationConfig, FinalizationPipeline};
use draftwise::config::{AppConfig, StorageBackend};
use draftwise::ports::{AIProvider, ConversationStore, LanguageOracle, SpeechService};

fn init_tracing(config: &AppConfig) {
    if !config.features.enable_tracing {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.server.json_logs() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_oracle(config: &AppConfig) -> Result<Arc<dyn LanguageOracle>, Box<dyn std::error::Error>> {
    let api_key = config.ai.openai_api_key.clone().unwrap_or_default();
    let provider_config = OpenAIConfig::new(api_key)
        .with_model(config.ai.model.clone())
        .with_base_url(config.ai.base_url.clone())
        .with_timeout(config.ai.timeout())
        .with_max_retries(config.ai.max_retries);
    let provider: Arc<dyn AIProvider> = Arc::new(OpenAIProvider::new(provider_config)?);
    let info = provider.provider_info();
    tracing::info!(provider = %info.name, model = %info.model, "Language model provider ready");

    let oracle_config = LlmOracleConfig {
        call_timeout: config.pipeline.oracle_timeout(),
        temperature: config.ai.temperature,
    };
    Ok(Arc::new(LlmLanguageOracle::new(provider, oracle_config)))
}

fn build_store(config: &AppConfig) -> Arc<dyn ConversationStore> {
    match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryConversationStore::new()),
        StorageBackend::File => Arc::new(FileConversationStore::new(&config.storage.data_dir)),
    }
}

fn build_speech(
    config: &AppConfig,
) -> Result<Option<Arc<dyn SpeechService>>, Box<dyn std::error::Error>> {
    if !config.speech.enabled {
        return Ok(None);
    }

    let api_key = config.ai.openai_api_key.clone().unwrap_or_default();
    let speech_config = OpenAISpeechConfig::new(api_key)
        .with_base_url(config.ai.base_url.clone())
        .with_models(
            config.speech.transcription_model.clone(),
            config.speech.tts_model.clone(),
        )
        .with_default_voice(config.speech.default_voice.clone())
        .with_timeout(config.ai.timeout());
    Ok(Some(Arc::new(OpenAISpeechService::new(speech_config)?)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        "Starting Draftwise v{}",
        env!("CARGO_PKG_VERSION")
    );
    if config.is_production() && config.features.verbose_errors {
        tracing::warn!("Verbose errors are enabled in production");
    }

    let oracle = build_oracle(&config)?;
    let finalization = FinalizationConfig {
        classify_tone: config.pipeline.classify_tone,
        fact_check: config.pipeline.fact_check,
        max_fact_check_attempts: config.pipeline.max_fact_check_attempts,
    };
    let pipeline = FinalizationPipeline::new(oracle.clone(), finalization);
    let engine = ConversationEngine::new(oracle, pipeline);

    let store = build_store(&config);
    tracing::info!(backend = ?config.storage.backend, "Conversation store ready");

    let mut state = AppState::new(store, engine)
        .with_seed_question(config.pipeline.seed_question.clone())
        .with_max_upload_bytes(config.speech.max_upload_bytes)
        .with_verbose_errors(config.features.verbose_errors);
    if let Some(speech) = build_speech(&config)? {
        state = state.with_speech(speech);
        tracing::info!("Speech endpoints enabled");
    }

    let router = api_router(
        state,
        &config.server.cors_origins_list(),
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
