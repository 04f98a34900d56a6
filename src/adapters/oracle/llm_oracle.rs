//! LanguageOracle backed by a chat-completion provider.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::analysis::{
    DependencyVerdict, FactCheckIssue, FactCheckResult, NextStep, ToneClassification,
};
use crate::domain::conversation::DraftContext;
use crate::domain::foundation::ConversationId;
use crate::domain::questions::QuestionSet;
use crate::ports::{
    AIProvider, CompletionRequest, DependencyQuery, LanguageOracle, MessageRole,
    OracleCapability, OracleError, RequestMetadata,
};

use super::decoder::ResponseDecoder;
use super::prompts;

/// Temperature for capabilities that judge rather than write.
const ANALYTIC_TEMPERATURE: f32 = 0.0;

/// Tuning for [`LlmLanguageOracle`].
#[derive(Debug, Clone)]
pub struct LlmOracleConfig {
    /// Upper bound on a single capability call, retries included.
    pub call_timeout: Duration,
    /// Temperature for question proposal, generation, and correction.
    pub temperature: f32,
}

impl Default for LlmOracleConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(30),
            temperature: 0.7,
        }
    }
}

/// Implements every oracle capability as one prompt/decode round trip.
pub struct LlmLanguageOracle {
    provider: Arc<dyn AIProvider>,
    decoder: ResponseDecoder,
    config: LlmOracleConfig,
}

impl LlmLanguageOracle {
    pub fn new(provider: Arc<dyn AIProvider>, config: LlmOracleConfig) -> Self {
        Self {
            provider,
            decoder: ResponseDecoder,
            config,
        }
    }

    async fn call(
        &self,
        capability: OracleCapability,
        conversation_id: ConversationId,
        (system, user): (String, String),
        expects_json: bool,
    ) -> Result<String, OracleError> {
        let temperature = if expects_json && capability != OracleCapability::ProposeNext {
            ANALYTIC_TEMPERATURE
        } else {
            self.config.temperature
        };

        let metadata = RequestMetadata::new(
            conversation_id,
            capability.as_str(),
            uuid::Uuid::new_v4().to_string(),
        );
        let mut request = CompletionRequest::new(metadata)
            .with_system_prompt(system)
            .with_message(MessageRole::User, user)
            .with_temperature(temperature);
        if expects_json {
            request = request.expecting_json();
        }

        tracing::debug!(
            conversation_id = %conversation_id,
            capability = %capability,
            "calling language model"
        );

        match tokio::time::timeout(self.config.call_timeout, self.provider.complete(request)).await
        {
            Ok(Ok(response)) => Ok(response.content),
            Ok(Err(err)) => Err(OracleError::transport(capability, err)),
            Err(_) => Err(OracleError::Timeout {
                capability,
                timeout_secs: self.config.call_timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl LanguageOracle for LlmLanguageOracle {
    async fn propose_next_or_finish(
        &self,
        conversation_id: ConversationId,
        questions: &QuestionSet,
    ) -> Result<NextStep, OracleError> {
        let raw = self
            .call(
                OracleCapability::ProposeNext,
                conversation_id,
                prompts::propose_next(questions),
                true,
            )
            .await?;
        self.decoder.next_step(&raw)
    }

    async fn generate_final_text(
        &self,
        conversation_id: ConversationId,
        questions: &QuestionSet,
        context: &DraftContext,
        tone: Option<&ToneClassification>,
    ) -> Result<String, OracleError> {
        let raw = self
            .call(
                OracleCapability::GenerateFinalText,
                conversation_id,
                prompts::generate_final_text(questions, context, tone),
                false,
            )
            .await?;
        self.decoder
            .plain_text(OracleCapability::GenerateFinalText, &raw)
    }

    async fn classify_tone(
        &self,
        conversation_id: ConversationId,
        questions: &QuestionSet,
        context: &DraftContext,
    ) -> Result<ToneClassification, OracleError> {
        let raw = self
            .call(
                OracleCapability::ClassifyTone,
                conversation_id,
                prompts::classify_tone(questions, context),
                true,
            )
            .await?;
        self.decoder.tone(&raw)
    }

    async fn fact_check(
        &self,
        conversation_id: ConversationId,
        questions: &QuestionSet,
        draft: &str,
    ) -> Result<FactCheckResult, OracleError> {
        let raw = self
            .call(
                OracleCapability::FactCheck,
                conversation_id,
                prompts::fact_check(questions, draft),
                true,
            )
            .await?;
        self.decoder.fact_check(&raw)
    }

    async fn correct_text(
        &self,
        conversation_id: ConversationId,
        questions: &QuestionSet,
        draft: &str,
        issues: &[FactCheckIssue],
    ) -> Result<String, OracleError> {
        let raw = self
            .call(
                OracleCapability::CorrectText,
                conversation_id,
                prompts::correct_text(questions, draft, issues),
                false,
            )
            .await?;
        self.decoder.plain_text(OracleCapability::CorrectText, &raw)
    }

    async fn analyze_dependencies(
        &self,
        conversation_id: ConversationId,
        query: &DependencyQuery<'_>,
    ) -> Result<Vec<DependencyVerdict>, OracleError> {
        let raw = self
            .call(
                OracleCapability::AnalyzeDependencies,
                conversation_id,
                prompts::analyze_dependencies(query),
                true,
            )
            .await?;
        self.decoder.dependency_verdicts(&raw)
    }
}
