//! Conversation and finalization pipeline configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Classify tone before generating the final text
    #[serde(default = "default_true")]
    pub classify_tone: bool,

    /// Run the fact-check/correct loop on the generated text
    #[serde(default = "default_true")]
    pub fact_check: bool,

    /// Maximum fact-check calls per finalization
    #[serde(default = "default_max_fact_check_attempts")]
    pub max_fact_check_attempts: u32,

    /// Timeout applied to each oracle call
    #[serde(default = "default_oracle_timeout")]
    pub oracle_timeout_secs: u64,

    /// First question of every new conversation
    #[serde(default = "default_seed_question")]
    pub seed_question: String,
}

impl PipelineConfig {
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_secs(self.oracle_timeout_secs)
    }

    /// Most oracle calls one request can make: dependency analysis and next
    /// question, then tone, generation, and the check/correct loop.
    pub fn max_oracle_calls_per_request(&self) -> u64 {
        let tone = u64::from(self.classify_tone);
        let checks = if self.fact_check {
            let attempts = u64::from(self.max_fact_check_attempts.max(1));
            attempts + (attempts - 1)
        } else {
            0
        };
        2 + tone + 1 + checks
    }

    /// Time a request needs when every oracle call runs to its timeout.
    pub fn worst_case_request_secs(&self) -> u64 {
        self.max_oracle_calls_per_request() * self.oracle_timeout_secs
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=20).contains(&self.max_fact_check_attempts) {
            return Err(ValidationError::InvalidFactCheckAttempts);
        }
        if !(1..=300).contains(&self.oracle_timeout_secs) {
            return Err(ValidationError::InvalidOracleTimeout);
        }
        if self.seed_question.trim().is_empty() {
            return Err(ValidationError::EmptySeedQuestion);
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            classify_tone: true,
            fact_check: true,
            max_fact_check_attempts: default_max_fact_check_attempts(),
            oracle_timeout_secs: default_oracle_timeout(),
            seed_question: default_seed_question(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_fact_check_attempts() -> u32 {
    5
}

fn default_oracle_timeout() -> u64 {
    30
}

fn default_seed_question() -> String {
    "What would you like to write?".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_defaults() {
        let config = PipelineConfig::default();
        assert!(config.classify_tone);
        assert!(config.fact_check);
        assert_eq!(config.max_fact_check_attempts, 5);
        assert_eq!(config.oracle_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_worst_case_counts_every_call() {
        let config = PipelineConfig::default();
        // 2 collecting + tone + generate + 5 checks + 4 corrections
        assert_eq!(config.max_oracle_calls_per_request(), 13);
        assert_eq!(config.worst_case_request_secs(), 390);

        let lean = PipelineConfig {
            classify_tone: false,
            fact_check: false,
            ..Default::default()
        };
        assert_eq!(lean.max_oracle_calls_per_request(), 3);
    }

    #[test]
    fn test_attempt_bounds() {
        for attempts in [0, 21] {
            let config = PipelineConfig {
                max_fact_check_attempts: attempts,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidFactCheckAttempts));
        }
    }

    #[test]
    fn test_oracle_timeout_bounds() {
        let config = PipelineConfig {
            oracle_timeout_secs: 301,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidOracleTimeout));
    }

    #[test]
    fn test_blank_seed_rejected() {
        let config = PipelineConfig {
            seed_question: " ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::EmptySeedQuestion));
    }
}
