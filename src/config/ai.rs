//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::MAX_TIMEOUT_SECS;

/// Ceiling on `max_retries`; keeps the exponential backoff bounded.
const MAX_RETRIES: u32 = 5;

/// First backoff step between provider retries, doubled on each attempt.
const RETRY_BASE_DELAY_SECS: u64 = 1;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// Primary AI provider
    #[serde(default = "default_provider")]
    pub primary_provider: AiProvider,

    /// Fallback AI provider
    pub fallback_provider: Option<AiProvider>,

    /// Override for the Anthropic model
    pub anthropic_model: Option<String>,

    /// Override for the OpenAI model
    pub openai_model: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Completion token ceiling for a valuation
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAI,
    #[default]
    Anthropic,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base delay for the provider retry backoff
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_secs(RETRY_BASE_DELAY_SECS)
    }

    /// Worst-case time a valuation can spend in the providers.
    ///
    /// Every attempt may run to `timeout_secs`, each retry waits for its
    /// backoff step, and a keyed fallback repeats the whole sequence.
    pub fn retry_budget_secs(&self) -> u64 {
        let attempts = u64::from(self.max_retries) + 1;
        let backoff = (0..self.max_retries)
            .map(|retry| RETRY_BASE_DELAY_SECS << retry)
            .sum::<u64>();
        let per_provider = self.timeout_secs.saturating_mul(attempts) + backoff;
        let providers = match self.fallback_provider {
            Some(fallback) if fallback != self.primary_provider && self.has_key_for(fallback) => 2,
            _ => 1,
        };
        per_provider.saturating_mul(providers)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Whether the given provider has a key.
    pub fn has_key_for(&self, provider: AiProvider) -> bool {
        match provider {
            AiProvider::OpenAI => self.has_openai(),
            AiProvider::Anthropic => self.has_anthropic(),
        }
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        // At least one provider must have an API key
        if !self.has_openai() && !self.has_anthropic() {
            return Err(ValidationError::NoAiProviderConfigured);
        }

        // Primary provider must have an API key
        match self.primary_provider {
            AiProvider::OpenAI if !self.has_openai() => {
                return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
            }
            AiProvider::Anthropic if !self.has_anthropic() => {
                return Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"));
            }
            _ => {}
        }

        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ValidationError::InvalidTimeout("ai.timeout_secs"));
        }

        if self.max_retries > MAX_RETRIES {
            return Err(ValidationError::TooManyRetries(self.max_retries));
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            primary_provider: default_provider(),
            fallback_provider: None,
            anthropic_model: None,
            openai_model: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_provider() -> AiProvider {
    AiProvider::Anthropic
}

fn default_timeout() -> u64 {
    15
}

fn default_retries() -> u32 {
    2
}

fn default_max_tokens() -> u32 {
    2048
}
