//! Failover AI Provider - Wrapper that provides automatic failover between providers.
//!
//! When the primary provider fails with a transient error (rate limit, unavailable,
//! timeout), the request is replayed against the fallback provider if one is
//! configured.
//!
//! # Example
//!
//! ```ignore
//! let primary = Arc::new(AnthropicProvider::new(anthropic_config));
//! let fallback = Arc::new(OpenAIProvider::new(openai_config));
//!
//! let provider = FailoverAIProvider::new(primary).with_fallback(fallback);
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// AI provider wrapper with automatic failover support.
pub struct FailoverAIProvider {
    primary: Arc<dyn AIProvider>,
    fallback: Option<Arc<dyn AIProvider>>,
}

impl FailoverAIProvider {
    /// Creates a new failover provider with only a primary provider.
    pub fn new(primary: Arc<dyn AIProvider>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    /// Adds a fallback provider.
    pub fn with_fallback(mut self, fallback: Arc<dyn AIProvider>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Whether a fallback provider is configured.
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

#[async_trait]
impl AIProvider for FailoverAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let err = match self.primary.complete(request.clone()).await {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        match self.fallback {
            Some(ref fallback) if err.is_retryable() => {
                tracing::warn!(
                    request_id = %request.metadata.request_id,
                    primary = %self.primary.provider_info().name,
                    fallback = %fallback.provider_info().name,
                    reason = %err,
                    "primary AI provider failed, using fallback"
                );
                fallback.complete(request).await
            }
            _ => Err(err),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        // Report primary provider's info
        self.primary.provider_info()
    }
}
