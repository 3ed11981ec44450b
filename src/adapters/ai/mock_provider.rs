//! Mock AI Provider for testing.
//!
//! Stands in for a language model so the Analysis Gateway can be exercised
//! without network access. Replies are queued and consumed in order; once the
//! queue is empty every call gets a plain mid-confidence valuation.
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_valuation(410_000, 450_000)
//!     .with_error(MockError::Timeout { timeout_secs: 60 });
//! ```

use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ProviderInfo, TokenUsage,
};

/// Content returned once the queue is exhausted.
const DEFAULT_CONTENT: &str =
    r#"{"estimatedValue":{"lower":250000,"upper":300000},"confidence":"medium"}"#;

/// Queued reply for the next `complete` call.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Model text, returned verbatim as the completion content.
    Content(String),
    Error(MockError),
}

/// Provider failures the mock can simulate.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    ContentFiltered { reason: String },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::ContentFiltered { reason } => AIError::content_filtered(reason),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scripted language model. Clones share the queue and call history.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    queue: Arc<Mutex<VecDeque<MockResponse>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
    info: ProviderInfo,
    delay: Duration,
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self {
            queue: Arc::default(),
            calls: Arc::default(),
            info: ProviderInfo::new("mock", "mock-valuer", 128_000),
            delay: Duration::ZERO,
        }
    }

    /// Queues raw model text, fences and prose included.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        lock(&self.queue).push_back(MockResponse::Content(content.into()));
        self
    }

    /// Queues a bare valuation range as the model would print it.
    pub fn with_valuation(self, lower: u64, upper: u64) -> Self {
        let content = json!({ "estimatedValue": { "lower": lower, "upper": upper } });
        self.with_response(content.to_string())
    }

    pub fn with_error(self, error: MockError) -> Self {
        lock(&self.queue).push_back(MockResponse::Error(error));
        self
    }

    /// Latency applied to every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.info = info;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Every request received, oldest first.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        lock(&self.calls).clone()
    }

    /// Text of the last user message sent to the model.
    pub fn last_prompt(&self) -> Option<String> {
        lock(&self.calls).last().and_then(|request| {
            request
                .messages
                .iter()
                .rev()
                .find(|m| m.role == MessageRole::User)
                .map(|m| m.content.clone())
        })
    }

    fn next_response(&self) -> MockResponse {
        lock(&self.queue)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Content(DEFAULT_CONTENT.to_string()))
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        lock(&self.calls).push(request);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Content(content) => {
                let completion_tokens = (content.len() / 4) as u32;
                Ok(CompletionResponse {
                    content,
                    usage: TokenUsage::new(120, completion_tokens),
                    model: self.info.model.clone(),
                    finish_reason: FinishReason::Stop,
                })
            }
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::RequestId;
    use crate::ports::RequestMetadata;

    fn valuation_request(address: &str) -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(RequestId::new(), "analyze-property"))
            .with_message(MessageRole::User, format!("Address: {}", address))
    }

    #[tokio::test]
    async fn replies_are_consumed_in_order() {
        let provider = MockAIProvider::new()
            .with_response("```json\n{}\n```")
            .with_valuation(100_000, 120_000);

        let first = provider.complete(valuation_request("1 Rd")).await.unwrap();
        let second = provider.complete(valuation_request("2 Rd")).await.unwrap();

        assert_eq!(first.content, "```json\n{}\n```");
        let value: serde_json::Value = serde_json::from_str(&second.content).unwrap();
        assert_eq!(value["estimatedValue"]["upper"], 120_000);
        assert_eq!(second.model, "mock-valuer");
    }

    #[tokio::test]
    async fn exhausted_queue_returns_default_valuation() {
        let provider = MockAIProvider::new();

        let response = provider.complete(valuation_request("1 Rd")).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&response.content).unwrap();

        assert_eq!(value["estimatedValue"]["lower"], 250000);
        assert_eq!(value["confidence"], "medium");
    }

    #[tokio::test]
    async fn queued_error_is_returned_once() {
        let provider =
            MockAIProvider::new().with_error(MockError::RateLimited { retry_after_secs: 30 });

        let err = provider.complete(valuation_request("1 Rd")).await.unwrap_err();
        assert!(matches!(err, AIError::RateLimited { retry_after_secs: 30 }));

        assert!(provider.complete(valuation_request("1 Rd")).await.is_ok());
    }

    #[tokio::test]
    async fn records_prompts_across_clones() {
        let provider = MockAIProvider::new();
        let handle = provider.clone();

        provider.complete(valuation_request("1 Rd")).await.unwrap();
        provider.complete(valuation_request("9 Mill Lane")).await.unwrap();

        assert_eq!(handle.call_count(), 2);
        assert_eq!(handle.last_prompt().as_deref(), Some("Address: 9 Mill Lane"));
        assert_eq!(handle.calls()[0].metadata.operation, "analyze-property");
    }

    #[tokio::test]
    async fn delay_is_applied() {
        let provider = MockAIProvider::new().with_delay(Duration::from_millis(50));

        let start = std::time::Instant::now();
        provider.complete(valuation_request("1 Rd")).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn mock_errors_map_to_provider_errors() {
        let err: AIError = MockError::Timeout { timeout_secs: 30 }.into();
        assert!(matches!(err, AIError::Timeout { timeout_secs: 30 }));

        let err: AIError = MockError::Network { message: "reset".into() }.into();
        assert!(matches!(err, AIError::Network(_)));
    }
}
