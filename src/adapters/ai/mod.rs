//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port for various LLM providers.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing
//! - `OpenAIProvider` - OpenAI chat models
//! - `AnthropicProvider` - Anthropic Claude models
//! - `FailoverAIProvider` - Wrapper with automatic failover between providers

mod anthropic_provider;
mod failover_provider;
mod mock_provider;
mod openai_provider;
mod retry;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use failover_provider::FailoverAIProvider;
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
