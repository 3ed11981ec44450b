//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PROPERTY_VALUATION` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use property_valuation::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod client;
mod email;
mod error;
mod server;

pub use ai::{AiConfig, AiProvider};
pub use client::ClientConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// AI provider configuration (Anthropic/OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Email configuration (Resend)
    #[serde(default)]
    pub email: EmailConfig,

    /// Gateway client configuration
    #[serde(default)]
    pub client: ClientConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PROPERTY_VALUATION` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PROPERTY_VALUATION__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PROPERTY_VALUATION__AI__ANTHROPIC_API_KEY=...` -> `ai.anthropic_api_key = ...`
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PROPERTY_VALUATION")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.email.validate()?;
        self.client.validate()?;
        self.validate_timeout_budget()
    }

    /// Each layer must outlast the one it waits on, otherwise provider
    /// retries are cut off before they can run.
    fn validate_timeout_budget(&self) -> Result<(), ValidationError> {
        let budget = self.ai.retry_budget_secs();
        if budget > self.server.request_timeout_secs {
            return Err(ValidationError::TimeoutBudgetExceeded {
                inner: "ai retry",
                inner_secs: budget,
                outer: "server.request_timeout_secs",
                outer_secs: self.server.request_timeout_secs,
            });
        }
        if self.server.request_timeout_secs > self.client.timeout_secs {
            return Err(ValidationError::TimeoutBudgetExceeded {
                inner: "server.request_timeout_secs",
                inner_secs: self.server.request_timeout_secs,
                outer: "client.timeout_secs",
                outer_secs: self.client.timeout_secs,
            });
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
