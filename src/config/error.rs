//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid timeout for {0} (must be 1-300 seconds)")]
    InvalidTimeout(&'static str),

    #[error("ai.max_retries of {0} exceeds the limit of 5")]
    TooManyRetries(u32),

    #[error("{inner} budget of {inner_secs}s exceeds {outer} of {outer_secs}s")]
    TimeoutBudgetExceeded {
        inner: &'static str,
        inner_secs: u64,
        outer: &'static str,
        outer_secs: u64,
    },

    #[error("No AI provider configured")]
    NoAiProviderConfigured,

    #[error("Invalid Resend API key format")]
    InvalidResendKey,

    #[error("Invalid from email address")]
    InvalidFromEmail,

    #[error("Invalid sales inbox address")]
    InvalidNotifyEmail,

    #[error("Invalid gateway base URL: {0}")]
    InvalidBaseUrl(String),
}
