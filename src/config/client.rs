//! Estimate client configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::MAX_TIMEOUT_SECS;

/// Settings for the outbound gateway clients.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Where the gateways are served from
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound on a single estimate request, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate client configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ValidationError::InvalidTimeout("client.timeout_secs"));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout() -> u64 {
    110
}
