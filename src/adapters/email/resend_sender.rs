//! Resend adapter for the EmailSender port.
//!
//! # Configuration
//!
//! ```ignore
//! let config = ResendConfig::new(api_key, "Valuations <valuations@agency.test>");
//! let sender = ResendEmailSender::new(config);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{EmailError, EmailMessage, EmailReceipt, EmailSender};

/// Resend API configuration.
#[derive(Debug, Clone)]
pub struct ResendConfig {
    /// Resend API key (re_...).
    api_key: Secret<String>,
    /// Formatted sender, e.g. `Name <address>`.
    pub from: String,
    /// Base URL for the API (default: https://api.resend.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ResendConfig {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            from: from.into(),
            base_url: "https://api.resend.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Sends transactional email through Resend.
pub struct ResendEmailSender {
    config: ResendConfig,
    http_client: Client,
}

impl ResendEmailSender {
    pub fn new(config: ResendConfig) -> Self {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            config,
            http_client,
        }
    }

    fn emails_url(&self) -> String {
        format!("{}/emails", self.config.base_url.trim_end_matches('/'))
    }

    fn to_resend_request<'a>(&'a self, message: &'a EmailMessage) -> ResendRequest<'a> {
        ResendRequest {
            from: &self.config.from,
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
            reply_to: message.reply_to.as_deref(),
        }
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        let response = self
            .http_client
            .post(self.emails_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&self.to_resend_request(&message))
            .send()
            .await
            .map_err(|e| EmailError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ResendErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or(body);
            tracing::warn!(status = status.as_u16(), error = %message, "Resend rejected email");
            return Err(EmailError::rejected(status.as_u16(), message));
        }

        let receipt: ResendResponse = response
            .json()
            .await
            .map_err(|e| EmailError::Parse(e.to_string()))?;

        Ok(EmailReceipt { id: receipt.id })
    }
}

// ----- Resend API Types -----

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ResendErrorBody {
    message: Option<String>,
}
