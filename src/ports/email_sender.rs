//! Email Sender Port - outbound transactional email.
//!
//! The Notification Gateway hands a composed message to this port; adapters
//! deliver it through a provider such as Resend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for sending a single email.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Sends the message, returning the provider's receipt.
    async fn send(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError>;
}

/// A fully composed email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub reply_to: Option<String>,
}

/// Provider acknowledgement of an accepted email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub id: String,
}

/// Email delivery failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailError {
    /// Provider refused the message.
    #[error("email provider rejected message ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Network error reaching the provider.
    #[error("network error: {0}")]
    Network(String),

    /// Provider answered with something we could not read.
    #[error("parse error: {0}")]
    Parse(String),
}

impl EmailError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Message safe to return to the caller.
    pub fn public_message(&self) -> String {
        match self {
            EmailError::Rejected { message, .. } if !message.is_empty() => message.clone(),
            _ => "Failed to send email".to_string(),
        }
    }
}
