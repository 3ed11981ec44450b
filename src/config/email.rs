//! Email configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Email configuration (Resend)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key
    #[serde(default)]
    pub resend_api_key: String,

    /// Resend API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Sales inbox that receives valuation requests
    #[serde(default = "default_notify_to")]
    pub notify_to: String,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.resend_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("RESEND_API_KEY"));
        }
        if !self.resend_api_key.starts_with("re_") {
            return Err(ValidationError::InvalidResendKey);
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        if !self.notify_to.contains('@') {
            return Err(ValidationError::InvalidNotifyEmail);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: String::new(),
            base_url: default_base_url(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            notify_to: default_notify_to(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_from_email() -> String {
    "valuations@resend.dev".to_string()
}

fn default_from_name() -> String {
    "Property Valuation".to_string()
}

fn default_notify_to() -> String {
    "sales@example.com".to_string()
}
