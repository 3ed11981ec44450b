//! reqwest client for `POST /api/send-valuation`.

use async_trait::async_trait;
use std::time::Duration;

use super::GatewayHttp;
use crate::config::ClientConfig;
use crate::domain::valuation::ValuationSubmission;
use crate::ports::{GatewayError, NotificationGateway};

pub const SEND_VALUATION_PATH: &str = "/api/send-valuation";

/// Calls a remote Notification Gateway.
#[derive(Debug, Clone)]
pub struct HttpNotificationGateway {
    http: GatewayHttp,
}

impl HttpNotificationGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: GatewayHttp::new(base_url, timeout),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.base_url.clone(), config.timeout())
    }
}

#[async_trait]
impl NotificationGateway for HttpNotificationGateway {
    async fn notify(&self, submission: &ValuationSubmission) -> Result<(), GatewayError> {
        self.http
            .post_json(SEND_VALUATION_PATH, submission)
            .await
            .map(|_| ())
    }
}
