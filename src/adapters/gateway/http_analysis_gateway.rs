//! reqwest client for `POST /api/analyze-property`.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::GatewayHttp;
use crate::config::ClientConfig;
use crate::domain::valuation::ValuationRequest;
use crate::ports::{AnalysisGateway, GatewayError};

pub const ANALYZE_PROPERTY_PATH: &str = "/api/analyze-property";

/// Calls a remote Analysis Gateway.
#[derive(Debug, Clone)]
pub struct HttpAnalysisGateway {
    http: GatewayHttp,
}

impl HttpAnalysisGateway {
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
impl AnalysisGateway for HttpAnalysisGateway {
    async fn analyze(&self, request: &ValuationRequest) -> Result<Value, GatewayError> {
        tracing::debug!(
            address = %request.address(),
            property_type = %request.property_type(),
            "requesting property analysis"
        );
        self.http.post_json(ANALYZE_PROPERTY_PATH, request).await
    }
}
