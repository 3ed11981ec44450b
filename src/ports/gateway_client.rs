//! Client-side ports for the two gateways.
//!
//! The Estimate Request Client and the contact dialog talk to the gateways
//! only through these traits, so they can be exercised without a network.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::valuation::{EstimateError, ValuationRequest, ValuationSubmission};

/// Outbound call to the Analysis Gateway.
#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    /// Posts `{address, propertyType}` and returns the raw 2xx body.
    ///
    /// Shape validation is the caller's job.
    async fn analyze(&self, request: &ValuationRequest) -> Result<Value, GatewayError>;
}

/// Outbound call to the Notification Gateway.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Posts the contact submission; success carries no payload.
    async fn notify(&self, submission: &ValuationSubmission) -> Result<(), GatewayError>;
}

/// Transport-level or gateway-reported failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Could not reach the gateway.
    #[error("network error: {0}")]
    Network(String),

    /// Gateway answered with a non-2xx status.
    #[error("gateway returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Gateway answered 2xx but reported an error field.
    #[error("gateway reported error: {0}")]
    Reported(String),

    /// No answer within the allowed time.
    #[error("gateway timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl GatewayError {
    /// Message suitable for a user-facing notice.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Network(_) => {
                "Could not reach the valuation service. Please check your connection and try again."
                    .to_string()
            }
            GatewayError::Status { message, .. } => message.clone(),
            GatewayError::Reported(message) => message.clone(),
            GatewayError::Timeout { .. } => {
                "The valuation service took too long to respond".to_string()
            }
        }
    }
}

impl From<GatewayError> for EstimateError {
    fn from(err: GatewayError) -> Self {
        EstimateError::gateway(err.user_message())
    }
}
