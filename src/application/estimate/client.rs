//! EstimateRequestClient - turns a valuation request into a validated analysis.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::config::ClientConfig;
use crate::domain::valuation::{validate_analysis, AIAnalysis, EstimateError, ValuationRequest};
use crate::ports::{AnalysisGateway, GatewayError};

/// Makes exactly one Analysis Gateway call per request, never retrying.
#[derive(Clone)]
pub struct EstimateRequestClient {
    gateway: Arc<dyn AnalysisGateway>,
    timeout: Duration,
}

impl EstimateRequestClient {
    pub fn new(gateway: Arc<dyn AnalysisGateway>, timeout: Duration) -> Self {
        Self { gateway, timeout }
    }

    /// Client bounded by `client.timeout_secs`.
    pub fn from_config(gateway: Arc<dyn AnalysisGateway>, config: &ClientConfig) -> Self {
        Self::new(gateway, config.timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Requests an estimate.
    ///
    /// # Errors
    ///
    /// - `Validation` for a blank address, before any call is made
    /// - `Gateway` for transport failures, non-2xx statuses, gateway-reported
    ///   errors and timeouts
    /// - `MalformedResponse` when the body lacks a usable `estimatedValue`
    pub async fn request_estimate(
        &self,
        request: &ValuationRequest,
    ) -> Result<AIAnalysis, EstimateError> {
        request.validate()?;

        let body = match timeout(self.timeout, self.gateway.analyze(request)).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "analysis gateway did not answer in time"
                );
                return Err(GatewayError::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                }
                .into());
            }
        };

        validate_analysis(&body).map_err(|err| {
            tracing::warn!(error = ?err, "analysis response failed validation");
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::valuation::PropertyType;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct MockAnalysisGateway {
        calls: AtomicUsize,
        responses: Mutex<Vec<Result<Value, GatewayError>>>,
        delay: Duration,
    }

    impl MockAnalysisGateway {
        fn returning(response: Result<Value, GatewayError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                responses: Mutex::new(vec![response]),
                delay: Duration::ZERO,
            }
        }

        fn hanging() -> Self {
            Self {
                delay: Duration::from_secs(3600),
                ..Self::returning(Ok(json!({})))
            }
        }
    }

    #[async_trait]
    impl AnalysisGateway for MockAnalysisGateway {
        async fn analyze(&self, _request: &ValuationRequest) -> Result<Value, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Ok(Value::Null))
        }
    }

    fn request() -> ValuationRequest {
        ValuationRequest::new("1 High St", PropertyType::House).unwrap()
    }

    fn client(gateway: &Arc<MockAnalysisGateway>) -> EstimateRequestClient {
        EstimateRequestClient::new(gateway.clone(), Duration::from_secs(60))
    }

    #[tokio::test]
    async fn valid_body_becomes_analysis() {
        let gateway = Arc::new(MockAnalysisGateway::returning(Ok(json!({
            "estimatedValue": {"lower": 250000, "upper": 300000}
        }))));

        let analysis = client(&gateway).request_estimate(&request()).await.unwrap();

        assert_eq!(analysis.estimated_value.midpoint(), 275000.0);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn blank_address_makes_no_call() {
        let gateway = Arc::new(MockAnalysisGateway::returning(Ok(json!({}))));
        let blank: ValuationRequest =
            serde_json::from_value(json!({"address": " ", "propertyType": "land"})).unwrap();

        let err = client(&gateway).request_estimate(&blank).await.unwrap_err();

        assert!(matches!(err, EstimateError::Validation(_)));
        assert_eq!(err.user_message(), "Please enter a property address.");
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn gateway_failure_is_not_retried() {
        let gateway = Arc::new(MockAnalysisGateway::returning(Err(GatewayError::Status {
            status: 503,
            message: "Service unavailable".to_string(),
        })));

        let err = client(&gateway).request_estimate(&request()).await.unwrap_err();

        assert_eq!(err, EstimateError::gateway("Service unavailable"));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_bound_is_malformed() {
        let gateway = Arc::new(MockAnalysisGateway::returning(Ok(json!({
            "estimatedValue": {"lower": 250000},
            "confidence": "high",
            "analysis": "Lovely"
        }))));

        let err = client(&gateway).request_estimate(&request()).await.unwrap_err();

        assert!(matches!(err, EstimateError::MalformedResponse { .. }));
        assert_eq!(err.to_string(), "Invalid response format from analysis");
    }

    #[tokio::test]
    async fn hung_gateway_times_out() {
        let gateway = Arc::new(MockAnalysisGateway::hanging());
        let client = EstimateRequestClient::new(gateway.clone(), Duration::from_millis(50));

        let err = client.request_estimate(&request()).await.unwrap_err();

        assert_eq!(
            err,
            EstimateError::gateway("The valuation service took too long to respond")
        );
    }

    #[test]
    fn configured_timeout_bounds_requests() {
        let gateway = Arc::new(MockAnalysisGateway::returning(Ok(json!({}))));
        let config = ClientConfig {
            timeout_secs: 15,
            ..Default::default()
        };

        let client = EstimateRequestClient::from_config(gateway, &config);

        assert_eq!(client.timeout(), Duration::from_secs(15));
    }
}
