//! Gateway client adapters.
//!
//! reqwest implementations of the client-side ports, posting JSON to the
//! gateway routes served by `adapters::http`.

mod http_analysis_gateway;
mod http_notification_gateway;

pub use http_analysis_gateway::HttpAnalysisGateway;
pub use http_notification_gateway::HttpNotificationGateway;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::ports::GatewayError;

/// Shared reqwest plumbing for both gateway clients.
#[derive(Debug, Clone)]
pub(crate) struct GatewayHttp {
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl GatewayHttp {
    pub(crate) fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            client,
        }
    }

    /// Posts `body` to `path` and returns the decoded 2xx body.
    ///
    /// A non-2xx status, or a 2xx body carrying an `error` field, is a failure.
    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, GatewayError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        let parsed: Option<Value> = serde_json::from_str(&text).ok();
        let reported = parsed.as_ref().and_then(error_field);

        if !status.is_success() {
            let message = reported
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            tracing::warn!(url = %url, status = status.as_u16(), error = %message, "gateway call failed");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if let Some(message) = reported {
            tracing::warn!(url = %url, error = %message, "gateway reported an error");
            return Err(GatewayError::Reported(message));
        }

        // A 2xx body that is not JSON is left for shape validation to reject.
        Ok(parsed.unwrap_or(Value::Null))
    }

    fn transport_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

/// The `error` field of a gateway body, if it is a non-null value.
fn error_field(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_field_reads_strings_and_ignores_null() {
        assert_eq!(
            error_field(&json!({"error": "Address is required"})),
            Some("Address is required".to_string())
        );
        assert_eq!(error_field(&json!({"error": null})), None);
        assert_eq!(error_field(&json!({"estimatedValue": {}})), None);
    }

    #[test]
    fn error_field_stringifies_objects() {
        assert_eq!(
            error_field(&json!({"error": {"code": 1}})),
            Some("{\"code\":1}".to_string())
        );
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let http = GatewayHttp::new("http://localhost:8080/", Duration::from_secs(1));
        assert_eq!(http.base_url, "http://localhost:8080");
    }
}
