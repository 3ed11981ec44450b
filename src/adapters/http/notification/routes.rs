//! Route configuration for the Notification Gateway.

use axum::routing::post;
use axum::Router;

use super::handlers::{send_valuation, NotificationAppState};

/// Routes:
/// - `POST /api/send-valuation` - Forward a contact submission by email
pub fn notification_routes() -> Router<NotificationAppState> {
    Router::new().route("/api/send-valuation", post(send_valuation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::email::MockEmailSender;
    use crate::ports::EmailError;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(sender: MockEmailSender) -> Router {
        notification_routes()
            .with_state(NotificationAppState::new(Arc::new(sender), "sales@example.com"))
    }

    fn post_json(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/send-valuation")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn lead() -> Value {
        json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": "07700 900000",
            "address": "1 High St",
            "estimatedValue": "£275,000"
        })
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn sends_email_and_returns_id() {
        let sender = MockEmailSender::new();
        let response = app(sender.clone()).oneshot(post_json(lead())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["id"], "mock-email-1");

        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["sales@example.com".to_string()]);
        assert!(sent[0].text.contains("£275,000"));
    }

    #[tokio::test]
    async fn missing_field_is_bad_request() {
        let sender = MockEmailSender::new();
        let mut body = lead();
        body["phone"] = json!("");

        let response = app(sender.clone()).oneshot(post_json(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"], "phone is required");
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert_eq!(sender.sent_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_is_server_error() {
        let sender = MockEmailSender::new().with_failure(EmailError::rejected(422, "bad from"));
        let response = app(sender).oneshot(post_json(lead())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert_eq!(body["code"], "EMAIL_FAILED");
    }

    #[tokio::test]
    async fn malformed_json_uses_error_body() {
        let sender = MockEmailSender::new();
        let request = Request::builder()
            .method("POST")
            .uri("/api/send-valuation")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"name\": "))
            .unwrap();

        let response = app(sender.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["code"], "INVALID_REQUEST_BODY");
        assert!(!body["error"].as_str().unwrap().is_empty());
        assert_eq!(sender.sent_count(), 0);
    }

    #[tokio::test]
    async fn missing_content_type_uses_error_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/send-valuation")
            .body(Body::from(lead().to_string()))
            .unwrap();

        let response = app(MockEmailSender::new()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body = read_json(response).await;
        assert_eq!(body["code"], "INVALID_REQUEST_BODY");
    }
}
