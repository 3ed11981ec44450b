//! HTTP handlers for the Notification Gateway.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::{ApiJson, ErrorResponse};
use crate::application::handlers::{
    NotificationError, SendValuationEmailCommand, SendValuationEmailHandler,
};
use crate::domain::valuation::ValuationSubmission;
use crate::ports::EmailSender;

use super::dto::{SendValuationRequest, SendValuationResponse};

#[derive(Clone)]
pub struct NotificationAppState {
    pub email_sender: Arc<dyn EmailSender>,
    /// Inbox that receives lead notifications.
    pub notify_to: String,
}

impl NotificationAppState {
    pub fn new(email_sender: Arc<dyn EmailSender>, notify_to: impl Into<String>) -> Self {
        Self {
            email_sender,
            notify_to: notify_to.into(),
        }
    }

    pub fn send_valuation_email_handler(&self) -> SendValuationEmailHandler {
        SendValuationEmailHandler::new(self.email_sender.clone(), self.notify_to.clone())
    }
}

/// POST /api/send-valuation - Email a lead to the sales inbox
pub async fn send_valuation(
    State(state): State<NotificationAppState>,
    ApiJson(body): ApiJson<SendValuationRequest>,
) -> Result<impl IntoResponse, NotificationApiError> {
    let cmd = SendValuationEmailCommand::new(ValuationSubmission::from(body));
    let receipt = state.send_valuation_email_handler().handle(cmd).await?;

    Ok(Json(SendValuationResponse { id: receipt.id }))
}

#[derive(Debug)]
pub struct NotificationApiError(NotificationError);

impl From<NotificationError> for NotificationApiError {
    fn from(err: NotificationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for NotificationApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            NotificationError::Validation(_) => StatusCode::BAD_REQUEST,
            NotificationError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse::new(self.0.code(), self.0.public_message());
        (status, Json(body)).into_response()
    }
}
