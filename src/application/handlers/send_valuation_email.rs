//! SendValuationEmailHandler - forwards a contact submission to the sales inbox.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{Timestamp, ValidationError};
use crate::domain::valuation::ValuationSubmission;
use crate::ports::{EmailError, EmailMessage, EmailReceipt, EmailSender};

/// Command carrying the lead's details.
#[derive(Debug, Clone)]
pub struct SendValuationEmailCommand {
    pub submission: ValuationSubmission,
    pub requested_at: Timestamp,
}

impl SendValuationEmailCommand {
    pub fn new(submission: ValuationSubmission) -> Self {
        Self {
            submission,
            requested_at: Timestamp::now(),
        }
    }
}

/// Why a notification was not sent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NotificationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("email delivery failed: {0}")]
    Delivery(#[from] EmailError),
}

impl NotificationError {
    pub fn code(&self) -> &'static str {
        match self {
            NotificationError::Validation(_) => "VALIDATION_FAILED",
            NotificationError::Delivery(_) => "EMAIL_FAILED",
        }
    }

    pub fn public_message(&self) -> String {
        match self {
            NotificationError::Validation(err) => match err {
                ValidationError::EmptyField { field } => format!("{} is required", field),
                other => other.to_string(),
            },
            NotificationError::Delivery(err) => err.public_message(),
        }
    }
}

/// Handler for `POST /api/send-valuation`.
pub struct SendValuationEmailHandler {
    sender: Arc<dyn EmailSender>,
    notify_to: String,
}

impl SendValuationEmailHandler {
    pub fn new(sender: Arc<dyn EmailSender>, notify_to: impl Into<String>) -> Self {
        Self {
            sender,
            notify_to: notify_to.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: SendValuationEmailCommand,
    ) -> Result<EmailReceipt, NotificationError> {
        cmd.submission.validate()?;

        let message = compose(&cmd.submission, &cmd.requested_at, &self.notify_to);
        let receipt = self.sender.send(message).await.map_err(|err| {
            tracing::error!(error = %err, "failed to send valuation email");
            NotificationError::Delivery(err)
        })?;

        tracing::info!(email_id = %receipt.id, "valuation request emailed to sales");
        Ok(receipt)
    }
}

fn compose(submission: &ValuationSubmission, at: &Timestamp, to: &str) -> EmailMessage {
    let requested = at.to_display_string();
    let rows = [
        ("Name", submission.name.as_str()),
        ("Email", submission.email.as_str()),
        ("Phone", submission.phone.as_str()),
        ("Property address", submission.address.as_str()),
        ("Estimated value", submission.estimated_value.as_str()),
        ("Requested", requested.as_str()),
    ];

    let text = rows
        .iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect::<Vec<_>>()
        .join("\n");

    let html_rows: String = rows
        .iter()
        .map(|(label, value)| {
            format!(
                "<tr><th align=\"left\">{}</th><td>{}</td></tr>",
                label,
                escape_html(value)
            )
        })
        .collect();

    EmailMessage {
        to: vec![to.to_string()],
        subject: format!("New valuation request: {}", submission.address),
        html: format!(
            "<h2>New valuation request</h2><table>{}</table>",
            html_rows
        ),
        text: format!("New valuation request\n\n{}", text),
        reply_to: Some(submission.email.clone()),
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::email::MockEmailSender;

    fn submission() -> ValuationSubmission {
        ValuationSubmission {
            name: "Ada <Lovelace>".to_string(),
            email: "ada@example.com".to_string(),
            phone: "07700 900000".to_string(),
            address: "1 High St".to_string(),
            estimated_value: "£275,000".to_string(),
        }
    }

    fn handler(sender: &MockEmailSender) -> SendValuationEmailHandler {
        SendValuationEmailHandler::new(Arc::new(sender.clone()), "sales@agency.test")
    }

    #[tokio::test]
    async fn sends_to_sales_inbox_with_reply_to_lead() {
        let sender = MockEmailSender::new();
        let receipt = handler(&sender)
            .handle(SendValuationEmailCommand::new(submission()))
            .await
            .unwrap();

        assert_eq!(receipt.id, "mock-email-1");
        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        let message = &sent[0];
        assert_eq!(message.to, vec!["sales@agency.test".to_string()]);
        assert_eq!(message.subject, "New valuation request: 1 High St");
        assert_eq!(message.reply_to.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn bodies_list_every_field() {
        let sender = MockEmailSender::new();
        handler(&sender)
            .handle(SendValuationEmailCommand::new(submission()))
            .await
            .unwrap();

        let message = &sender.sent()[0];
        for expected in ["07700 900000", "£275,000", "1 High St", "Requested:"] {
            assert!(message.text.contains(expected), "text missing {expected}");
        }
        assert!(message.html.contains("Ada &lt;Lovelace&gt;"));
        assert!(!message.html.contains("<Lovelace>"));
    }

    #[tokio::test]
    async fn empty_field_is_rejected_before_sending() {
        let sender = MockEmailSender::new();
        let mut incomplete = submission();
        incomplete.phone = " ".to_string();

        let err = handler(&sender)
            .handle(SendValuationEmailCommand::new(incomplete))
            .await
            .unwrap_err();

        assert_eq!(err.public_message(), "phone is required");
        assert_eq!(err.code(), "VALIDATION_FAILED");
        assert_eq!(sender.sent_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_is_delivery_error() {
        let sender =
            MockEmailSender::new().with_failure(EmailError::Network("connection reset".into()));

        let err = handler(&sender)
            .handle(SendValuationEmailCommand::new(submission()))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "EMAIL_FAILED");
        assert_eq!(err.public_message(), "Failed to send email");
    }

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
