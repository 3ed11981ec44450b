//! Contact dialog: collects the lead's details and hands them to the
//! Notification Gateway.
//!
//! Failures here are scoped to the dialog. They never touch the estimate on
//! display.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use super::Notice;
use crate::domain::foundation::ValidationError;
use crate::domain::valuation::{ContactField, ValuationFormData, ValuationSubmission};
use crate::ports::{GatewayError, NotificationGateway};

const CONFIRMATION: &str =
    "Thank you! Your valuation request has been sent. We'll be in touch shortly.";
const INCOMPLETE: &str = "Please fill in all fields with a valid email address.";

/// Why a submission did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("a submission is already in progress")]
    AlreadySubmitting,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Debug, Default)]
struct DialogState {
    open: bool,
    submitting: bool,
    draft: ValuationFormData,
    notice: Option<Notice>,
}

/// Handle to one contact dialog. Clones share the same dialog.
#[derive(Debug, Clone, Default)]
pub struct ContactDialog {
    state: Arc<Mutex<DialogState>>,
}

impl ContactDialog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, DialogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn open(&self) {
        let mut state = self.lock();
        state.open = true;
        state.notice = None;
    }

    /// Hides the dialog; the draft is kept for the next open.
    pub fn close(&self) {
        self.lock().open = false;
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().submitting
    }

    pub fn update_field(&self, field: ContactField, value: impl Into<String>) {
        self.lock().draft.set(field, value);
    }

    pub fn draft(&self) -> ValuationFormData {
        self.lock().draft.clone()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.lock().notice.clone()
    }

    /// Validates the draft and sends it with the displayed estimate.
    ///
    /// Exactly one gateway call is made per accepted submission. On success
    /// the draft is cleared and the dialog closed; on failure both stay as
    /// they were so the user can retry.
    pub async fn submit(
        &self,
        gateway: &dyn NotificationGateway,
        formatted_estimate: &str,
    ) -> Result<(), ContactError> {
        let submission = {
            let mut state = self.lock();
            if state.submitting {
                return Err(ContactError::AlreadySubmitting);
            }
            match ValuationSubmission::new(&state.draft, formatted_estimate) {
                Ok(submission) => {
                    state.submitting = true;
                    state.notice = None;
                    submission
                }
                Err(err) => {
                    state.notice = Some(Notice::error(INCOMPLETE, false));
                    return Err(err.into());
                }
            }
        };

        let result = gateway.notify(&submission).await;

        let mut state = self.lock();
        state.submitting = false;
        match result {
            Ok(()) => {
                state.draft = ValuationFormData::default();
                state.open = false;
                state.notice = Some(Notice::success(CONFIRMATION));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "valuation contact submission failed");
                state.notice = Some(Notice::error(err.user_message(), true));
                Err(err.into())
            }
        }
    }
}
