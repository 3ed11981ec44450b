//! EstimateSession - the state behind one valuation form.
//!
//! State lives behind a mutex that is never held across an await. Each submit
//! takes a ticket; `reset` invalidates the outstanding ticket and cancels the
//! gateway call, so a response that arrives afterwards is dropped instead of
//! overwriting the cleared form. At most one gateway call per form is ever in
//! flight: a submit after `reset` waits for the abandoned call to unwind.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::sync::Notify;

use super::EstimateRequestClient;
use crate::application::presenter::{Notice, ResultView};
use crate::domain::valuation::{AIAnalysis, EstimateError, PropertyType, ValuationRequest};

/// The estimate currently on display. Replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEstimate {
    pub request: ValuationRequest,
    pub analysis: AIAnalysis,
}

impl ActiveEstimate {
    pub fn point_value(&self) -> f64 {
        self.analysis.estimated_value.midpoint()
    }

    pub fn view(&self) -> ResultView {
        ResultView::build(self.point_value(), Some(&self.analysis))
    }
}

/// What happened to a completed submit.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The new estimate is now active.
    Applied(ActiveEstimate),
    /// The session was reset while the request was in flight.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("an estimate request is already in progress")]
    Busy,

    #[error(transparent)]
    Estimate(#[from] EstimateError),
}

#[derive(Debug, Default)]
struct SessionState {
    loading: bool,
    ticket: u64,
    /// A gateway call is running, possibly one abandoned by `reset`.
    in_flight: bool,
    cancel: Option<Arc<Notify>>,
    active: Option<ActiveEstimate>,
    notice: Option<Notice>,
}

/// One form instance. Clones share the same state.
#[derive(Clone)]
pub struct EstimateSession {
    client: EstimateRequestClient,
    state: Arc<Mutex<SessionState>>,
    idle: Arc<Notify>,
}

/// Marks the end of a gateway call, including one dropped mid-await.
struct InFlight<'a> {
    session: &'a EstimateSession,
    ticket: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        {
            let mut state = self.session.lock();
            state.in_flight = false;
            if state.ticket == self.ticket {
                state.loading = false;
                state.cancel = None;
            }
        }
        self.session.idle.notify_waiters();
    }
}

impl EstimateSession {
    pub fn new(client: EstimateRequestClient) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(SessionState::default())),
            idle: Arc::new(Notify::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn active_estimate(&self) -> Option<ActiveEstimate> {
        self.lock().active.clone()
    }

    pub fn result_view(&self) -> Option<ResultView> {
        self.lock().active.as_ref().map(ActiveEstimate::view)
    }

    pub fn notice(&self) -> Option<Notice> {
        self.lock().notice.clone()
    }

    /// Submits the form.
    ///
    /// On failure the previous estimate stays active and an error notice is
    /// set. A submit while another is loading is refused without a call.
    pub async fn submit(
        &self,
        address: &str,
        property_type: PropertyType,
    ) -> Result<SubmitOutcome, SessionError> {
        let request = match ValuationRequest::new(address, property_type) {
            Ok(request) => request,
            Err(err) => {
                let mut state = self.lock();
                if state.loading {
                    return Err(SessionError::Busy);
                }
                let err = EstimateError::from(err);
                state.notice = Some(Notice::error(err.user_message(), false));
                return Err(err.into());
            }
        };

        let (ticket, cancel) = loop {
            let idle = {
                let mut state = self.lock();
                if state.loading {
                    return Err(SessionError::Busy);
                }
                if !state.in_flight {
                    let cancel = Arc::new(Notify::new());
                    state.loading = true;
                    state.in_flight = true;
                    state.ticket += 1;
                    state.cancel = Some(Arc::clone(&cancel));
                    state.notice = None;
                    break (state.ticket, cancel);
                }
                // registered before the lock is released so the wakeup is not lost
                self.idle.notified()
            };
            tracing::debug!("waiting for abandoned estimate request to finish");
            idle.await;
        };
        let _in_flight = InFlight {
            session: self,
            ticket,
        };

        let result = tokio::select! {
            result = self.client.request_estimate(&request) => Some(result),
            _ = cancel.notified() => None,
        };

        let mut state = self.lock();
        let result = match result {
            Some(result) if state.ticket == ticket => result,
            _ => {
                tracing::debug!(ticket, "discarding estimate response after reset");
                return Ok(SubmitOutcome::Discarded);
            }
        };
        state.loading = false;

        match result {
            Ok(analysis) => {
                let active = ActiveEstimate { request, analysis };
                state.active = Some(active.clone());
                state.notice = None;
                Ok(SubmitOutcome::Applied(active))
            }
            Err(err) => {
                state.notice = Some(Notice::error(err.user_message(), err.is_retryable()));
                Err(err.into())
            }
        }
    }

    /// Clears the form and cancels any request in flight.
    pub fn reset(&self) {
        let cancel = {
            let mut state = self.lock();
            state.ticket += 1;
            state.loading = false;
            state.active = None;
            state.notice = None;
            state.cancel.take()
        };
        if let Some(cancel) = cancel {
            cancel.notify_one();
        }
    }
}
