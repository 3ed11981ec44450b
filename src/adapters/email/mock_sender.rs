//! In-memory EmailSender for tests and local runs.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ports::{EmailError, EmailMessage, EmailReceipt, EmailSender};

/// Records every message and answers with queued failures, else success.
#[derive(Debug, Clone, Default)]
pub struct MockEmailSender {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    failures: Arc<Mutex<VecDeque<EmailError>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an error for the next send.
    pub fn with_failure(self, error: EmailError) -> Self {
        lock(&self.failures).push_back(error);
        self
    }

    /// Messages handed to `send`, including failed ones.
    pub fn sent(&self) -> Vec<EmailMessage> {
        lock(&self.sent).clone()
    }

    pub fn sent_count(&self) -> usize {
        lock(&self.sent).len()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        let index = {
            let mut sent = lock(&self.sent);
            sent.push(message);
            sent.len()
        };

        if let Some(err) = lock(&self.failures).pop_front() {
            return Err(err);
        }

        Ok(EmailReceipt {
            id: format!("mock-email-{}", index),
        })
    }
}
