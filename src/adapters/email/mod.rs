//! Email Sender Adapters.
//!
//! - `ResendEmailSender` - Resend HTTP API
//! - `MockEmailSender` - Records messages for tests

mod mock_sender;
mod resend_sender;

pub use mock_sender::MockEmailSender;
pub use resend_sender::{ResendConfig, ResendEmailSender};
