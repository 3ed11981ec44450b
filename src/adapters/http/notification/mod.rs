//! HTTP adapter for the Notification Gateway.

mod dto;
mod handlers;
mod routes;

pub use dto::{SendValuationRequest, SendValuationResponse};
pub use handlers::{send_valuation, NotificationApiError, NotificationAppState};
pub use routes::notification_routes;
