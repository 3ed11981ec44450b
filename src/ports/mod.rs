//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! application and the outside world. Adapters implement these ports.
//!
//! ## Gateway-side ports
//!
//! - `AIProvider` - Language model used by the Analysis Gateway
//! - `EmailSender` - Email provider used by the Notification Gateway
//!
//! ## Client-side ports
//!
//! - `AnalysisGateway` - Outbound call from the estimate client
//! - `NotificationGateway` - Outbound call from the contact dialog

mod ai_provider;
mod email_sender;
mod gateway_client;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use email_sender::{EmailError, EmailMessage, EmailReceipt, EmailSender};
pub use gateway_client::{AnalysisGateway, GatewayError, NotificationGateway};
