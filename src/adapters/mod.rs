//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `ai` - Language model providers (OpenAI, Anthropic, failover, mock)
//! - `email` - Email delivery (Resend, mock)
//! - `gateway` - HTTP clients for the two gateway endpoints
//! - `http` - axum routes serving the gateway endpoints

pub mod ai;
pub mod email;
pub mod gateway;
pub mod http;
