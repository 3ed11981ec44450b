//! Application handlers.
//!
//! Command handlers behind the two gateway endpoints.

mod analyze_property;
mod send_valuation_email;

pub use analyze_property::{
    AnalysisError, AnalyzePropertyCommand, AnalyzePropertyHandler, AnalyzePropertyResult,
};
pub use send_valuation_email::{
    NotificationError, SendValuationEmailCommand, SendValuationEmailHandler,
};
