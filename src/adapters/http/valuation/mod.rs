//! HTTP adapter for the Analysis Gateway.

mod dto;
mod handlers;
mod routes;

pub use dto::AnalyzePropertyRequest;
pub use handlers::{analyze_property, ValuationApiError, ValuationAppState};
pub use routes::valuation_routes;
