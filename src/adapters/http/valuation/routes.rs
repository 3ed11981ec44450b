//! Route configuration for the Analysis Gateway.

use axum::routing::post;
use axum::Router;

use super::handlers::{analyze_property, ValuationAppState};

/// Routes:
/// - `POST /api/analyze-property` - Structured valuation from the language model
pub fn valuation_routes() -> Router<ValuationAppState> {
    Router::new().route("/api/analyze-property", post(analyze_property))
}
