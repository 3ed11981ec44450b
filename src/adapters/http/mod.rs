//! HTTP adapters - REST API implementations.
//!
//! Each gateway has its own HTTP adapter; [`build_router`] assembles them
//! into the service the binary runs.

mod error;
mod extract;
pub mod notification;
pub mod valuation;

pub use error::ErrorResponse;
pub use extract::ApiJson;
pub use notification::{notification_routes, NotificationAppState};
pub use valuation::{valuation_routes, ValuationAppState};

use axum::http::{HeaderValue, Method};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Builds the full application router with CORS, timeout and tracing layers.
pub fn build_router(
    valuation: ValuationAppState,
    notification: NotificationAppState,
    server: &ServerConfig,
) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(valuation_routes().with_state(valuation))
        .merge(notification_routes().with_state(notification))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
