//! HTTP handlers for the Analysis Gateway.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::{ApiJson, ErrorResponse};
use crate::application::handlers::{AnalysisError, AnalyzePropertyCommand, AnalyzePropertyHandler};
use crate::domain::valuation::ValuationRequest;
use crate::ports::{AIError, AIProvider};

use super::dto::AnalyzePropertyRequest;

/// Dependencies for the valuation endpoints.
#[derive(Clone)]
pub struct ValuationAppState {
    pub ai_provider: Arc<dyn AIProvider>,
    pub max_tokens: u32,
}

impl ValuationAppState {
    pub fn new(ai_provider: Arc<dyn AIProvider>, max_tokens: u32) -> Self {
        Self {
            ai_provider,
            max_tokens,
        }
    }

    pub fn analyze_property_handler(&self) -> AnalyzePropertyHandler {
        AnalyzePropertyHandler::new(self.ai_provider.clone(), self.max_tokens)
    }
}

/// POST /api/analyze-property - Estimate a property's value
pub async fn analyze_property(
    State(state): State<ValuationAppState>,
    ApiJson(body): ApiJson<AnalyzePropertyRequest>,
) -> Result<impl IntoResponse, ValuationApiError> {
    let request = ValuationRequest::try_from(body).map_err(AnalysisError::from)?;

    let result = state
        .analyze_property_handler()
        .handle(AnalyzePropertyCommand { request })
        .await?;

    Ok(Json(result.analysis))
}

/// API error type that converts handler errors to HTTP responses.
#[derive(Debug)]
pub struct ValuationApiError(AnalysisError);

impl From<AnalysisError> for ValuationApiError {
    fn from(err: AnalysisError) -> Self {
        Self(err)
    }
}

impl ValuationApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            AnalysisError::Validation(_) => StatusCode::BAD_REQUEST,
            AnalysisError::Provider(AIError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            AnalysisError::Provider(AIError::RateLimited { .. })
            | AnalysisError::Provider(AIError::Unavailable { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AnalysisError::Provider(_) | AnalysisError::InvalidModelOutput(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for ValuationApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = ErrorResponse::new(self.0.code(), self.0.public_message());
        (status, Json(body)).into_response()
    }
}
