//! Request DTOs for the Analysis Gateway.
//!
//! The success body is the serialized `AIAnalysis` itself.

use serde::Deserialize;

use crate::domain::foundation::ValidationError;
use crate::domain::valuation::{PropertyType, ValuationRequest};

/// Body of `POST /api/analyze-property`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzePropertyRequest {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub property_type: PropertyType,
}

impl TryFrom<AnalyzePropertyRequest> for ValuationRequest {
    type Error = ValidationError;

    fn try_from(dto: AnalyzePropertyRequest) -> Result<Self, Self::Error> {
        ValuationRequest::new(dto.address, dto.property_type)
    }
}
