//! Request/response DTOs for the Notification Gateway.

use serde::{Deserialize, Serialize};

use crate::domain::valuation::ValuationSubmission;

/// Body of `POST /api/send-valuation`.
///
/// Every field defaults to empty so a missing field surfaces as a
/// validation error rather than an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendValuationRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub estimated_value: String,
}

impl From<SendValuationRequest> for ValuationSubmission {
    fn from(dto: SendValuationRequest) -> Self {
        ValuationSubmission {
            name: dto.name.trim().to_string(),
            email: dto.email.trim().to_string(),
            phone: dto.phone.trim().to_string(),
            address: dto.address.trim().to_string(),
            estimated_value: dto.estimated_value.trim().to_string(),
        }
    }
}

/// Success body: the email provider's message id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendValuationResponse {
    pub id: String,
}
