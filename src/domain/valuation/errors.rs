//! Failure taxonomy for a single estimate request.

use thiserror::Error;

use crate::domain::foundation::ValidationError;

const GENERIC_GATEWAY_MESSAGE: &str = "Unable to get a valuation right now. Please try again.";
const MALFORMED_MESSAGE: &str =
    "We couldn't generate a valuation for this property. Please try again later.";

/// Why an estimate request did not produce an analysis.
///
/// Every variant is terminal for the request it came from; none are retried
/// automatically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    /// Input was rejected before any network call.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Transport failure or a gateway-reported error.
    #[error("gateway error: {message}")]
    Gateway { message: String },

    /// Gateway answered 2xx but the payload lacks required fields.
    #[error("Invalid response format from analysis")]
    MalformedResponse { detail: String },
}

impl EstimateError {
    pub fn gateway(message: impl Into<String>) -> Self {
        EstimateError::Gateway {
            message: message.into(),
        }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        EstimateError::MalformedResponse {
            detail: detail.into(),
        }
    }

    /// Notice text shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            EstimateError::Validation(err) if err.field() == "address" => {
                "Please enter a property address.".to_string()
            }
            EstimateError::Validation(err) => format!("Please check the {} field.", err.field()),
            EstimateError::Gateway { message } if !message.trim().is_empty() => message.clone(),
            EstimateError::Gateway { .. } => GENERIC_GATEWAY_MESSAGE.to_string(),
            EstimateError::MalformedResponse { .. } => MALFORMED_MESSAGE.to_string(),
        }
    }

    /// Whether resubmitting the same input may succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, EstimateError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_displays_fixed_message() {
        let err = EstimateError::malformed("estimatedValue missing");
        assert_eq!(err.to_string(), "Invalid response format from analysis");
    }

    #[test]
    fn gateway_user_message_prefers_provider_message() {
        let err = EstimateError::gateway("Model quota exceeded");
        assert_eq!(err.user_message(), "Model quota exceeded");
    }

    #[test]
    fn gateway_user_message_falls_back_when_blank() {
        let err = EstimateError::gateway("  ");
        assert_eq!(err.user_message(), GENERIC_GATEWAY_MESSAGE);
    }

    #[test]
    fn address_validation_prompts_for_address() {
        let err = EstimateError::from(ValidationError::empty_field("address"));
        assert_eq!(err.user_message(), "Please enter a property address.");
        assert!(!err.is_retryable());
    }

    #[test]
    fn malformed_is_generic_and_retryable() {
        let err = EstimateError::malformed("bad");
        assert!(err.user_message().contains("try again later"));
        assert!(err.is_retryable());
    }
}
