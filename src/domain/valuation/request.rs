//! The request a user submits from the valuation form.

use serde::{Deserialize, Serialize};

use super::PropertyType;
use crate::domain::foundation::{require_non_empty, ValidationError};

/// Address plus property category, sent to the Analysis Gateway.
///
/// Construct through [`ValuationRequest::new`] to guarantee a non-empty
/// address. Deserialized values are re-checked with [`ValuationRequest::validate`]
/// before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationRequest {
    address: String,
    property_type: PropertyType,
}

impl ValuationRequest {
    /// Creates a request, trimming the address.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyField` if the address is blank.
    pub fn new(
        address: impl Into<String>,
        property_type: PropertyType,
    ) -> Result<Self, ValidationError> {
        let address = address.into().trim().to_string();
        let request = Self {
            address,
            property_type,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    /// Checks the address is non-empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("address", &self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_address() {
        let req = ValuationRequest::new("  10 Downing St  ", PropertyType::House).unwrap();
        assert_eq!(req.address(), "10 Downing St");
        assert_eq!(req.property_type(), PropertyType::House);
    }

    #[test]
    fn new_rejects_blank_address() {
        let err = ValuationRequest::new("   ", PropertyType::Land).unwrap_err();
        assert_eq!(err, ValidationError::empty_field("address"));
    }

    #[test]
    fn serializes_camel_case_body() {
        let req = ValuationRequest::new("1 High St", PropertyType::Apartment).unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"address": "1 High St", "propertyType": "apartment"})
        );
    }

    #[test]
    fn deserialized_empty_address_fails_validate() {
        let req: ValuationRequest =
            serde_json::from_str(r#"{"address":"","propertyType":"house"}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
