//! Contact details captured for a sales follow-up.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{require_non_empty, ValidationError};

/// Fields on the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Address,
}

impl ContactField {
    pub const ALL: [ContactField; 4] = [
        ContactField::Name,
        ContactField::Email,
        ContactField::Phone,
        ContactField::Address,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::Address => "address",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contact form contents. Every field is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationFormData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl ValuationFormData {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            address: address.into(),
        }
    }

    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::Address => &self.address,
        }
    }

    pub fn set(&mut self, field: ContactField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ContactField::Name => self.name = value,
            ContactField::Email => self.email = value,
            ContactField::Phone => self.phone = value,
            ContactField::Address => self.address = value,
        }
    }

    /// Checks all fields, reporting the first problem in form order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for field in ContactField::ALL {
            require_non_empty(field.as_str(), self.get(field))?;
        }
        if !self.email.contains('@') {
            return Err(ValidationError::invalid_format("email", "missing @ symbol"));
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        ContactField::ALL
            .iter()
            .all(|field| self.get(*field).is_empty())
    }
}

/// Body posted to the Notification Gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Currency-formatted estimate, e.g. `£275,000`.
    pub estimated_value: String,
}

impl ValuationSubmission {
    /// Pairs validated form data with the displayed estimate, trimming fields.
    pub fn new(
        form: &ValuationFormData,
        estimated_value: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        form.validate()?;
        let submission = Self {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            address: form.address.trim().to_string(),
            estimated_value: estimated_value.into(),
        };
        submission.validate()?;
        Ok(submission)
    }

    /// Re-checks a submission received over the wire.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("email", &self.email)?;
        require_non_empty("phone", &self.phone)?;
        require_non_empty("address", &self.address)?;
        require_non_empty("estimatedValue", &self.estimated_value)?;
        if !self.email.contains('@') {
            return Err(ValidationError::invalid_format("email", "missing @ symbol"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ValuationFormData {
        ValuationFormData::new("Ada", "ada@example.com", "07700 900000", "1 High St")
    }

    #[test]
    fn filled_form_validates() {
        assert!(filled().validate().is_ok());
    }

    #[test]
    fn reports_first_missing_field() {
        let mut form = filled();
        form.set(ContactField::Phone, "");
        form.set(ContactField::Address, "");
        assert_eq!(
            form.validate().unwrap_err(),
            ValidationError::empty_field("phone")
        );
    }

    #[test]
    fn rejects_email_without_at() {
        let mut form = filled();
        form.set(ContactField::Email, "ada.example.com");
        assert_eq!(form.validate().unwrap_err().field(), "email");
    }

    #[test]
    fn submission_trims_and_serializes_camel_case() {
        let mut form = filled();
        form.set(ContactField::Name, "  Ada  ");
        let submission = ValuationSubmission::new(&form, "£275,000").unwrap();
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["estimatedValue"], "£275,000");
    }

    #[test]
    fn submission_requires_estimate() {
        assert!(ValuationSubmission::new(&filled(), "").is_err());
    }

    #[test]
    fn default_form_is_empty() {
        assert!(ValuationFormData::default().is_empty());
        assert!(!filled().is_empty());
    }
}
