//! Property categories accepted by the valuation form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Kind of property being valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    House,
    Apartment,
    Land,
    Commercial,
}

impl PropertyType {
    /// All variants, in form display order.
    pub const ALL: [PropertyType; 4] = [
        PropertyType::House,
        PropertyType::Apartment,
        PropertyType::Land,
        PropertyType::Commercial,
    ];

    /// Wire value (`house`, `apartment`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Apartment => "apartment",
            PropertyType::Land => "land",
            PropertyType::Commercial => "commercial",
        }
    }

    /// Phrase used when describing the property to the model.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            PropertyType::House => "residential house",
            PropertyType::Apartment => "apartment / flat",
            PropertyType::Land => "plot of land",
            PropertyType::Commercial => "commercial property",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "house" => Ok(PropertyType::House),
            "apartment" => Ok(PropertyType::Apartment),
            "land" => Ok(PropertyType::Land),
            "commercial" => Ok(PropertyType::Commercial),
            other => Err(ValidationError::invalid_format(
                "propertyType",
                format!("unknown property type '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&PropertyType::Commercial).unwrap();
        assert_eq!(json, "\"commercial\"");
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Apartment".parse::<PropertyType>().unwrap(), PropertyType::Apartment);
        assert_eq!(" land ".parse::<PropertyType>().unwrap(), PropertyType::Land);
    }

    #[test]
    fn rejects_unknown_type() {
        let err = "castle".parse::<PropertyType>().unwrap_err();
        assert_eq!(err.field(), "propertyType");
    }

    #[test]
    fn display_matches_wire_value() {
        for property_type in PropertyType::ALL {
            let json = serde_json::to_string(&property_type).unwrap();
            assert_eq!(json, format!("\"{}\"", property_type));
        }
    }
}
