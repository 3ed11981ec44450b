//! The structured analysis returned by the Analysis Gateway.
//!
//! Only `estimated_value` is mandatory. Every descriptive part is optional so
//! the presenter can omit what the model did not supply. Once a section is
//! present, its list fields are guaranteed present (possibly empty) by
//! [`validate_analysis`](super::validate_analysis).

use serde::{Deserialize, Serialize};

use super::Confidence;

/// Lower and upper bound of the valuation.
///
/// Invariant: both bounds finite and positive, `lower <= upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEstimatedValue")]
pub struct EstimatedValue {
    lower: f64,
    upper: f64,
}

#[derive(Deserialize)]
struct RawEstimatedValue {
    lower: f64,
    upper: f64,
}

impl TryFrom<RawEstimatedValue> for EstimatedValue {
    type Error = String;

    fn try_from(raw: RawEstimatedValue) -> Result<Self, Self::Error> {
        EstimatedValue::new(raw.lower, raw.upper)
    }
}

impl EstimatedValue {
    /// Creates a range, returning the reason it is invalid otherwise.
    pub fn new(lower: f64, upper: f64) -> Result<Self, String> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err("estimatedValue bounds must be finite numbers".to_string());
        }
        if lower <= 0.0 || upper <= 0.0 {
            return Err("estimatedValue bounds must be positive and non-zero".to_string());
        }
        if lower > upper {
            return Err(format!(
                "estimatedValue.lower ({}) exceeds estimatedValue.upper ({})",
                lower, upper
            ));
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Point estimate shown as "estimated value".
    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }
}

/// Validated payload from the Analysis Gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AIAnalysis {
    pub estimated_value: EstimatedValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<PropertyDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_persona: Option<BuyerPersona>,
}

impl AIAnalysis {
    /// Analysis carrying only an estimate range.
    pub fn from_range(estimated_value: EstimatedValue) -> Self {
        Self {
            estimated_value,
            confidence: None,
            analysis: None,
            details: None,
            buyer_persona: None,
        }
    }
}

/// Descriptive context about the property's surroundings and market.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<EducationDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_activity: Option<MarketActivity>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amenities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schools: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketActivity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_sales: Option<RecentSales>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_changes: Option<String>,
}

/// Recent sales arrive either as prose or as a list of sale records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecentSales {
    Text(String),
    Records(Vec<SaleRecord>),
}

/// One comparable sale; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Who is likely to buy the property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerPersona {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub demographics: Vec<String>,
    #[serde(default)]
    pub motivations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimated_value_accepts_ordered_positive_bounds() {
        let value = EstimatedValue::new(250_000.0, 300_000.0).unwrap();
        assert_eq!(value.lower(), 250_000.0);
        assert_eq!(value.upper(), 300_000.0);
        assert_eq!(value.midpoint(), 275_000.0);
    }

    #[test]
    fn estimated_value_allows_equal_bounds() {
        let value = EstimatedValue::new(100.0, 100.0).unwrap();
        assert_eq!(value.midpoint(), 100.0);
    }

    #[test]
    fn estimated_value_rejects_zero_and_negative() {
        assert!(EstimatedValue::new(0.0, 10.0).is_err());
        assert!(EstimatedValue::new(10.0, 0.0).is_err());
        assert!(EstimatedValue::new(-5.0, 10.0).is_err());
    }

    #[test]
    fn estimated_value_rejects_inverted_range() {
        let err = EstimatedValue::new(300.0, 200.0).unwrap_err();
        assert!(err.contains("exceeds"));
    }

    #[test]
    fn estimated_value_rejects_non_finite() {
        assert!(EstimatedValue::new(f64::NAN, 10.0).is_err());
        assert!(EstimatedValue::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn estimated_value_deserialization_enforces_invariant() {
        let ok: Result<EstimatedValue, _> =
            serde_json::from_str(r#"{"lower": 10, "upper": 20}"#);
        assert!(ok.is_ok());

        let inverted: Result<EstimatedValue, _> =
            serde_json::from_str(r#"{"lower": 20, "upper": 10}"#);
        assert!(inverted.is_err());
    }

    #[test]
    fn recent_sales_serializes_both_shapes_untagged() {
        let text = RecentSales::Text("Stable".to_string());
        assert_eq!(serde_json::to_value(&text).unwrap(), serde_json::json!("Stable"));

        let records = RecentSales::Records(vec![SaleRecord {
            address: Some("1 Rd".to_string()),
            price: Some(300_000.0),
            date: None,
        }]);
        assert_eq!(
            serde_json::to_value(&records).unwrap(),
            serde_json::json!([{"address": "1 Rd", "price": 300000.0}])
        );
    }

    #[test]
    fn analysis_serializes_camel_case_and_skips_absent_parts() {
        let analysis = AIAnalysis::from_range(EstimatedValue::new(1.0, 2.0).unwrap());
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"estimatedValue": {"lower": 1.0, "upper": 2.0}})
        );
    }
}
