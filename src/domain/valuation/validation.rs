//! Shape validation for Analysis Gateway payloads.
//!
//! Both the gateway (before answering) and the client (before displaying) run
//! the same check, so the dual-shape `recentSales` field is resolved into
//! [`RecentSales`] exactly once.

use serde_json::{Map, Value};

use super::{
    AIAnalysis, BuyerPersona, Confidence, EducationDetails, EstimateError, EstimatedValue,
    LocationDetails, MarketActivity, PropertyDetails, RecentSales, SaleRecord, TransportDetails,
};

/// Validates a raw payload and converts it into an [`AIAnalysis`].
///
/// # Errors
///
/// Returns `EstimateError::MalformedResponse` when the payload is not an
/// object, `estimatedValue.lower`/`upper` are missing, zero, non-numeric or
/// inverted, or a present details section lacks its list field.
pub fn validate_analysis(payload: &Value) -> Result<AIAnalysis, EstimateError> {
    let root = payload
        .as_object()
        .ok_or_else(|| EstimateError::malformed("payload is not a JSON object"))?;

    let estimated_value = parse_estimated_value(root)?;

    let confidence = root
        .get("confidence")
        .and_then(Value::as_str)
        .and_then(Confidence::parse);

    let analysis = non_empty_str(root.get("analysis"));

    let details = match root.get("details") {
        Some(Value::Object(details)) => Some(parse_details(details)?),
        Some(Value::Null) | None => None,
        Some(_) => return Err(EstimateError::malformed("details is not an object")),
    };

    let buyer_persona = match root.get("buyerPersona") {
        Some(Value::Object(persona)) => Some(parse_buyer_persona(persona)),
        Some(Value::String(summary)) if !summary.trim().is_empty() => Some(BuyerPersona {
            summary: Some(summary.clone()),
            ..Default::default()
        }),
        _ => None,
    };

    Ok(AIAnalysis {
        estimated_value,
        confidence,
        analysis,
        details,
        buyer_persona,
    })
}

fn parse_estimated_value(root: &Map<String, Value>) -> Result<EstimatedValue, EstimateError> {
    let range = root
        .get("estimatedValue")
        .and_then(Value::as_object)
        .ok_or_else(|| EstimateError::malformed("estimatedValue missing"))?;

    let lower = bound(range, "lower")?;
    let upper = bound(range, "upper")?;

    EstimatedValue::new(lower, upper).map_err(EstimateError::malformed)
}

fn bound(range: &Map<String, Value>, key: &str) -> Result<f64, EstimateError> {
    let value = range
        .get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| EstimateError::malformed(format!("estimatedValue.{} missing", key)))?;
    if value == 0.0 {
        return Err(EstimateError::malformed(format!(
            "estimatedValue.{} is zero",
            key
        )));
    }
    Ok(value)
}

fn parse_details(details: &Map<String, Value>) -> Result<PropertyDetails, EstimateError> {
    let location = match section(details, "location")? {
        Some(section) => Some(LocationDetails {
            description: non_empty_str(section.get("description")),
            amenities: string_list(section, "location", "amenities")?,
        }),
        None => None,
    };

    let education = match section(details, "education")? {
        Some(section) => Some(EducationDetails {
            description: non_empty_str(section.get("description")),
            schools: string_list(section, "education", "schools")?,
        }),
        None => None,
    };

    let transport = match section(details, "transport")? {
        Some(section) => Some(TransportDetails {
            description: non_empty_str(section.get("description")),
            links: string_list(section, "transport", "links")?,
        }),
        None => None,
    };

    let market_activity = section(details, "marketActivity")?.map(|section| MarketActivity {
        recent_sales: parse_recent_sales(section.get("recentSales")),
        price_changes: non_empty_str(section.get("priceChanges")),
    });

    Ok(PropertyDetails {
        location,
        education,
        transport,
        market_activity,
    })
}

fn section<'a>(
    details: &'a Map<String, Value>,
    name: &str,
) -> Result<Option<&'a Map<String, Value>>, EstimateError> {
    match details.get(name) {
        Some(Value::Object(section)) => Ok(Some(section)),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err(EstimateError::malformed(format!(
            "details.{} is not an object",
            name
        ))),
    }
}

/// A present section must carry its list, even if empty.
fn string_list(
    section: &Map<String, Value>,
    section_name: &str,
    key: &str,
) -> Result<Vec<String>, EstimateError> {
    let items = section
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            EstimateError::malformed(format!("details.{}.{} missing", section_name, key))
        })?;

    Ok(items.iter().filter_map(list_item_text).collect())
}

fn parse_recent_sales(value: Option<&Value>) -> Option<RecentSales> {
    match value? {
        Value::String(text) if !text.trim().is_empty() => Some(RecentSales::Text(text.clone())),
        Value::Array(items) => Some(RecentSales::Records(
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|record| SaleRecord {
                    address: non_empty_str(record.get("address")),
                    price: record.get("price").and_then(Value::as_f64),
                    date: non_empty_str(record.get("date")),
                })
                .collect(),
        )),
        _ => None,
    }
}

fn parse_buyer_persona(persona: &Map<String, Value>) -> BuyerPersona {
    let list = |key: &str| -> Vec<String> {
        persona
            .get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(list_item_text).collect())
            .unwrap_or_default()
    };

    BuyerPersona {
        summary: non_empty_str(persona.get("summary")),
        demographics: list("demographics"),
        motivations: list("motivations"),
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Models sometimes return `{name: ..}` objects instead of plain strings.
fn list_item_text(item: &Value) -> Option<String> {
    match item {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(obj) => non_empty_str(obj.get("name")),
        _ => None,
    }
}
