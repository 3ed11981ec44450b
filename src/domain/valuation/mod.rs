//! Valuation domain: the request, the analysis the model returns, and the
//! rules that decide whether an analysis can be shown.

mod analysis;
mod confidence;
mod contact;
mod currency;
mod errors;
mod property_type;
mod request;
mod validation;

pub use analysis::{
    AIAnalysis, BuyerPersona, EducationDetails, EstimatedValue, LocationDetails, MarketActivity,
    PropertyDetails, RecentSales, SaleRecord, TransportDetails,
};
pub use confidence::{Confidence, Severity};
pub use contact::{ContactField, ValuationFormData, ValuationSubmission};
pub use currency::{format_currency, format_range};
pub use errors::EstimateError;
pub use property_type::PropertyType;
pub use request::ValuationRequest;
pub use validation::validate_analysis;
