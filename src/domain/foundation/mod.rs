//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, and the field-level validation error
//! shared by every valuation value object.

mod errors;
mod ids;
mod timestamp;

pub use errors::{require_non_empty, ValidationError};
pub use ids::RequestId;
pub use timestamp::Timestamp;
