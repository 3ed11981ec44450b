//! Model confidence in an estimate, and how it is presented.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How sure the model is about its estimate. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Visual weight of a confidence notice. Ordered the same way as [`Confidence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Caution,
    Moderate,
    Strong,
}

impl Confidence {
    /// Parses a model-supplied value; anything unrecognised yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Confidence::Low),
            "medium" => Some(Confidence::Medium),
            "high" => Some(Confidence::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }

    /// Fixed sentence shown beneath the estimate.
    pub fn description(&self) -> &'static str {
        match self {
            Confidence::Low => {
                "Limited local data was available. Treat this figure as a rough guide and consider a professional valuation."
            }
            Confidence::Medium => {
                "This estimate is based on a reasonable amount of recent local market data."
            }
            Confidence::High => {
                "This estimate is backed by strong, recent comparable sales in the area."
            }
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Confidence::Low => Severity::Caution,
            Confidence::Medium => Severity::Moderate,
            Confidence::High => Severity::Strong,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
