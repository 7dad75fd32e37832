//! Service request model
//!
//! A service request captures what a client wants cleaned: the kind of
//! service, its kind-specific parameters, and optional add-ons. Requests are
//! immutable value objects; pricing never mutates them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported service kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Couch,
    Rug,
    Window,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKind::Couch => write!(f, "couch"),
            ServiceKind::Rug => write!(f, "rug"),
            ServiceKind::Window => write!(f, "window"),
        }
    }
}

impl ServiceKind {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "couch" => Some(ServiceKind::Couch),
            "rug" => Some(ServiceKind::Rug),
            "window" => Some(ServiceKind::Window),
            _ => None,
        }
    }
}

/// Kind-specific service parameters
///
/// Each service kind carries exactly the numeric parameters its pricing
/// formula needs, so an impossible combination (a rug with a cushion count)
/// cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServiceDetails {
    Couch {
        cushion_count: u32,
        pillow_count: u32,
    },
    Rug {
        /// Width in feet
        width: Decimal,
        /// Length in feet
        length: Decimal,
    },
    Window {
        window_count: u32,
    },
}

impl ServiceDetails {
    /// The service kind these parameters belong to
    pub fn kind(&self) -> ServiceKind {
        match self {
            ServiceDetails::Couch { .. } => ServiceKind::Couch,
            ServiceDetails::Rug { .. } => ServiceKind::Rug,
            ServiceDetails::Window { .. } => ServiceKind::Window,
        }
    }
}

/// Optional cleaning add-ons
///
/// Each flag triggers one surcharge line when set. Disabled flags produce no
/// line item at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningOptions {
    #[serde(default)]
    pub base_cleaning: bool,

    #[serde(default)]
    pub pet_hair: bool,

    #[serde(default)]
    pub urine_stains: bool,

    #[serde(default)]
    pub accelerated_drying: bool,
}

/// Immutable client request for one service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub details: ServiceDetails,

    #[serde(default)]
    pub options: CleaningOptions,
}

impl ServiceRequest {
    pub fn new(details: ServiceDetails, options: CleaningOptions) -> Self {
        Self { details, options }
    }

    pub fn kind(&self) -> ServiceKind {
        self.details.kind()
    }
}
