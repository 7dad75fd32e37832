//! Pricing models
//!
//! Catalog rates, price breakdowns, and the price-to-duration mapping.
//! All monetary amounts are `Decimal`; the final total is the only rounded
//! figure so rounding error never compounds across surcharge lines.

use crate::error::AppError;
use crate::models::service::ServiceKind;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest total price that maps to a duration bucket
pub const MIN_BOOKABLE_TOTAL: Decimal = Decimal::from_parts(120, 0, 0, false, 0);

/// Pricing catalog entry for one service kind
///
/// Rates are configuration data owned by the pricing catalog, never
/// hardcoded in the calculator. Unpublished entries are invisible to
/// clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRates {
    /// Service kind this entry prices
    pub kind: ServiceKind,

    /// Human-readable service name
    pub name: String,

    /// Flat base price (couch)
    pub base_price: Decimal,

    /// Price per cushion (couch)
    pub cushion_rate: Decimal,

    /// Price per pillow (couch)
    pub pillow_rate: Decimal,

    /// Price per square foot (rug)
    pub area_rate: Decimal,

    /// Price per window (window)
    pub window_rate: Decimal,

    /// Base cleaning surcharge, percent of base cost
    pub base_surcharge_pct: Decimal,

    /// Pet hair surcharge, percent of base cost
    pub pet_hair_surcharge_pct: Decimal,

    /// Urine stain surcharge, percent of base cost
    pub urine_stain_surcharge_pct: Decimal,

    /// Accelerated drying surcharge, flat amount
    pub accelerated_drying_fee: Decimal,

    /// Whether this entry is visible/bookable
    pub is_published: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for ServiceRates {
    fn default() -> Self {
        Self {
            kind: ServiceKind::Couch,
            name: String::new(),
            base_price: Decimal::ZERO,
            cushion_rate: Decimal::ZERO,
            pillow_rate: Decimal::ZERO,
            area_rate: Decimal::ZERO,
            window_rate: Decimal::ZERO,
            base_surcharge_pct: Decimal::from(38),
            pet_hair_surcharge_pct: Decimal::from(15),
            urine_stain_surcharge_pct: Decimal::from(5),
            accelerated_drying_fee: Decimal::from(45),
            is_published: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// Surcharge identity, in application order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurchargeKind {
    BaseCleaning,
    PetHair,
    UrineStains,
    AcceleratedDrying,
}

impl fmt::Display for SurchargeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurchargeKind::BaseCleaning => write!(f, "base_cleaning"),
            SurchargeKind::PetHair => write!(f, "pet_hair"),
            SurchargeKind::UrineStains => write!(f, "urine_stains"),
            SurchargeKind::AcceleratedDrying => write!(f, "accelerated_drying"),
        }
    }
}

/// One applied surcharge line
///
/// The amount keeps full precision; rounding happens once, at the breakdown
/// total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurchargeLine {
    pub kind: SurchargeKind,
    pub amount: Decimal,
}

/// Computed price for one service request
///
/// Invariant: `total == round_half_up(base_cost + sum(surcharges), 2)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base_cost: Decimal,
    pub surcharges: Vec<SurchargeLine>,
    pub total: Decimal,
}

impl PriceBreakdown {
    /// Build a breakdown from a base cost and applied surcharge lines,
    /// rounding half-up to cents at the total only
    pub fn new(base_cost: Decimal, surcharges: Vec<SurchargeLine>) -> Self {
        let raw: Decimal = base_cost + surcharges.iter().map(|s| s.amount).sum::<Decimal>();
        let total = raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        Self {
            base_cost,
            surcharges,
            total,
        }
    }

    /// Sum of all surcharge amounts, unrounded
    pub fn surcharge_total(&self) -> Decimal {
        self.surcharges.iter().map(|s| s.amount).sum()
    }
}

/// Service duration derived from the total price
///
/// Derived, never stored: orders persist concrete minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationBucket {
    TwoHours,
    ThreeHours,
    FourHours,
    FiveHours,
    SixHours,
}

impl DurationBucket {
    /// Map a total price to its duration bucket
    ///
    /// Bands are half-open: [120,200) -> 2h, [200,300) -> 3h, [300,400) -> 4h,
    /// [400,500) -> 5h, [500,inf) -> 6h. Totals below 120 have no bucket.
    pub fn from_total(total: Decimal) -> Result<Self, AppError> {
        if total < MIN_BOOKABLE_TOTAL {
            return Err(AppError::PriceBelowMinimum {
                total: total.to_string(),
                minimum: MIN_BOOKABLE_TOTAL.to_string(),
            });
        }

        let bucket = if total < Decimal::from(200) {
            DurationBucket::TwoHours
        } else if total < Decimal::from(300) {
            DurationBucket::ThreeHours
        } else if total < Decimal::from(400) {
            DurationBucket::FourHours
        } else if total < Decimal::from(500) {
            DurationBucket::FiveHours
        } else {
            DurationBucket::SixHours
        };

        Ok(bucket)
    }

    /// Duration in whole hours
    pub fn hours(&self) -> i64 {
        match self {
            DurationBucket::TwoHours => 2,
            DurationBucket::ThreeHours => 3,
            DurationBucket::FourHours => 4,
            DurationBucket::FiveHours => 5,
            DurationBucket::SixHours => 6,
        }
    }

    /// Duration in minutes
    pub fn minutes(&self) -> i32 {
        (self.hours() * 60) as i32
    }
}
