//! Pricing calculator and surcharge engine
//!
//! Pure functions mapping a service request plus catalog rates to a price
//! breakdown and duration bucket. Nothing here touches storage; rates are
//! passed in explicitly so pricing is deterministic and testable.
//!
//! Surcharge policy: surcharges apply in a fixed order (base cleaning, pet
//! hair, urine stains, accelerated drying) and every percentage surcharge is
//! computed against the original base cost. Nothing compounds on a prior
//! surcharge. The sum of applied percentages is capped at 100% of base;
//! exceeding the cap is a configuration fault and fails loudly instead of
//! clamping.

use fresco_core::{
    models::{
        CleaningOptions, DurationBucket, PriceBreakdown, ServiceDetails, ServiceRates,
        ServiceRequest, SurchargeKind, SurchargeLine,
    },
    AppError, AppResult,
};
use rust_decimal::Decimal;

use crate::constants::{MAX_RUG_DIMENSION_FT, MAX_UNIT_COUNT, SURCHARGE_CAP_PERCENT};

/// Compute the base cost for a service request
///
/// Dispatches on the service kind:
/// - couch: `base_price + cushions * cushion_rate + pillows * pillow_rate`
/// - rug: `width * length * area_rate`
/// - window: `window_count * window_rate`
///
/// # Errors
///
/// `InvalidParameter` when a required parameter is non-positive or outside
/// its sane range. Validation happens before any arithmetic.
pub fn compute_base_cost(rates: &ServiceRates, details: &ServiceDetails) -> AppResult<Decimal> {
    match details {
        ServiceDetails::Couch {
            cushion_count,
            pillow_count,
        } => {
            if *cushion_count == 0 && *pillow_count == 0 {
                return Err(AppError::InvalidParameter(
                    "couch cleaning requires at least one cushion or pillow".to_string(),
                ));
            }
            if *cushion_count > MAX_UNIT_COUNT || *pillow_count > MAX_UNIT_COUNT {
                return Err(AppError::InvalidParameter(format!(
                    "cushion/pillow count exceeds maximum of {}",
                    MAX_UNIT_COUNT
                )));
            }

            Ok(rates.base_price
                + Decimal::from(*cushion_count) * rates.cushion_rate
                + Decimal::from(*pillow_count) * rates.pillow_rate)
        }

        ServiceDetails::Rug { width, length } => {
            if *width <= Decimal::ZERO || *length <= Decimal::ZERO {
                return Err(AppError::InvalidParameter(
                    "rug width and length must be positive".to_string(),
                ));
            }
            if *width > MAX_RUG_DIMENSION_FT || *length > MAX_RUG_DIMENSION_FT {
                return Err(AppError::InvalidParameter(format!(
                    "rug dimensions exceed maximum of {} ft",
                    MAX_RUG_DIMENSION_FT
                )));
            }

            Ok(*width * *length * rates.area_rate)
        }

        ServiceDetails::Window { window_count } => {
            if *window_count == 0 {
                return Err(AppError::InvalidParameter(
                    "window count must be positive".to_string(),
                ));
            }
            if *window_count > MAX_UNIT_COUNT {
                return Err(AppError::InvalidParameter(format!(
                    "window count exceeds maximum of {}",
                    MAX_UNIT_COUNT
                )));
            }

            Ok(Decimal::from(*window_count) * rates.window_rate)
        }
    }
}

/// Apply surcharges to a base cost, in application order
///
/// Disabled options produce no line item. Returns the full breakdown with
/// the total rounded half-up to cents (the only rounding point).
///
/// # Errors
///
/// - `SurchargeLimitExceeded` when applied percentages sum over the cap
/// - `Validation` for negative catalog percentages or fees
pub fn apply_surcharges(
    base_cost: Decimal,
    options: &CleaningOptions,
    rates: &ServiceRates,
) -> AppResult<PriceBreakdown> {
    let percent_lines = [
        (
            SurchargeKind::BaseCleaning,
            options.base_cleaning,
            rates.base_surcharge_pct,
        ),
        (
            SurchargeKind::PetHair,
            options.pet_hair,
            rates.pet_hair_surcharge_pct,
        ),
        (
            SurchargeKind::UrineStains,
            options.urine_stains,
            rates.urine_stain_surcharge_pct,
        ),
    ];

    let mut applied_percent = Decimal::ZERO;
    let mut surcharges = Vec::new();

    for (kind, enabled, pct) in percent_lines {
        if !enabled {
            continue;
        }
        if pct < Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "negative surcharge percentage configured for {}",
                kind
            )));
        }

        applied_percent += pct;
        surcharges.push(SurchargeLine {
            kind,
            // against the original base, never a prior surcharge
            amount: base_cost * pct / Decimal::ONE_HUNDRED,
        });
    }

    if applied_percent > SURCHARGE_CAP_PERCENT {
        return Err(AppError::SurchargeLimitExceeded {
            applied: applied_percent.to_string(),
            cap: SURCHARGE_CAP_PERCENT.to_string(),
        });
    }

    if options.accelerated_drying {
        if rates.accelerated_drying_fee < Decimal::ZERO {
            return Err(AppError::Validation(
                "negative accelerated drying fee configured".to_string(),
            ));
        }

        surcharges.push(SurchargeLine {
            kind: SurchargeKind::AcceleratedDrying,
            amount: rates.accelerated_drying_fee,
        });
    }

    Ok(PriceBreakdown::new(base_cost, surcharges))
}

/// Price a service request end-to-end: base cost, surcharges, duration
pub fn price(
    rates: &ServiceRates,
    request: &ServiceRequest,
) -> AppResult<(PriceBreakdown, DurationBucket)> {
    let base_cost = compute_base_cost(rates, &request.details)?;
    let breakdown = apply_surcharges(base_cost, &request.options, rates)?;
    let duration = DurationBucket::from_total(breakdown.total)?;

    Ok((breakdown, duration))
}
