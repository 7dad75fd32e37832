//! Business logic services for Fresco
//!
//! This crate contains the order pricing & scheduling engine that the REST
//! layer drives: pricing and surcharges, duration mapping, availability
//! checking, and the booking orchestrator.
//!
//! # Architecture
//!
//! Services are designed to be composable and testable:
//! - Pricing and availability checks are pure functions over explicit
//!   inputs; no ambient rate state
//! - Each service owns its dependencies (repositories, cache, pool)
//! - Services are wrapped in Arc for safe sharing across async tasks
//! - All async operations are instrumented with tracing
//! - Comprehensive error handling with AppError
//!
//! # Services
//!
//! - `CatalogService` - Pricing-rate lookup with Redis caching
//! - `pricing` - Base-cost calculator and surcharge engine
//! - `Scheduler` - Slot generation, conflict detection, slot validation
//! - `BookingService` - Quotes, serialized booking, order lifecycle

pub mod booking;
pub mod catalog;
pub mod pricing;
pub mod scheduling;

pub use booking::{BookingService, Quote};
pub use catalog::CatalogService;
pub use scheduling::Scheduler;

/// Business logic constants
pub mod constants {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// Cap on the sum of applied percentage surcharges, percent of base cost
    pub const SURCHARGE_CAP_PERCENT: Decimal = dec!(100);

    /// Upper sanity bound for cushion/pillow/window counts
    pub const MAX_UNIT_COUNT: u32 = 200;

    /// Upper sanity bound for rug dimensions in feet
    pub const MAX_RUG_DIMENSION_FT: Decimal = dec!(100);

    /// Catalog rates cache TTL in seconds (1 hour)
    pub const RATES_CACHE_TTL: u64 = 3600;

    /// Advisory-lock class for per-date booking locks
    pub const BOOKING_LOCK_CLASS: i64 = 0x4652;

    /// Attempts for a compare-and-set status update before giving up
    pub const STATUS_UPDATE_MAX_ATTEMPTS: u32 = 3;
}
