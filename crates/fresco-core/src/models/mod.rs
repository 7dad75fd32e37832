//! Domain models for Fresco
//!
//! This module contains all the core domain models used throughout the
//! pricing and scheduling engine.

pub mod cleaner;
pub mod order;
pub mod pricing;
pub mod service;
pub mod timeslot;

pub use cleaner::Cleaner;
pub use order::{Order, OrderStatus};
pub use pricing::{
    DurationBucket, PriceBreakdown, ServiceRates, SurchargeKind, SurchargeLine,
    MIN_BOOKABLE_TOTAL,
};
pub use service::{CleaningOptions, ServiceDetails, ServiceKind, ServiceRequest};
pub use timeslot::{Timeslot, WorkingHours};
