//! Fresco Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the Fresco order pricing & scheduling engine. It includes:
//!
//! - Domain models (ServiceRequest, PriceBreakdown, Timeslot, Order, etc.)
//! - Common traits for the catalog, order store, and cleaner registry
//! - Unified error handling with stable error codes
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
