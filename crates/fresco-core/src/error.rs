//! Unified error handling for Fresco
//!
//! This module provides a comprehensive error type that covers all possible
//! failure scenarios in the pricing and scheduling engine, with stable error
//! codes for the calling layer.

use thiserror::Error;

/// Main application error type
///
/// All errors in the engine should be converted to this type. The REST layer
/// consuming this workspace maps `error_code()` to wire responses.
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Database Errors ====================
    #[error("Database error: {0}")]
    Database(String),

    #[error("Database pool error: {0}")]
    Pool(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    // ==================== Cache Errors ====================
    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Cache connection failed: {0}")]
    CacheConnection(String),

    // ==================== Pricing Errors ====================
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown service type: {0}")]
    UnknownServiceType(String),

    #[error("Surcharge limit exceeded: {applied}% applied, cap is {cap}% of base cost")]
    SurchargeLimitExceeded { applied: String, cap: String },

    #[error("Price {total} is below the bookable minimum of {minimum}")]
    PriceBelowMinimum { total: String, minimum: String },

    // ==================== Scheduling Errors ====================
    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    // ==================== Order Lifecycle Errors ====================
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Order not assignable in status: {0}")]
    OrderNotAssignable(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    // ==================== Resource Errors ====================
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    #[error("Cleaner not found: {0}")]
    CleanerNotFound(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // ==================== Validation Errors ====================
    #[error("Validation error: {0}")]
    Validation(String),

    // ==================== Internal Errors ====================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns the stable error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database_error",
            AppError::Pool(_) => "pool_error",
            AppError::Transaction(_) => "transaction_error",
            AppError::Cache(_) => "cache_error",
            AppError::CacheConnection(_) => "cache_connection_error",
            AppError::InvalidParameter(_) => "invalid_parameter",
            AppError::UnknownServiceType(_) => "unknown_service_type",
            AppError::SurchargeLimitExceeded { .. } => "surcharge_limit_exceeded",
            AppError::PriceBelowMinimum { .. } => "price_below_minimum",
            AppError::SlotUnavailable(_) => "slot_unavailable",
            AppError::InvalidStatusTransition { .. } => "invalid_status_transition",
            AppError::OrderNotAssignable(_) => "order_not_assignable",
            AppError::OrderNotFound(_) => "order_not_found",
            AppError::ServiceNotFound(_) => "service_not_found",
            AppError::CleanerNotFound(_) => "cleaner_not_found",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation_error",
            AppError::Internal(_) => "internal_error",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }

    /// Whether this error is a client-side validation/business-rule failure
    /// (as opposed to an infrastructure fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidParameter(_)
                | AppError::UnknownServiceType(_)
                | AppError::SurchargeLimitExceeded { .. }
                | AppError::PriceBelowMinimum { .. }
                | AppError::SlotUnavailable(_)
                | AppError::InvalidStatusTransition { .. }
                | AppError::OrderNotAssignable(_)
                | AppError::Validation(_)
        )
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
