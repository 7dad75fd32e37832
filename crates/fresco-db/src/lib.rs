//! Fresco Database Layer
//!
//! This crate provides PostgreSQL database access and repository
//! implementations for the Fresco engine. It includes:
//!
//! - Connection pool management with sqlx
//! - Pricing catalog, order store, and cleaner registry repositories
//! - Transaction support for atomic booking operations

pub mod pool;
pub mod repositories;

pub use pool::create_pool;
pub use repositories::*;

// Re-export commonly used types
pub use fresco_core::{AppError, AppResult};
pub use sqlx::{PgPool, Postgres, Transaction};
