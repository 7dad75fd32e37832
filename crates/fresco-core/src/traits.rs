//! Common traits for repositories and services
//!
//! Defines abstractions for data access consumed by the engine. The
//! catalog, order store, and cleaner registry are external collaborators;
//! only their in-process contracts live here.

use crate::error::AppError;
use crate::models::{Cleaner, Order, OrderStatus, ServiceKind, ServiceRates};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// Find entity by ID
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, AppError>;

    /// Find all entities with pagination
    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<T>, AppError>;

    /// Count total entities
    async fn count(&self) -> Result<i64, AppError>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<T, AppError>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> Result<T, AppError>;

    /// Delete entity by ID
    async fn delete(&self, id: ID) -> Result<bool, AppError>;
}

/// Read-only pricing catalog lookup
///
/// Rates are configuration data; the engine never writes them.
#[async_trait]
pub trait PricingCatalog: Send + Sync {
    /// Rates for a service kind, `None` for unknown or unpublished entries
    async fn get_rates(&self, kind: ServiceKind) -> Result<Option<ServiceRates>, AppError>;

    /// All published catalog entries
    async fn list_published(&self) -> Result<Vec<ServiceRates>, AppError>;
}

/// Order store with specialized methods
#[async_trait]
pub trait OrderRepository: Repository<Order, Uuid> {
    /// All orders scheduled on a date, ordered by start time
    async fn list_for_date(&self, date: NaiveDate) -> Result<Vec<Order>, AppError>;

    /// Orders on a date whose status blocks the calendar
    /// (pending_confirmation or confirmed)
    async fn list_blocking_for_date(&self, date: NaiveDate) -> Result<Vec<Order>, AppError>;

    /// Atomically move an order from `expected` to `next`
    ///
    /// Returns `false` when the row was not in `expected` anymore (lost
    /// race) or does not exist; the caller re-reads and decides.
    async fn compare_and_set_status(
        &self,
        id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<bool, AppError>;

    /// Assign a cleaner while the order is still assignable
    ///
    /// Fails with `OrderNotFound` for a missing order and
    /// `OrderNotAssignable` when the status forbids assignment.
    async fn assign_cleaner(&self, id: Uuid, cleaner_id: Uuid) -> Result<Order, AppError>;
}

/// Cleaner registry, used only to validate assignment targets
#[async_trait]
pub trait CleanerRepository: Send + Sync {
    /// Find cleaner by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Cleaner>, AppError>;
}

/// Cache service trait
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Get value from cache
    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError>;

    /// Set value in cache with TTL
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> Result<(), AppError>;

    /// Delete value from cache
    async fn delete(&self, key: &str) -> Result<bool, AppError>;

    /// Check if key exists
    async fn exists(&self, key: &str) -> Result<bool, AppError>;
}
