//! Booking orchestrator
//!
//! Composes pricing, duration mapping, and availability into quotes and
//! bookings, and drives the order lifecycle:
//! - Quote: pure computation, no persistence, repeatable
//! - Book: serialized check-then-insert per date with bounded retries
//! - Status transitions and cleaner assignment with atomic guards
//!
//! Booking serializes on a per-date Postgres advisory lock, not an
//! in-process lock: multiple server processes may book concurrently against
//! the same store.

use fresco_core::{
    config::BookingConfig,
    models::{DurationBucket, Order, OrderStatus, PriceBreakdown, ServiceRequest, Timeslot},
    traits::{CleanerRepository, OrderRepository, PricingCatalog},
    AppError, AppResult,
};
use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::catalog::CatalogService;
use crate::constants::{BOOKING_LOCK_CLASS, STATUS_UPDATE_MAX_ATTEMPTS};
use crate::pricing;
use crate::scheduling::Scheduler;

/// Priced quote for a candidate booking. Carries no identity and is never
/// persisted.
#[derive(Debug, Clone)]
pub struct Quote {
    pub breakdown: PriceBreakdown,
    pub duration: DurationBucket,
    pub slot: Timeslot,
}

/// Booking orchestrator
///
/// Owns the booking transaction; everything else goes through the
/// repository traits.
pub struct BookingService<C, O, L>
where
    C: PricingCatalog,
    O: OrderRepository,
    L: CleanerRepository,
{
    catalog: Arc<CatalogService<C>>,
    orders: Arc<O>,
    cleaners: Arc<L>,
    scheduler: Scheduler,
    pool: Arc<PgPool>,
    config: BookingConfig,
}

impl<C, O, L> BookingService<C, O, L>
where
    C: PricingCatalog,
    O: OrderRepository,
    L: CleanerRepository,
{
    /// Create a new booking service
    pub fn new(
        catalog: Arc<CatalogService<C>>,
        orders: Arc<O>,
        cleaners: Arc<L>,
        scheduler: Scheduler,
        pool: Arc<PgPool>,
        config: BookingConfig,
    ) -> Self {
        Self {
            catalog,
            orders,
            cleaners,
            scheduler,
            pool,
            config,
        }
    }

    /// Advisory lock key for one calendar date
    ///
    /// The class constant namespaces booking locks away from any other
    /// advisory-lock user of the same database.
    fn lock_key(date: NaiveDate) -> i64 {
        (BOOKING_LOCK_CLASS << 32) | i64::from(date.num_days_from_ce() as u32)
    }

    /// Price a request for a candidate slot without persisting anything
    ///
    /// May be called repeatedly; two quotes for the same input are
    /// identical as long as the catalog does not change.
    #[instrument(skip(self, request))]
    pub async fn quote(
        &self,
        request: &ServiceRequest,
        date: NaiveDate,
        start: NaiveTime,
    ) -> AppResult<Quote> {
        let today = Utc::now().date_naive();

        // Reject bad dates and start times before touching the catalog
        self.scheduler.validate_start(date, start, today)?;

        let rates = self.catalog.require_rates(request.kind()).await?;
        let (breakdown, duration) = pricing::price(&rates, request)?;

        let slot = Timeslot::from_bucket(date, start, duration);
        self.scheduler.validate_timeslot(&slot, today)?;

        debug!(
            "Quoted {} for {} at {}: total {}, {}h",
            request.kind(),
            date,
            start,
            breakdown.total,
            duration.hours()
        );

        Ok(Quote {
            breakdown,
            duration,
            slot,
        })
    }

    /// All free slots of a given duration on a date
    #[instrument(skip(self))]
    pub async fn available_slots(
        &self,
        date: NaiveDate,
        duration: DurationBucket,
    ) -> AppResult<Vec<Timeslot>> {
        let existing = self.orders.list_blocking_for_date(date).await?;
        Ok(self
            .scheduler
            .find_available_slots(date, duration.minutes(), &existing))
    }

    /// Book a slot: validate, price, and run the serialized
    /// check-then-insert
    ///
    /// # Errors
    ///
    /// `SlotUnavailable` when the slot conflicts with a blocking order at
    /// commit time, even if an earlier quote or availability call showed it
    /// free. Transient transaction failures are retried a bounded number of
    /// times and then surface as `SlotUnavailable` as well.
    #[instrument(skip(self, request, notes))]
    pub async fn book(
        &self,
        request: &ServiceRequest,
        date: NaiveDate,
        start: NaiveTime,
        notes: Option<String>,
    ) -> AppResult<Order> {
        let quote = self.quote(request, date, start).await?;
        let order = Order::new(request.clone(), quote.breakdown, quote.slot, notes);

        info!(
            "Booking order {} on {} at {} for {}",
            order.id, date, start, order.price.total
        );

        let mut attempt = 1;
        loop {
            match self.try_book(&order).await {
                Ok(()) => {
                    info!("Booked order {} on attempt {}", order.id, attempt);
                    return Ok(order);
                }
                Err(AppError::Transaction(reason)) if attempt < self.config.max_attempts => {
                    warn!(
                        "Booking attempt {} for order {} failed transiently: {}",
                        attempt, order.id, reason
                    );
                    attempt += 1;
                    tokio::time::sleep(Duration::from_millis(self.config.retry_backoff_ms)).await;
                }
                Err(AppError::Transaction(reason)) => {
                    warn!(
                        "Booking order {} gave up after {} attempts: {}",
                        order.id, attempt, reason
                    );
                    return Err(AppError::SlotUnavailable(format!(
                        "{} {} could not be booked, please retry",
                        date, start
                    )));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One booking attempt: lock the date, re-scan for conflicts, insert
    async fn try_book(&self, order: &Order) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to start booking transaction: {}", e);
            AppError::Transaction(format!("Failed to start transaction: {}", e))
        })?;

        // Bounded wait: a stuck holder turns into a transient failure, the
        // booking path never blocks indefinitely.
        sqlx::query(&format!(
            "SET LOCAL lock_timeout = '{}ms'",
            self.config.lock_timeout_ms
        ))
        .execute(&mut *tx)
        .await
        .map_err(|e| map_tx_error(e, "Failed to set lock timeout"))?;

        // Serialize the check-then-insert per date across all processes
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(Self::lock_key(order.slot.date))
            .execute(&mut *tx)
            .await
            .map_err(|e| map_tx_error(e, "Failed to take booking lock"))?;

        // Conflict scan inside the lock: only pending/confirmed orders block
        let existing = sqlx::query_as::<sqlx::Postgres, BlockingSlotRow>(
            r#"
            SELECT start_time, duration_minutes
            FROM orders
            WHERE scheduled_date = $1
                AND status IN ('pending_confirmation', 'confirmed')
            "#,
        )
        .bind(order.slot.date)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| map_tx_error(e, "Failed to scan for conflicts"))?;

        for row in &existing {
            let taken = Timeslot::new(order.slot.date, row.start_time, row.duration_minutes);
            if taken.overlaps(&order.slot) {
                warn!(
                    "Conflict for order {}: slot {} {} already taken",
                    order.id, order.slot.date, order.slot.start
                );
                return Err(AppError::SlotUnavailable(format!(
                    "{} {} overlaps an existing booking",
                    order.slot.date, order.slot.start
                )));
            }
        }

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, service_kind, request, base_cost, surcharges, total_price,
                scheduled_date, start_time, duration_minutes,
                cleaner_id, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(order.id)
        .bind(order.request.kind().to_string())
        .bind(Json(&order.request))
        .bind(order.price.base_cost)
        .bind(Json(&order.price.surcharges))
        .bind(order.price.total)
        .bind(order.slot.date)
        .bind(order.slot.start)
        .bind(order.slot.duration_minutes)
        .bind(order.cleaner_id)
        .bind(order.status.to_string())
        .bind(&order.notes)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_tx_error(e, "Failed to insert order"))?;

        tx.commit().await.map_err(|e| {
            error!("Failed to commit booking transaction: {}", e);
            AppError::Transaction(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(())
    }

    /// Move an order along the status graph
    ///
    /// The transition is checked against the freshest status and applied
    /// with a compare-and-set, so two concurrent transitions cannot both
    /// win from the same state.
    #[instrument(skip(self))]
    pub async fn update_status(&self, order_id: Uuid, next: OrderStatus) -> AppResult<Order> {
        for _ in 0..STATUS_UPDATE_MAX_ATTEMPTS {
            let mut order = self
                .orders
                .find_by_id(order_id)
                .await?
                .ok_or_else(|| AppError::OrderNotFound(order_id.to_string()))?;

            let current = order.status;
            // Validates the edge; also rejects no-op "transitions"
            order.transition_to(next)?;

            if self
                .orders
                .compare_and_set_status(order_id, current, next)
                .await?
            {
                info!("Order {} moved {} -> {}", order_id, current, next);
                return Ok(order);
            }

            debug!(
                "Order {} changed under us while moving to {}, re-reading",
                order_id, next
            );
        }

        Err(AppError::Transaction(format!(
            "order {} status kept changing concurrently",
            order_id
        )))
    }

    /// Assign a cleaner to an order that is still assignable
    ///
    /// # Errors
    ///
    /// - `CleanerNotFound` for an unknown cleaner
    /// - `OrderNotAssignable` once the order is completed or cancelled
    #[instrument(skip(self))]
    pub async fn assign_cleaner(&self, order_id: Uuid, cleaner_id: Uuid) -> AppResult<Order> {
        self.cleaners
            .find_by_id(cleaner_id)
            .await?
            .ok_or_else(|| AppError::CleanerNotFound(cleaner_id.to_string()))?;

        let order = self.orders.assign_cleaner(order_id, cleaner_id).await?;

        info!("Assigned cleaner {} to order {}", cleaner_id, order_id);
        Ok(order)
    }
}

/// Minimal row for in-lock conflict scanning
#[derive(Debug, sqlx::FromRow)]
struct BlockingSlotRow {
    start_time: NaiveTime,
    duration_minutes: i32,
}

/// Map a sqlx error inside the booking transaction to AppError
///
/// Lock timeouts, serialization failures, and deadlocks are transient and
/// tagged as `Transaction` so the caller retries them; everything else is a
/// hard `Database` error.
fn map_tx_error(err: sqlx::Error, context: &str) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if let Some(code) = db.code() {
            // 55P03 lock_not_available, 40001 serialization_failure,
            // 40P01 deadlock_detected
            if matches!(code.as_ref(), "55P03" | "40001" | "40P01") {
                return AppError::Transaction(format!("{}: {}", context, err));
            }
        }
    }

    error!("{}: {}", context, err);
    AppError::Database(format!("{}: {}", context, err))
}
