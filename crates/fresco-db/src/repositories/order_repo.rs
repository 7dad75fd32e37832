//! Order store repository implementation
//!
//! PostgreSQL-backed storage for orders with date-scoped queries for
//! conflict scanning and guarded status/assignment updates. The serialized
//! booking insert itself lives in the booking service, which owns the
//! transaction.

use fresco_core::{
    models::{Order, OrderStatus, PriceBreakdown, ServiceRequest, SurchargeLine, Timeslot},
    traits::{OrderRepository, Repository},
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL implementation of OrderRepository
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Create a new order repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Parse order status from string
    fn parse_status(s: &str) -> OrderStatus {
        OrderStatus::from_str(s).unwrap_or(OrderStatus::PendingConfirmation)
    }
}

// `service_kind` is written for SQL-side filtering and indexing but never
// read back; the request payload already carries the kind.
const ORDER_COLUMNS: &str = r#"
    id, request, base_cost, surcharges, total_price,
    scheduled_date, start_time, duration_minutes,
    cleaner_id, status, notes, created_at, updated_at
"#;

#[async_trait]
impl Repository<Order, Uuid> for PgOrderRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        debug!("Finding order by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, OrderRow>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding order {}: {}", id, e);
            AppError::Database(format!("Failed to find order: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Order>> {
        debug!("Finding all orders with limit {} offset {}", limit, offset);

        let rows = sqlx::query_as::<sqlx::Postgres, OrderRow>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding orders: {}", e);
            AppError::Database(format!("Failed to fetch orders: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting orders: {}", e);
                AppError::Database(format!("Failed to count orders: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Order) -> AppResult<Order> {
        debug!("Creating order {} for {}", entity.id, entity.slot.date);

        let row = sqlx::query_as::<sqlx::Postgres, OrderRow>(&format!(
            r#"
            INSERT INTO orders (
                id, service_kind, request, base_cost, surcharges, total_price,
                scheduled_date, start_time, duration_minutes,
                cleaner_id, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {ORDER_COLUMNS}
            "#,
        ))
        .bind(entity.id)
        .bind(entity.request.kind().to_string())
        .bind(Json(&entity.request))
        .bind(entity.price.base_cost)
        .bind(Json(&entity.price.surcharges))
        .bind(entity.price.total)
        .bind(entity.slot.date)
        .bind(entity.slot.start)
        .bind(entity.slot.duration_minutes)
        .bind(entity.cleaner_id)
        .bind(entity.status.to_string())
        .bind(&entity.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating order: {}", e);
            AppError::Database(format!("Failed to create order: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Order) -> AppResult<Order> {
        debug!("Updating order: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, OrderRow>(&format!(
            r#"
            UPDATE orders
            SET request = $2,
                base_cost = $3,
                surcharges = $4,
                total_price = $5,
                scheduled_date = $6,
                start_time = $7,
                duration_minutes = $8,
                cleaner_id = $9,
                status = $10,
                notes = $11,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#,
        ))
        .bind(entity.id)
        .bind(Json(&entity.request))
        .bind(entity.price.base_cost)
        .bind(Json(&entity.price.surcharges))
        .bind(entity.price.total)
        .bind(entity.slot.date)
        .bind(entity.slot.start)
        .bind(entity.slot.duration_minutes)
        .bind(entity.cleaner_id)
        .bind(entity.status.to_string())
        .bind(&entity.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating order {}: {}", entity.id, e);
            AppError::Database(format!("Failed to update order: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        debug!("Deleting order: {}", id);

        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting order {}: {}", id, e);
                AppError::Database(format!("Failed to delete order: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    #[instrument(skip(self))]
    async fn list_for_date(&self, date: NaiveDate) -> AppResult<Vec<Order>> {
        debug!("Listing orders for date: {}", date);

        let rows = sqlx::query_as::<sqlx::Postgres, OrderRow>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE scheduled_date = $1
            ORDER BY start_time
            "#,
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing orders for {}: {}", date, e);
            AppError::Database(format!("Failed to list orders: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn list_blocking_for_date(&self, date: NaiveDate) -> AppResult<Vec<Order>> {
        debug!("Listing blocking orders for date: {}", date);

        let rows = sqlx::query_as::<sqlx::Postgres, OrderRow>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE scheduled_date = $1
                AND status IN ('pending_confirmation', 'confirmed')
            ORDER BY start_time
            "#,
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing blocking orders for {}: {}", date, e);
            AppError::Database(format!("Failed to list blocking orders: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn compare_and_set_status(
        &self,
        id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> AppResult<bool> {
        debug!("Moving order {} from {} to {}", id, expected, next);

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = $3,
                updated_at = NOW()
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(id)
        .bind(expected.to_string())
        .bind(next.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating order status: {}", e);
            AppError::Database(format!("Failed to update order status: {}", e))
        })?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn assign_cleaner(&self, id: Uuid, cleaner_id: Uuid) -> AppResult<Order> {
        debug!("Assigning cleaner {} to order {}", cleaner_id, id);

        // The status guard is part of the UPDATE so a concurrent transition
        // cannot slip between check and write.
        let row = sqlx::query_as::<sqlx::Postgres, OrderRow>(&format!(
            r#"
            UPDATE orders
            SET cleaner_id = $2,
                updated_at = NOW()
            WHERE id = $1
                AND status IN ('pending_confirmation', 'confirmed')
            RETURNING {ORDER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(cleaner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error assigning cleaner: {}", e);
            AppError::Database(format!("Failed to assign cleaner: {}", e))
        })?;

        match row {
            Some(row) => Ok(row.into()),
            None => {
                // Distinguish a missing order from one past assignment
                let status: Option<(String,)> =
                    sqlx::query_as("SELECT status FROM orders WHERE id = $1")
                        .bind(id)
                        .fetch_optional(&self.pool)
                        .await
                        .map_err(|e| AppError::Database(e.to_string()))?;

                match status {
                    Some((status,)) => Err(AppError::OrderNotAssignable(status)),
                    None => Err(AppError::OrderNotFound(id.to_string())),
                }
            }
        }
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    request: Json<ServiceRequest>,
    base_cost: Decimal,
    surcharges: Json<Vec<SurchargeLine>>,
    total_price: Decimal,
    scheduled_date: NaiveDate,
    start_time: NaiveTime,
    duration_minutes: i32,
    cleaner_id: Option<Uuid>,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            request: row.request.0,
            price: PriceBreakdown {
                base_cost: row.base_cost,
                surcharges: row.surcharges.0,
                total: row.total_price,
            },
            slot: Timeslot::new(row.scheduled_date, row.start_time, row.duration_minutes),
            cleaner_id: row.cleaner_id,
            status: PgOrderRepository::parse_status(&row.status),
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
