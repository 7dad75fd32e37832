//! Cleaner registry repository implementation
//!
//! Cleaners are created and managed by the admin surface; the engine only
//! validates assignment targets, so this repository is lookup-only.

use fresco_core::{models::Cleaner, traits::CleanerRepository, AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL implementation of CleanerRepository
pub struct PgCleanerRepository {
    pool: PgPool,
}

impl PgCleanerRepository {
    /// Create a new cleaner repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CleanerRepository for PgCleanerRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Cleaner>> {
        debug!("Finding cleaner by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, CleanerRow>(
            r#"
            SELECT id, full_name, phone, email, created_at, updated_at
            FROM cleaners
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding cleaner {}: {}", id, e);
            AppError::Database(format!("Failed to find cleaner: {}", e))
        })?;

        Ok(result.map(Into::into))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct CleanerRow {
    id: Uuid,
    full_name: String,
    phone: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CleanerRow> for Cleaner {
    fn from(row: CleanerRow) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            phone: row.phone,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
