//! Pricing catalog repository implementation
//!
//! Read-only PostgreSQL access to the `services` table. Catalog rows are
//! administered by the management surface; the engine only looks them up.

use fresco_core::{
    models::{ServiceKind, ServiceRates},
    traits::PricingCatalog,
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of PricingCatalog
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    /// Create a new catalog repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const RATES_COLUMNS: &str = r#"
    kind, name,
    base_price, cushion_rate, pillow_rate, area_rate, window_rate,
    base_surcharge_pct, pet_hair_surcharge_pct, urine_stain_surcharge_pct,
    accelerated_drying_fee,
    is_published, created_at, updated_at
"#;

#[async_trait]
impl PricingCatalog for PgCatalogRepository {
    #[instrument(skip(self))]
    async fn get_rates(&self, kind: ServiceKind) -> AppResult<Option<ServiceRates>> {
        debug!("Finding catalog rates for service kind: {}", kind);

        let result = sqlx::query_as::<sqlx::Postgres, RatesRow>(&format!(
            r#"
            SELECT {RATES_COLUMNS}
            FROM services
            WHERE kind = $1 AND is_published = TRUE
            "#,
        ))
        .bind(kind.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding rates for {}: {}", kind, e);
            AppError::Database(format!("Failed to find rates: {}", e))
        })?;

        result.map(ServiceRates::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_published(&self) -> AppResult<Vec<ServiceRates>> {
        debug!("Listing published catalog entries");

        let rows = sqlx::query_as::<sqlx::Postgres, RatesRow>(&format!(
            r#"
            SELECT {RATES_COLUMNS}
            FROM services
            WHERE is_published = TRUE
            ORDER BY kind
            "#,
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing catalog: {}", e);
            AppError::Database(format!("Failed to list catalog: {}", e))
        })?;

        rows.into_iter().map(ServiceRates::try_from).collect()
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct RatesRow {
    kind: String,
    name: String,
    base_price: Decimal,
    cushion_rate: Decimal,
    pillow_rate: Decimal,
    area_rate: Decimal,
    window_rate: Decimal,
    base_surcharge_pct: Decimal,
    pet_hair_surcharge_pct: Decimal,
    urine_stain_surcharge_pct: Decimal,
    accelerated_drying_fee: Decimal,
    is_published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RatesRow> for ServiceRates {
    type Error = AppError;

    // A row with a kind the engine does not know cannot be priced; surfacing
    // it beats silently defaulting the formula.
    fn try_from(row: RatesRow) -> Result<Self, Self::Error> {
        let kind = ServiceKind::from_str(&row.kind)
            .ok_or_else(|| AppError::UnknownServiceType(row.kind.clone()))?;

        Ok(Self {
            kind,
            name: row.name,
            base_price: row.base_price,
            cushion_rate: row.cushion_rate,
            pillow_rate: row.pillow_rate,
            area_rate: row.area_rate,
            window_rate: row.window_rate,
            base_surcharge_pct: row.base_surcharge_pct,
            pet_hair_surcharge_pct: row.pet_hair_surcharge_pct,
            urine_stain_surcharge_pct: row.urine_stain_surcharge_pct,
            accelerated_drying_fee: row.accelerated_drying_fee,
            is_published: row.is_published,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_row() -> RatesRow {
        RatesRow {
            kind: "couch".to_string(),
            name: "Couch cleaning".to_string(),
            base_price: dec!(80),
            cushion_rate: dec!(10),
            pillow_rate: dec!(5),
            area_rate: dec!(0),
            window_rate: dec!(0),
            base_surcharge_pct: dec!(38),
            pet_hair_surcharge_pct: dec!(15),
            urine_stain_surcharge_pct: dec!(5),
            accelerated_drying_fee: dec!(45),
            is_published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let rates = ServiceRates::try_from(sample_row()).unwrap();
        assert_eq!(rates.kind, ServiceKind::Couch);
        assert_eq!(rates.base_price, dec!(80));
        assert_eq!(rates.base_surcharge_pct, dec!(38));
    }

    #[test]
    fn test_row_conversion_rejects_unknown_kind() {
        let mut row = sample_row();
        row.kind = "chandelier".to_string();

        let err = ServiceRates::try_from(row).unwrap_err();
        assert_eq!(err.error_code(), "unknown_service_type");
    }
}
