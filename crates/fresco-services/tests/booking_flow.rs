//! End-to-end booking flow tests against a real database
//!
//! These tests exercise the serialized check-then-insert that unit tests
//! cannot reach. They need PostgreSQL and Redis:
//!
//! ```text
//! DATABASE_URL=postgresql://localhost/fresco_test \
//! REDIS_URL=redis://127.0.0.1:6379 \
//!     cargo test --test booking_flow -- --ignored
//! ```

use fresco_cache::RedisCache;
use fresco_core::config::{BookingConfig, SchedulingConfig};
use fresco_core::models::{
    CleaningOptions, DurationBucket, OrderStatus, ServiceDetails, ServiceKind, ServiceRequest,
};
use fresco_core::traits::OrderRepository;
use fresco_db::{PgCatalogRepository, PgCleanerRepository, PgOrderRepository};
use fresco_services::{BookingService, CatalogService, Scheduler};
use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

type PgBookingService = BookingService<PgCatalogRepository, PgOrderRepository, PgCleanerRepository>;

async fn connect() -> PgPool {
    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgresql://localhost/fresco_test".to_string());

    fresco_db::create_pool(&url, Some(10))
        .await
        .expect("Failed to connect to test database")
}

async fn setup_schema(pool: &PgPool) {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            kind TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            base_price NUMERIC NOT NULL DEFAULT 0,
            cushion_rate NUMERIC NOT NULL DEFAULT 0,
            pillow_rate NUMERIC NOT NULL DEFAULT 0,
            area_rate NUMERIC NOT NULL DEFAULT 0,
            window_rate NUMERIC NOT NULL DEFAULT 0,
            base_surcharge_pct NUMERIC NOT NULL DEFAULT 0,
            pet_hair_surcharge_pct NUMERIC NOT NULL DEFAULT 0,
            urine_stain_surcharge_pct NUMERIC NOT NULL DEFAULT 0,
            accelerated_drying_fee NUMERIC NOT NULL DEFAULT 0,
            is_published BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id UUID PRIMARY KEY,
            service_kind TEXT NOT NULL,
            request JSONB NOT NULL,
            base_cost NUMERIC NOT NULL,
            surcharges JSONB NOT NULL,
            total_price NUMERIC NOT NULL,
            scheduled_date DATE NOT NULL,
            start_time TIME NOT NULL,
            duration_minutes INT NOT NULL,
            cleaner_id UUID,
            status TEXT NOT NULL,
            notes TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cleaners (
            id UUID PRIMARY KEY,
            full_name TEXT NOT NULL,
            phone TEXT NOT NULL,
            email TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await
    .unwrap();
}

async fn seed_catalog(pool: &PgPool) {
    sqlx::query(
        r#"
        INSERT INTO services (
            kind, name, base_price, cushion_rate, pillow_rate,
            base_surcharge_pct, pet_hair_surcharge_pct,
            urine_stain_surcharge_pct, accelerated_drying_fee, is_published
        )
        VALUES ('couch', 'Couch cleaning', 80, 10, 5, 38, 15, 5, 45, TRUE)
        ON CONFLICT (kind) DO NOTHING
        "#,
    )
    .execute(pool)
    .await
    .unwrap();
}

async fn clear_orders(pool: &PgPool, date: NaiveDate) {
    sqlx::query("DELETE FROM orders WHERE scheduled_date = $1")
        .bind(date)
        .execute(pool)
        .await
        .unwrap();
}

async fn booking_service(pool: PgPool) -> PgBookingService {
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    let cache = Arc::new(RedisCache::new(&redis_url).await.unwrap());

    let catalog = Arc::new(CatalogService::new(
        Arc::new(PgCatalogRepository::new(pool.clone())),
        cache,
    ));

    BookingService::new(
        catalog,
        Arc::new(PgOrderRepository::new(pool.clone())),
        Arc::new(PgCleanerRepository::new(pool.clone())),
        Scheduler::from_config(&SchedulingConfig::default()).unwrap(),
        Arc::new(pool),
        BookingConfig::default(),
    )
}

fn couch_request() -> ServiceRequest {
    ServiceRequest::new(
        ServiceDetails::Couch {
            cushion_count: 2,
            pillow_count: 1,
        },
        CleaningOptions {
            base_cleaning: true,
            pet_hair: true,
            ..Default::default()
        },
    )
}

fn future_date(days: i64) -> NaiveDate {
    Utc::now().date_naive() + chrono::Duration::days(days)
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[tokio::test]
#[ignore] // Requires PostgreSQL and Redis
async fn test_book_and_rescan() {
    let pool = connect().await;
    setup_schema(&pool).await;
    seed_catalog(&pool).await;

    let date = future_date(30);
    clear_orders(&pool, date).await;

    let service = booking_service(pool.clone()).await;

    let order = service
        .book(&couch_request(), date, time(10, 0), Some("ring twice".to_string()))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::PendingConfirmation);
    assert_eq!(order.slot.duration_minutes, 120);

    // the booked slot disappears from availability
    let slots = service
        .available_slots(date, DurationBucket::TwoHours)
        .await
        .unwrap();
    assert!(!slots.iter().any(|s| s.start == time(10, 0)));
    assert!(slots.iter().any(|s| s.start == time(12, 0)));

    // a second booking of the same slot conflicts at commit time
    let err = service
        .book(&couch_request(), date, time(10, 0), None)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "slot_unavailable");

    // an overlapping (not identical) slot conflicts too
    let err = service
        .book(&couch_request(), date, time(11, 0), None)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "slot_unavailable");
}

#[tokio::test]
#[ignore] // Requires PostgreSQL and Redis
async fn test_concurrent_booking_exactly_one_wins() {
    let pool = connect().await;
    setup_schema(&pool).await;
    seed_catalog(&pool).await;

    let date = future_date(31);
    clear_orders(&pool, date).await;

    let service = Arc::new(booking_service(pool.clone()).await);

    let a = {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service
                .book(&couch_request(), date, time(14, 0), None)
                .await
        })
    };
    let b = {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service
                .book(&couch_request(), date, time(14, 0), None)
                .await
        })
    };

    let (a, b) = (a.await.unwrap(), b.await.unwrap());

    let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one concurrent booking must win");

    let loser = if a.is_err() { a } else { b };
    assert_eq!(loser.unwrap_err().error_code(), "slot_unavailable");
}

#[tokio::test]
#[ignore] // Requires PostgreSQL and Redis
async fn test_cancelled_order_frees_the_slot() {
    let pool = connect().await;
    setup_schema(&pool).await;
    seed_catalog(&pool).await;

    let date = future_date(32);
    clear_orders(&pool, date).await;

    let service = booking_service(pool.clone()).await;

    let order = service
        .book(&couch_request(), date, time(10, 0), None)
        .await
        .unwrap();

    service
        .update_status(order.id, OrderStatus::Cancelled)
        .await
        .unwrap();

    // the slot opens back up
    let rebooked = service
        .book(&couch_request(), date, time(10, 0), None)
        .await
        .unwrap();
    assert_ne!(rebooked.id, order.id);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL and Redis
async fn test_status_machine_and_assignment_through_store() {
    let pool = connect().await;
    setup_schema(&pool).await;
    seed_catalog(&pool).await;

    let date = future_date(33);
    clear_orders(&pool, date).await;

    let cleaner_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO cleaners (id, full_name, phone, email) VALUES ($1, $2, $3, $4)",
    )
    .bind(cleaner_id)
    .bind("Dana Novak")
    .bind("+1 555 0100")
    .bind(format!("dana+{}@example.com", cleaner_id))
    .execute(&pool)
    .await
    .unwrap();

    let service = booking_service(pool.clone()).await;
    let order = service
        .book(&couch_request(), date, time(15, 0), None)
        .await
        .unwrap();

    // assignable while pending
    let assigned = service.assign_cleaner(order.id, cleaner_id).await.unwrap();
    assert_eq!(assigned.cleaner_id, Some(cleaner_id));

    service
        .update_status(order.id, OrderStatus::Confirmed)
        .await
        .unwrap();
    service
        .update_status(order.id, OrderStatus::Completed)
        .await
        .unwrap();

    // terminal status rejects both transitions and assignment
    let err = service
        .update_status(order.id, OrderStatus::Confirmed)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "invalid_status_transition");

    let err = service.assign_cleaner(order.id, cleaner_id).await.unwrap_err();
    assert_eq!(err.error_code(), "order_not_assignable");

    // completed orders stop blocking the calendar
    let repo = PgOrderRepository::new(pool.clone());
    let blocking = repo.list_blocking_for_date(date).await.unwrap();
    assert!(blocking.iter().all(|o| o.id != order.id));
}

#[tokio::test]
#[ignore] // Requires PostgreSQL and Redis
async fn test_unpublished_service_is_not_bookable() {
    let pool = connect().await;
    setup_schema(&pool).await;

    let service = booking_service(pool.clone()).await;

    // rug was never seeded
    let request = ServiceRequest::new(
        ServiceDetails::Rug {
            width: rust_decimal::Decimal::from(5),
            length: rust_decimal::Decimal::from(8),
        },
        CleaningOptions::default(),
    );

    let err = service
        .book(&request, future_date(34), time(10, 0), None)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "service_not_found");

    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    let catalog = CatalogService::new(
        Arc::new(PgCatalogRepository::new(pool.clone())),
        Arc::new(RedisCache::new(&redis_url).await.unwrap()),
    );
    let published = catalog.list_published().await.unwrap();
    assert!(!published.iter().any(|r| r.kind == ServiceKind::Rug));
}
