//! Application configuration
//!
//! Centralized configuration management using the `config` crate.
//! Values can come from config files and environment variables with the
//! `FRESCO` prefix (e.g. `FRESCO_DATABASE__URL`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub scheduling: SchedulingConfig,
    pub booking: BookingConfig,
}

/// Database configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Idle connection timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

/// Redis configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: String,

    /// Default TTL for cached items in seconds
    #[serde(default = "default_cache_ttl")]
    pub default_ttl_secs: u64,
}

fn default_cache_ttl() -> u64 {
    300
}

/// Working-day and slot-grid configuration
///
/// All bookings must fit inside `[day_start, day_end)` and start on the
/// slot grid.
#[derive(Debug, Deserialize, Clone)]
pub struct SchedulingConfig {
    /// Start of the working day, "HH:MM"
    #[serde(default = "default_day_start")]
    pub day_start: String,

    /// End of the working day, "HH:MM" (exclusive)
    #[serde(default = "default_day_end")]
    pub day_end: String,

    /// Slot grid interval in minutes
    #[serde(default = "default_slot_interval")]
    pub slot_interval_minutes: u32,
}

fn default_day_start() -> String {
    "10:00".to_string()
}

fn default_day_end() -> String {
    "19:00".to_string()
}

fn default_slot_interval() -> u32 {
    30
}

/// Booking transaction configuration
#[derive(Debug, Deserialize, Clone)]
pub struct BookingConfig {
    /// Maximum attempts for the booking transaction on transient conflicts
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff between booking attempts in milliseconds
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,

    /// Postgres lock_timeout for the booking transaction in milliseconds
    #[serde(default = "default_lock_timeout")]
    pub lock_timeout_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_backoff() -> u64 {
    50
}

fn default_lock_timeout() -> u64 {
    2000
}

impl AppConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("database.idle_timeout_secs", 600)?
            .set_default("redis.default_ttl_secs", 300)?
            .set_default("scheduling.day_start", "10:00")?
            .set_default("scheduling.day_end", "19:00")?
            .set_default("scheduling.slot_interval_minutes", 30)?
            .set_default("booking.max_attempts", 3)?
            .set_default("booking.retry_backoff_ms", 50)?
            .set_default("booking.lock_timeout_ms", 2000)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with FRESCO_ prefix
            .add_source(
                Environment::with_prefix("FRESCO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("FRESCO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            day_start: default_day_start(),
            day_end: default_day_end(),
            slot_interval_minutes: default_slot_interval(),
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff(),
            lock_timeout_ms: default_lock_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scheduling_config() {
        let config = SchedulingConfig::default();
        assert_eq!(config.day_start, "10:00");
        assert_eq!(config.day_end, "19:00");
        assert_eq!(config.slot_interval_minutes, 30);
    }

    #[test]
    fn test_default_booking_config() {
        let config = BookingConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.lock_timeout_ms, 2000);
    }
}
