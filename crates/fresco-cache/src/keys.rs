//! Cache key constants and builders for Fresco
//!
//! Standardized key naming for cached entities, preventing key collisions
//! between subsystems.
//!
//! # Key Patterns
//!
//! - `rates:{kind}` - Cached pricing-catalog entries by service kind

/// Prefix for cached catalog rates
///
/// Format: `rates:{kind}`
pub const RATES_KEY_PREFIX: &str = "rates";

/// Default TTL for catalog rates (1 hour)
///
/// Rates change rarely; a stale entry prices at most one hour of quotes
/// against the previous rate card.
pub const RATES_TTL_SECS: u64 = 3600;

/// Build a cache key for catalog rates by service kind
///
/// # Example
///
/// ```
/// use fresco_cache::keys::rates_key;
///
/// let key = rates_key("couch");
/// assert_eq!(key, "rates:couch");
/// ```
pub fn rates_key(kind: &str) -> String {
    format!("{}:{}", RATES_KEY_PREFIX, kind)
}
