//! Cleaner model
//!
//! Cleaners are managed elsewhere; the engine only validates assignment
//! targets against the registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cleaner registry entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cleaner {
    /// Unique identifier
    pub id: Uuid,

    /// Full name
    pub full_name: String,

    /// Contact phone
    pub phone: String,

    /// Contact email
    pub email: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}
