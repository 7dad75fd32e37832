//! Order entity and status state machine
//!
//! An order is the only entity with identity and lifecycle. Once persisted
//! it is owned by the order store and mutated only through the status
//! transition graph:
//!
//! ```text
//! PendingConfirmation -> { Confirmed, Cancelled }
//! Confirmed           -> { Completed, Cancelled }
//! Completed, Cancelled: terminal
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::pricing::PriceBreakdown;
use crate::models::service::ServiceRequest;
use crate::models::timeslot::Timeslot;

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, awaiting confirmation
    #[default]
    PendingConfirmation,
    /// Confirmed by the operator
    Confirmed,
    /// Work finished
    Completed,
    /// Cancelled before completion
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::PendingConfirmation => write!(f, "pending_confirmation"),
            OrderStatus::Confirmed => write!(f, "confirmed"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl OrderStatus {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending_confirmation" => Some(OrderStatus::PendingConfirmation),
            "confirmed" => Some(OrderStatus::Confirmed),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether any further transition is legal
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Whether an order in this status blocks its timeslot
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            OrderStatus::PendingConfirmation | OrderStatus::Confirmed
        )
    }

    /// Whether a cleaner may still be assigned in this status
    pub fn is_assignable(&self) -> bool {
        self.is_blocking()
    }

    /// Whether the transition `self -> next` is on the graph
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (
                OrderStatus::PendingConfirmation,
                OrderStatus::Confirmed | OrderStatus::Cancelled
            ) | (
                OrderStatus::Confirmed,
                OrderStatus::Completed | OrderStatus::Cancelled
            )
        )
    }
}

/// Booked order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier
    pub id: Uuid,

    /// What was requested
    pub request: ServiceRequest,

    /// Price computed at booking time
    pub price: PriceBreakdown,

    /// Booked time window
    pub slot: Timeslot,

    /// Assigned cleaner, if any
    pub cleaner_id: Option<Uuid>,

    /// Current status
    pub status: OrderStatus,

    /// Free-form client notes
    pub notes: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a new order in `PendingConfirmation`
    pub fn new(
        request: ServiceRequest,
        price: PriceBreakdown,
        slot: Timeslot,
        notes: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            request,
            price,
            slot,
            cleaner_id: None,
            status: OrderStatus::PendingConfirmation,
            notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a status transition, enforcing the graph
    ///
    /// Illegal edges fail; there is no silent no-op, a `Confirmed ->
    /// Confirmed` "transition" is an error too.
    pub fn transition_to(&mut self, next: OrderStatus) -> Result<(), AppError> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }

        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Whether this order blocks its slot for new bookings
    pub fn is_blocking(&self) -> bool {
        self.status.is_blocking()
    }
}
