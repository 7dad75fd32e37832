//! Availability and conflict checking
//!
//! Generates the slot grid for a working day and tests candidate slots
//! against existing orders. All checks are pure; the booking service owns
//! the serialized check-then-insert around them.

use fresco_core::{
    config::SchedulingConfig,
    models::{Order, Timeslot, WorkingHours},
    AppError, AppResult,
};
use chrono::{NaiveDate, NaiveTime, Timelike};
use tracing::debug;

/// Slot grid and working-hours policy
#[derive(Debug, Clone)]
pub struct Scheduler {
    hours: WorkingHours,
    slot_interval_minutes: u32,
}

impl Scheduler {
    /// Build a scheduler from configuration
    ///
    /// # Errors
    ///
    /// `Config` when the working-hour strings do not parse or describe an
    /// empty or misaligned day.
    pub fn from_config(config: &SchedulingConfig) -> AppResult<Self> {
        let start = parse_time(&config.day_start)?;
        let end = parse_time(&config.day_end)?;

        if start >= end {
            return Err(AppError::Config(format!(
                "working day start {} must be before end {}",
                config.day_start, config.day_end
            )));
        }
        if config.slot_interval_minutes == 0 {
            return Err(AppError::Config(
                "slot interval must be positive".to_string(),
            ));
        }

        Ok(Self {
            hours: WorkingHours::new(start, end),
            slot_interval_minutes: config.slot_interval_minutes,
        })
    }

    /// The configured working hours
    pub fn working_hours(&self) -> WorkingHours {
        self.hours
    }

    /// Every grid-aligned start time such that the slot still ends by close
    pub fn slot_starts(&self, duration_minutes: i32) -> Vec<NaiveTime> {
        let mut starts = Vec::new();
        let mut minute = self.hours.start_minutes();

        while minute + duration_minutes <= self.hours.end_minutes() {
            if let Some(time) =
                NaiveTime::from_num_seconds_from_midnight_opt(minute as u32 * 60, 0)
            {
                starts.push(time);
            }
            minute += self.slot_interval_minutes as i32;
        }

        starts
    }

    /// Whether a candidate slot overlaps any blocking order
    ///
    /// Cancelled and completed orders never block. The overlap test is the
    /// half-open interval check, so back-to-back slots are compatible.
    pub fn check_conflict(&self, candidate: &Timeslot, existing: &[Order]) -> bool {
        existing
            .iter()
            .any(|order| order.is_blocking() && order.slot.overlaps(candidate))
    }

    /// All free slots of the given duration on a date
    pub fn find_available_slots(
        &self,
        date: NaiveDate,
        duration_minutes: i32,
        existing: &[Order],
    ) -> Vec<Timeslot> {
        let slots: Vec<Timeslot> = self
            .slot_starts(duration_minutes)
            .into_iter()
            .map(|start| Timeslot::new(date, start, duration_minutes))
            .filter(|slot| !self.check_conflict(slot, existing))
            .collect();

        debug!(
            "{} of {} grid slots free on {} for {} minutes",
            slots.len(),
            self.slot_starts(duration_minutes).len(),
            date,
            duration_minutes
        );

        slots
    }

    /// Validate the parts of a booking that don't depend on duration
    ///
    /// Runs before pricing so a bad date or start time is rejected without
    /// touching the catalog or the order store.
    pub fn validate_start(
        &self,
        date: NaiveDate,
        start: NaiveTime,
        today: NaiveDate,
    ) -> AppResult<()> {
        if date <= today {
            return Err(AppError::Validation(format!(
                "scheduled date {} must be after {}",
                date, today
            )));
        }

        if !self
            .hours
            .is_grid_aligned(start, self.slot_interval_minutes)
        {
            return Err(AppError::Validation(format!(
                "start time {} is not aligned to the {}-minute slot grid",
                start, self.slot_interval_minutes
            )));
        }

        let start_min = (start.hour() * 60 + start.minute()) as i32;
        if start_min < self.hours.start_minutes() || start_min >= self.hours.end_minutes() {
            return Err(AppError::Validation(format!(
                "start time {} is outside working hours",
                start
            )));
        }

        Ok(())
    }

    /// Validate a full slot: start checks plus the end-by-close rule
    pub fn validate_timeslot(&self, slot: &Timeslot, today: NaiveDate) -> AppResult<()> {
        self.validate_start(slot.date, slot.start, today)?;

        if !self.hours.contains(slot) {
            return Err(AppError::Validation(format!(
                "a {}-minute visit starting at {} does not end by close of day",
                slot.duration_minutes, slot.start
            )));
        }

        Ok(())
    }
}

fn parse_time(s: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|e| AppError::Config(format!("invalid time '{}': {}", s, e)))
}
