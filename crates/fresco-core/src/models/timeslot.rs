//! Timeslot and working-hours models
//!
//! A timeslot is a half-open interval `[start, start + duration)` on a
//! calendar date. Overlap tests are exact and symmetric; back-to-back slots
//! never conflict.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::pricing::DurationBucket;

/// Booked time window on a calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeslot {
    /// Calendar date of the visit
    pub date: NaiveDate,

    /// Start time of day
    pub start: NaiveTime,

    /// Duration in minutes
    pub duration_minutes: i32,
}

impl Timeslot {
    pub fn new(date: NaiveDate, start: NaiveTime, duration_minutes: i32) -> Self {
        Self {
            date,
            start,
            duration_minutes,
        }
    }

    /// Build a slot from a derived duration bucket
    pub fn from_bucket(date: NaiveDate, start: NaiveTime, bucket: DurationBucket) -> Self {
        Self::new(date, start, bucket.minutes())
    }

    /// Start of the slot in minutes from midnight
    pub fn start_minutes(&self) -> i32 {
        (self.start.hour() * 60 + self.start.minute()) as i32
    }

    /// End of the slot in minutes from midnight (exclusive)
    pub fn end_minutes(&self) -> i32 {
        self.start_minutes() + self.duration_minutes
    }

    /// End time of day (exclusive). Only meaningful for slots that fit the
    /// working day, which validation guarantees before any slot is used.
    pub fn end(&self) -> NaiveTime {
        self.start + chrono::Duration::minutes(self.duration_minutes as i64)
    }

    /// Half-open interval overlap on the same date:
    /// `a.start < b.end && b.start < a.end`
    pub fn overlaps(&self, other: &Timeslot) -> bool {
        self.date == other.date
            && self.start_minutes() < other.end_minutes()
            && other.start_minutes() < self.end_minutes()
    }
}

/// Working-day boundaries, `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl WorkingHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Start of the working day in minutes from midnight
    pub fn start_minutes(&self) -> i32 {
        (self.start.hour() * 60 + self.start.minute()) as i32
    }

    /// End of the working day in minutes from midnight (exclusive)
    pub fn end_minutes(&self) -> i32 {
        (self.end.hour() * 60 + self.end.minute()) as i32
    }

    /// Whether a slot lies entirely inside the working day
    pub fn contains(&self, slot: &Timeslot) -> bool {
        slot.start_minutes() >= self.start_minutes() && slot.end_minutes() <= self.end_minutes()
    }

    /// Whether a start time falls on the slot grid anchored at day start
    pub fn is_grid_aligned(&self, start: NaiveTime, interval_minutes: u32) -> bool {
        if interval_minutes == 0 {
            return false;
        }
        let start_min = (start.hour() * 60 + start.minute()) as i32;
        let offset = start_min - self.start_minutes();
        start.second() == 0 && offset >= 0 && offset % interval_minutes as i32 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(start_h: u32, start_m: u32, duration_minutes: i32) -> Timeslot {
        Timeslot::new(
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            NaiveTime::from_hms_opt(start_h, start_m, 0).unwrap(),
            duration_minutes,
        )
    }

    fn hours() -> WorkingHours {
        WorkingHours::new(
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = slot(10, 0, 120); // [10:00, 12:00)
        let b = slot(11, 0, 120); // [11:00, 13:00)

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_back_to_back_slots_do_not_overlap() {
        let a = slot(10, 0, 120); // [10:00, 12:00)
        let b = slot(12, 0, 120); // [12:00, 14:00)

        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_overlap_requires_same_date() {
        let a = slot(10, 0, 120);
        let mut b = slot(10, 0, 120);
        b.date = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();

        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_containment_uses_slot_end() {
        let hours = hours();

        assert!(hours.contains(&slot(17, 0, 120))); // ends exactly at close
        assert!(!hours.contains(&slot(17, 30, 120))); // spills past close
        assert!(!hours.contains(&slot(9, 30, 60))); // starts before open
    }

    #[test]
    fn test_grid_alignment() {
        let hours = hours();

        assert!(hours.is_grid_aligned(NaiveTime::from_hms_opt(10, 0, 0).unwrap(), 30));
        assert!(hours.is_grid_aligned(NaiveTime::from_hms_opt(14, 30, 0).unwrap(), 30));
        assert!(!hours.is_grid_aligned(NaiveTime::from_hms_opt(10, 15, 0).unwrap(), 30));
        assert!(!hours.is_grid_aligned(NaiveTime::from_hms_opt(9, 30, 0).unwrap(), 30));
        assert!(!hours.is_grid_aligned(NaiveTime::from_hms_opt(10, 30, 30).unwrap(), 30));
    }

    #[test]
    fn test_end_time() {
        assert_eq!(
            slot(10, 30, 180).end(),
            NaiveTime::from_hms_opt(13, 30, 0).unwrap()
        );
    }
}
