use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::Date;
use ulid::Ulid;

use crate::engine::EngineError;
use crate::limits::MINUTES_PER_DAY;

/// Unix milliseconds — the only wall-clock type.
pub type Ms = i64;

/// Minute of day, `0..=1440`.
pub type Minute = u16;

/// Half-open time range `[start, end)` on a single calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub date: Date,
    pub start: Minute,
    pub end: Minute,
}

impl TimeInterval {
    pub fn new(date: Date, start: Minute, end: Minute) -> Result<Self, EngineError> {
        if start >= end || end > MINUTES_PER_DAY {
            return Err(EngineError::InvalidRange { start, end });
        }
        Ok(Self { date, start, end })
    }

    pub fn duration_min(&self) -> Minute {
        self.end - self.start
    }

    /// Touching boundaries do not overlap: back-to-back bookings are allowed.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }

    pub fn contains_minute(&self, date: Date, minute: Minute) -> bool {
        self.date == date && self.start <= minute && minute < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Awaiting an external approval workflow; occupies the schedule.
    Pending,
    /// Admitted; occupies the schedule.
    Confirmed,
    /// Terminal; the interval is freed.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    pub room_id: Ulid,
    pub user_id: Ulid,
    pub interval: TimeInterval,
    pub title: String,
    pub attendees: u32,
    pub status: BookingStatus,
    pub created_at: Ms,
}

impl Booking {
    pub fn is_active(&self) -> bool {
        matches!(self.status, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// What a caller submits to [`crate::engine::Engine::book`].
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub room_id: Ulid,
    pub user_id: Ulid,
    pub interval: TimeInterval,
    pub title: String,
    pub attendees: u32,
}

/// Per-room schedule: one bucket of active bookings per calendar date,
/// each bucket sorted by interval start.
#[derive(Debug, Clone)]
pub struct RoomSchedule {
    pub room_id: Ulid,
    days: BTreeMap<Date, Vec<Booking>>,
}

impl RoomSchedule {
    pub fn new(room_id: Ulid) -> Self {
        Self {
            room_id,
            days: BTreeMap::new(),
        }
    }

    /// Active bookings for one date, sorted by start. Empty slice if none.
    pub fn bucket(&self, date: Date) -> &[Booking] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Insert maintaining sort order by interval start.
    pub fn insert(&mut self, booking: Booking) {
        let bucket = self.days.entry(booking.interval.date).or_default();
        let pos = bucket
            .binary_search_by_key(&booking.interval.start, |b| b.interval.start)
            .unwrap_or_else(|e| e);
        bucket.insert(pos, booking);
    }

    /// Remove by id. `None` if absent — cancellation retries are no-ops.
    pub fn remove(&mut self, date: Date, id: Ulid) -> Option<Booking> {
        let bucket = self.days.get_mut(&date)?;
        let pos = bucket.iter().position(|b| b.id == id)?;
        let removed = bucket.remove(pos);
        if bucket.is_empty() {
            self.days.remove(&date);
        }
        Some(removed)
    }

    pub fn get(&self, date: Date, id: Ulid) -> Option<&Booking> {
        self.days.get(&date)?.iter().find(|b| b.id == id)
    }

    /// First active booking whose interval overlaps `interval`, if any.
    /// Scans only the day bucket; binary search skips bookings starting at
    /// or after `interval.end`.
    pub fn conflicting(&self, interval: &TimeInterval) -> Option<&Booking> {
        let bucket = self.days.get(&interval.date)?;
        let right_bound = bucket.partition_point(|b| b.interval.start < interval.end);
        bucket[..right_bound]
            .iter()
            .find(|b| b.interval.end > interval.start)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
