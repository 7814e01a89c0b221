use time::Date;
use ulid::Ulid;

use crate::limits::MINUTES_PER_DAY;
use crate::model::{Booking, Minute, TimeInterval};

use super::slots::free_slots;
use super::{Engine, EngineError};

impl Engine {
    /// Active bookings for a room on a date, sorted by start time.
    /// Empty for unknown rooms and empty days; never fails.
    pub async fn schedule(&self, room_id: Ulid, date: Date) -> Vec<Booking> {
        let Some(rs) = self.existing_room_schedule(&room_id) else {
            return Vec::new();
        };
        let guard = rs.read().await;
        guard.bucket(date).to_vec()
    }

    /// Free intervals for a room within `[day_start, day_end)` on a date.
    /// A room with no schedule yields the whole window.
    pub async fn free_slots(
        &self,
        room_id: Ulid,
        date: Date,
        day_start: Minute,
        day_end: Minute,
    ) -> Result<Vec<TimeInterval>, EngineError> {
        if day_start >= day_end || day_end > MINUTES_PER_DAY {
            return Err(EngineError::InvalidRange {
                start: day_start,
                end: day_end,
            });
        }
        let Some(rs) = self.existing_room_schedule(&room_id) else {
            return Ok(vec![TimeInterval {
                date,
                start: day_start,
                end: day_end,
            }]);
        };
        let guard = rs.read().await;
        Ok(free_slots(date, guard.bucket(date), day_start, day_end))
    }
}
