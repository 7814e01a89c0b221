use time::{Date, OffsetDateTime};

use crate::limits::{MAX_DAYS_AHEAD, MAX_TITLE_LEN};
use crate::model::{BookingRequest, Minute, Ms};

use super::EngineError;

pub(super) fn now_ms() -> Ms {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as Ms
}

/// Current date and minute of day in the engine's canonical timezone (UTC).
pub(super) fn today_and_minute() -> (Date, Minute) {
    let now = OffsetDateTime::now_utc();
    (
        now.date(),
        now.hour() as Minute * 60 + now.minute() as Minute,
    )
}

/// Input validation before any lock is taken. The interval itself was already
/// validated by its constructor.
pub(super) fn validate_request(
    req: &BookingRequest,
    today: Date,
    now_minute: Minute,
) -> Result<(), EngineError> {
    if req.attendees == 0 {
        return Err(EngineError::InvalidAttendees(req.attendees));
    }
    if req.title.len() > MAX_TITLE_LEN {
        return Err(EngineError::LimitExceeded("title too long"));
    }
    let date = req.interval.date;
    if date < today || (date == today && req.interval.end <= now_minute) {
        return Err(EngineError::PastDate(date));
    }
    if (date - today).whole_days() > MAX_DAYS_AHEAD {
        return Err(EngineError::LimitExceeded("date too far ahead"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimeInterval;
    use time::macros::date;
    use ulid::Ulid;

    const TODAY: Date = date!(2030 - 06 - 02);

    fn req(date: Date, start: Minute, end: Minute) -> BookingRequest {
        BookingRequest {
            room_id: Ulid::new(),
            user_id: Ulid::new(),
            interval: TimeInterval::new(date, start, end).unwrap(),
            title: "planning".into(),
            attendees: 3,
        }
    }

    #[test]
    fn accepts_future_date() {
        assert!(validate_request(&req(date!(2030 - 06 - 03), 600, 660), TODAY, 720).is_ok());
    }

    #[test]
    fn rejects_past_date() {
        let result = validate_request(&req(date!(2030 - 06 - 01), 600, 660), TODAY, 0);
        assert!(matches!(result, Err(EngineError::PastDate(_))));
    }

    #[test]
    fn rejects_elapsed_slot_today() {
        // Interval ends at 11:00, clock reads 11:00 — already elapsed.
        let result = validate_request(&req(TODAY, 600, 660), TODAY, 660);
        assert!(matches!(result, Err(EngineError::PastDate(_))));
    }

    #[test]
    fn accepts_in_progress_slot_today() {
        // End still ahead of the clock is bookable.
        assert!(validate_request(&req(TODAY, 600, 660), TODAY, 630).is_ok());
    }

    #[test]
    fn rejects_zero_attendees() {
        let mut r = req(date!(2030 - 06 - 03), 600, 660);
        r.attendees = 0;
        assert!(matches!(
            validate_request(&r, TODAY, 0),
            Err(EngineError::InvalidAttendees(0))
        ));
    }

    #[test]
    fn rejects_oversized_title() {
        let mut r = req(date!(2030 - 06 - 03), 600, 660);
        r.title = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(matches!(
            validate_request(&r, TODAY, 0),
            Err(EngineError::LimitExceeded(_))
        ));
    }

    #[test]
    fn rejects_date_past_horizon() {
        let result = validate_request(&req(date!(2032 - 01 - 01), 600, 660), TODAY, 0);
        assert!(matches!(result, Err(EngineError::LimitExceeded(_))));
    }
}
