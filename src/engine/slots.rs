use time::Date;

use crate::model::{Booking, Minute, TimeInterval};

/// Complement of a day bucket's bookings within `[day_start, day_end)`:
/// the leading gap, the gaps between consecutive bookings, and the trailing
/// gap, clamped to the window. `bucket` must be sorted by interval start.
/// Back-to-back bookings produce a zero-length gap, which is omitted.
pub fn free_slots(
    date: Date,
    bucket: &[Booking],
    day_start: Minute,
    day_end: Minute,
) -> Vec<TimeInterval> {
    let mut gaps = Vec::new();
    let mut cursor = day_start;

    for booking in bucket {
        let iv = &booking.interval;
        if iv.start >= day_end {
            break;
        }
        if iv.end <= cursor {
            continue;
        }
        if iv.start > cursor {
            gaps.push(TimeInterval {
                date,
                start: cursor,
                end: iv.start,
            });
        }
        cursor = cursor.max(iv.end.min(day_end));
    }

    if cursor < day_end {
        gaps.push(TimeInterval {
            date,
            start: cursor,
            end: day_end,
        });
    }

    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookingStatus;
    use time::macros::date;
    use ulid::Ulid;

    const DAY: Date = date!(2030 - 06 - 02);

    fn booking(start: Minute, end: Minute) -> Booking {
        Booking {
            id: Ulid::new(),
            room_id: Ulid::new(),
            user_id: Ulid::new(),
            interval: TimeInterval::new(DAY, start, end).unwrap(),
            title: "sync".into(),
            attendees: 2,
            status: BookingStatus::Confirmed,
            created_at: 0,
        }
    }

    fn gap(start: Minute, end: Minute) -> TimeInterval {
        TimeInterval { date: DAY, start, end }
    }

    #[test]
    fn empty_day_is_one_full_gap() {
        assert_eq!(free_slots(DAY, &[], 480, 1080), vec![gap(480, 1080)]);
    }

    #[test]
    fn complement_of_two_bookings() {
        // Bookings 09:00-10:00 and 13:00-14:00, day scoped 08:00-18:00.
        let bucket = vec![booking(540, 600), booking(780, 840)];
        assert_eq!(
            free_slots(DAY, &bucket, 480, 1080),
            vec![gap(480, 540), gap(600, 780), gap(840, 1080)]
        );
    }

    #[test]
    fn touching_bookings_omit_zero_length_gap() {
        let bucket = vec![booking(540, 600), booking(600, 660)];
        assert_eq!(
            free_slots(DAY, &bucket, 480, 1080),
            vec![gap(480, 540), gap(660, 1080)]
        );
    }

    #[test]
    fn booking_at_window_edges_leaves_no_edge_gap() {
        let bucket = vec![booking(480, 540), booking(1020, 1080)];
        assert_eq!(free_slots(DAY, &bucket, 480, 1080), vec![gap(540, 1020)]);
    }

    #[test]
    fn bookings_outside_window_are_ignored() {
        let bucket = vec![booking(0, 60), booking(540, 600), booking(1200, 1260)];
        assert_eq!(
            free_slots(DAY, &bucket, 480, 1080),
            vec![gap(480, 540), gap(600, 1080)]
        );
    }

    #[test]
    fn booking_straddling_window_start_is_clamped() {
        let bucket = vec![booking(420, 510)];
        assert_eq!(free_slots(DAY, &bucket, 480, 1080), vec![gap(510, 1080)]);
    }

    #[test]
    fn booking_covering_whole_window_leaves_nothing() {
        let bucket = vec![booking(400, 1100)];
        assert!(free_slots(DAY, &bucket, 480, 1080).is_empty());
    }
}
