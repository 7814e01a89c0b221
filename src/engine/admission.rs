use ulid::Ulid;

use crate::model::{Booking, BookingRequest, BookingStatus};
use crate::notify::ScheduleEvent;
use crate::observability;

use super::conflict::{now_ms, today_and_minute, validate_request};
use super::{AdmissionPolicy, Engine, EngineError};

impl Engine {
    /// The sole authority for creating an active booking.
    ///
    /// The check-then-insert sequence runs under the room's write lock, so two
    /// concurrent requests for the same slot cannot both pass the overlap
    /// check. Both operations are in-memory and the lock is released before
    /// the store is called; each request then moves through an explicit phase
    /// machine: Reserved → Persisted on success, Reserved → Released when the
    /// store keeps failing (the reservation is removed and the error returned,
    /// so index and store never diverge).
    pub async fn book(&self, req: BookingRequest) -> Result<Booking, EngineError> {
        let started = std::time::Instant::now();
        let (today, now_minute) = today_and_minute();
        if let Err(e) = validate_request(&req, today, now_minute) {
            metrics::counter!(observability::ADMISSIONS_REJECTED_TOTAL, "reason" => "invalid")
                .increment(1);
            return Err(e);
        }
        self.directory
            .validate(req.room_id, req.attendees)
            .await
            .map_err(EngineError::from)?;

        let status = match self.policy {
            AdmissionPolicy::Immediate => BookingStatus::Confirmed,
            AdmissionPolicy::RequireApproval => BookingStatus::Pending,
        };
        let booking = Booking {
            id: Ulid::new(),
            room_id: req.room_id,
            user_id: req.user_id,
            interval: req.interval,
            title: req.title,
            attendees: req.attendees,
            status,
            created_at: now_ms(),
        };

        // Reserve: serialized check-then-insert on this room's lock.
        let rs = self.room_schedule(req.room_id);
        {
            let mut guard = rs.write().await;
            if let Some(existing) = guard.conflicting(&req.interval) {
                let conflict_id = existing.id;
                tracing::debug!(room = %req.room_id, conflict = %conflict_id, "slot unavailable");
                metrics::counter!(observability::ADMISSIONS_REJECTED_TOTAL, "reason" => "conflict")
                    .increment(1);
                return Err(EngineError::SlotUnavailable(conflict_id));
            }
            guard.insert(booking.clone());
        }

        // Persist, or release the reservation.
        if let Err(e) = self.save_with_retry(&booking).await {
            let mut guard = rs.write().await;
            guard.remove(booking.interval.date, booking.id);
            metrics::counter!(observability::RESERVATIONS_ROLLED_BACK_TOTAL).increment(1);
            tracing::warn!(booking = %booking.id, "reservation released after persistence failure");
            return Err(e);
        }

        self.booking_index
            .insert(booking.id, (booking.room_id, booking.interval.date));
        self.publish(booking.room_id, ScheduleEvent::Booked(booking.clone()));
        metrics::counter!(observability::ADMISSIONS_TOTAL).increment(1);
        metrics::histogram!(observability::ADMISSION_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        tracing::info!(
            booking = %booking.id,
            room = %booking.room_id,
            date = %booking.interval.date,
            "booking admitted"
        );
        Ok(booking)
    }
}
