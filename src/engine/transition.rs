use ulid::Ulid;

use crate::model::{Booking, BookingStatus};
use crate::notify::ScheduleEvent;
use crate::observability;

use super::{Engine, EngineError};

impl Engine {
    /// Cancel a booking, freeing its interval for future admission.
    ///
    /// Idempotent: cancelling an already-cancelled booking returns it
    /// unchanged. Takes the same per-room lock as admission, so cancellation
    /// and admission for one room are mutually exclusive. The cancelled
    /// record is saved before the bucket mutation; a store failure therefore
    /// leaves the schedule untouched.
    pub async fn cancel(&self, id: Ulid) -> Result<Booking, EngineError> {
        let Some((room_id, date)) = self.lookup(&id) else {
            return self.cancel_from_history(id).await;
        };
        let Some(rs) = self.existing_room_schedule(&room_id) else {
            return self.cancel_from_history(id).await;
        };

        let mut guard = rs.write().await;
        let Some(current) = guard.get(date, id) else {
            drop(guard);
            return self.cancel_from_history(id).await;
        };
        let mut cancelled = current.clone();
        cancelled.status = BookingStatus::Cancelled;

        self.save_with_retry(&cancelled).await?;
        guard.remove(date, id);
        self.booking_index.remove(&id);
        drop(guard);

        metrics::counter!(observability::CANCELLATIONS_TOTAL).increment(1);
        tracing::info!(booking = %id, room = %room_id, "booking cancelled");
        self.publish(room_id, ScheduleEvent::Cancelled(cancelled.clone()));
        Ok(cancelled)
    }

    /// Cancel path for ids not in the active index: consult store history.
    async fn cancel_from_history(&self, id: Ulid) -> Result<Booking, EngineError> {
        let record = self
            .store
            .load(id)
            .await
            .map_err(|e| EngineError::Persistence(e.to_string()))?;
        match record {
            Some(booking) if booking.status == BookingStatus::Cancelled => Ok(booking),
            Some(mut booking) => {
                // The active index is authoritative for admission; a stored
                // record it no longer tracks gets its history repaired.
                booking.status = BookingStatus::Cancelled;
                self.save_with_retry(&booking).await?;
                Ok(booking)
            }
            None => Err(EngineError::NotFound(id)),
        }
    }

    /// Pending → Confirmed, triggered by an external approval workflow.
    /// Confirming an already-confirmed booking is a no-op; a cancelled
    /// booking is no longer active and reports NotFound.
    pub async fn confirm(&self, id: Ulid) -> Result<Booking, EngineError> {
        let (room_id, date) = self.lookup(&id).ok_or(EngineError::NotFound(id))?;
        let rs = self
            .existing_room_schedule(&room_id)
            .ok_or(EngineError::NotFound(id))?;

        let mut guard = rs.write().await;
        let current = guard.get(date, id).ok_or(EngineError::NotFound(id))?;
        if current.status == BookingStatus::Confirmed {
            return Ok(current.clone());
        }
        let mut confirmed = current.clone();
        confirmed.status = BookingStatus::Confirmed;

        self.save_with_retry(&confirmed).await?;
        guard.remove(date, id);
        guard.insert(confirmed.clone());
        drop(guard);

        tracing::info!(booking = %id, room = %room_id, "booking confirmed");
        self.publish(room_id, ScheduleEvent::Confirmed(confirmed.clone()));
        Ok(confirmed)
    }
}
