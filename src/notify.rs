use dashmap::DashMap;
use tokio::sync::broadcast;
use ulid::Ulid;

use crate::model::Booking;

const CHANNEL_CAPACITY: usize = 256;

/// A schedule change on one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleEvent {
    Booked(Booking),
    Confirmed(Booking),
    Cancelled(Booking),
}

/// Broadcast hub for schedule change events, one channel per room.
/// The excluded dashboard/availability layers subscribe here.
pub struct NotifyHub {
    channels: DashMap<Ulid, broadcast::Sender<ScheduleEvent>>,
}

impl Default for NotifyHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribe to schedule changes for a room. Creates the channel if needed.
    pub fn subscribe(&self, room_id: Ulid) -> broadcast::Receiver<ScheduleEvent> {
        let sender = self
            .channels
            .entry(room_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        sender.subscribe()
    }

    /// Send a notification. No-op if nobody is listening.
    pub fn send(&self, room_id: Ulid, event: &ScheduleEvent) {
        if let Some(sender) = self.channels.get(&room_id) {
            let _ = sender.send(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BookingStatus, TimeInterval};
    use time::macros::date;

    fn booking(room_id: Ulid) -> Booking {
        Booking {
            id: Ulid::new(),
            room_id,
            user_id: Ulid::new(),
            interval: TimeInterval::new(date!(2030 - 06 - 02), 600, 660).unwrap(),
            title: "1:1".into(),
            attendees: 2,
            status: BookingStatus::Confirmed,
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn subscribe_and_receive() {
        let hub = NotifyHub::new();
        let room = Ulid::new();
        let mut rx = hub.subscribe(room);

        let event = ScheduleEvent::Booked(booking(room));
        hub.send(room, &event);

        let received = rx.recv().await.unwrap();
        assert_eq!(received, event);
    }

    #[tokio::test]
    async fn send_without_subscribers_is_noop() {
        let hub = NotifyHub::new();
        let room = Ulid::new();
        // No subscriber — should not panic
        hub.send(room, &ScheduleEvent::Cancelled(booking(room)));
    }
}
