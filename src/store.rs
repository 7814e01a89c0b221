use async_trait::async_trait;
use dashmap::DashMap;
use ulid::Ulid;

use crate::model::Booking;

/// Opaque failure from the durable-store collaborator.
#[derive(Debug)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "store error: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

/// Durable-store collaborator. The in-memory schedule is the source of truth
/// for admission; the store is the source of truth for durability and history.
/// Cancelled bookings stay in the store as history.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn save(&self, booking: &Booking) -> Result<(), StoreError>;

    async fn load(&self, id: Ulid) -> Result<Option<Booking>, StoreError>;

    /// All bookings still occupying their interval, for startup population.
    async fn load_active(&self) -> Result<Vec<Booking>, StoreError>;
}

/// DashMap-backed store for tests and single-process embedding.
#[derive(Default)]
pub struct MemoryStore {
    records: DashMap<Ulid, Booking>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn save(&self, booking: &Booking) -> Result<(), StoreError> {
        self.records.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn load(&self, id: Ulid) -> Result<Option<Booking>, StoreError> {
        Ok(self.records.get(&id).map(|e| e.value().clone()))
    }

    async fn load_active(&self) -> Result<Vec<Booking>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|e| e.value().is_active())
            .map(|e| e.value().clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BookingStatus, TimeInterval};
    use time::macros::date;

    fn booking(status: BookingStatus) -> Booking {
        Booking {
            id: Ulid::new(),
            room_id: Ulid::new(),
            user_id: Ulid::new(),
            interval: TimeInterval::new(date!(2030 - 06 - 02), 600, 660).unwrap(),
            title: "retro".into(),
            attendees: 5,
            status,
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn save_then_load_round_trip() {
        let store = MemoryStore::new();
        let b = booking(BookingStatus::Confirmed);
        store.save(&b).await.unwrap();
        assert_eq!(store.load(b.id).await.unwrap(), Some(b));
    }

    #[tokio::test]
    async fn load_unknown_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.load(Ulid::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn load_active_skips_cancelled_history() {
        let store = MemoryStore::new();
        store.save(&booking(BookingStatus::Confirmed)).await.unwrap();
        store.save(&booking(BookingStatus::Pending)).await.unwrap();
        store.save(&booking(BookingStatus::Cancelled)).await.unwrap();
        assert_eq!(store.load_active().await.unwrap().len(), 2);
        assert_eq!(store.len(), 3); // history retained
    }
}
