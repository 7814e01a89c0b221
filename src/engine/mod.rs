mod admission;
mod conflict;
mod error;
mod queries;
mod slots;
mod transition;

pub use error::EngineError;
pub use slots::free_slots;

use std::sync::Arc;

use dashmap::DashMap;
use time::Date;
use tokio::sync::{RwLock, broadcast};
use ulid::Ulid;

use crate::directory::RoomDirectory;
use crate::limits::PERSIST_ATTEMPTS;
use crate::model::{Booking, BookingStatus, RoomSchedule};
use crate::notify::{NotifyHub, ScheduleEvent};
use crate::observability;
use crate::store::BookingStore;

pub type SharedRoomSchedule = Arc<RwLock<RoomSchedule>>;

/// How a freshly admitted booking enters the status machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdmissionPolicy {
    /// No approval step: bookings are created Confirmed.
    #[default]
    Immediate,
    /// An external approval workflow confirms later: bookings are created Pending.
    RequireApproval,
}

/// The booking conflict engine. Admission and cancellation for one room are
/// serialized on that room's lock; rooms never contend with each other.
pub struct Engine {
    rooms: DashMap<Ulid, SharedRoomSchedule>,
    /// Reverse lookup: booking id → its (room, date) bucket.
    booking_index: DashMap<Ulid, (Ulid, Date)>,
    store: Arc<dyn BookingStore>,
    directory: Arc<dyn RoomDirectory>,
    notify: Arc<NotifyHub>,
    policy: AdmissionPolicy,
}

impl Engine {
    pub fn new(store: Arc<dyn BookingStore>, directory: Arc<dyn RoomDirectory>) -> Self {
        Self {
            rooms: DashMap::new(),
            booking_index: DashMap::new(),
            store,
            directory,
            notify: Arc::new(NotifyHub::new()),
            policy: AdmissionPolicy::Immediate,
        }
    }

    pub fn with_policy(mut self, policy: AdmissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Construct the engine and seed its schedules from the durable store's
    /// active set. Runs once at service startup.
    pub async fn load(
        store: Arc<dyn BookingStore>,
        directory: Arc<dyn RoomDirectory>,
    ) -> Result<Self, EngineError> {
        let active = store
            .load_active()
            .await
            .map_err(|e| EngineError::Persistence(e.to_string()))?;
        let engine = Self::new(store, directory);
        for booking in active {
            if booking.status == BookingStatus::Cancelled {
                continue;
            }
            let rs = engine.room_schedule(booking.room_id);
            // Sole owner during startup, so try_write never contends.
            let mut guard = rs.try_write().expect("startup population: uncontended write");
            engine
                .booking_index
                .insert(booking.id, (booking.room_id, booking.interval.date));
            guard.insert(booking);
        }
        tracing::info!(rooms = engine.rooms.len(), "engine populated from store");
        Ok(engine)
    }

    /// Fetch or create the room's schedule lock — the arena-of-locks entry,
    /// created on first use.
    pub(super) fn room_schedule(&self, room_id: Ulid) -> SharedRoomSchedule {
        self.rooms
            .entry(room_id)
            .or_insert_with(|| {
                metrics::gauge!(observability::ROOMS_ACTIVE).increment(1.0);
                Arc::new(RwLock::new(RoomSchedule::new(room_id)))
            })
            .value()
            .clone()
    }

    pub(super) fn existing_room_schedule(&self, room_id: &Ulid) -> Option<SharedRoomSchedule> {
        self.rooms.get(room_id).map(|e| e.value().clone())
    }

    /// Which (room, date) bucket a booking lives in, if it is active.
    pub fn lookup(&self, id: &Ulid) -> Option<(Ulid, Date)> {
        self.booking_index.get(id).map(|e| *e.value())
    }

    /// Subscribe to schedule change events for a room.
    pub fn subscribe(&self, room_id: Ulid) -> broadcast::Receiver<ScheduleEvent> {
        self.notify.subscribe(room_id)
    }

    pub(super) fn publish(&self, room_id: Ulid, event: ScheduleEvent) {
        self.notify.send(room_id, &event);
    }

    /// Save to the durable store with bounded retries.
    pub(super) async fn save_with_retry(&self, booking: &Booking) -> Result<(), EngineError> {
        let mut last_err = None;
        for attempt in 1..=PERSIST_ATTEMPTS {
            match self.store.save(booking).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(booking = %booking.id, attempt, "store save failed: {e}");
                    if attempt < PERSIST_ATTEMPTS {
                        metrics::counter!(observability::STORE_RETRIES_TOTAL).increment(1);
                    }
                    last_err = Some(e);
                }
            }
        }
        Err(EngineError::Persistence(
            last_err
                .map(|e| e.to_string())
                .unwrap_or_else(|| "store unavailable".into()),
        ))
    }
}
