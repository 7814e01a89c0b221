//! roomlock — a meeting-room booking conflict engine.
//!
//! Decides whether a proposed reservation may be created without overlapping
//! an existing one, serialized per room, and enumerates free/busy intervals
//! for a room on a given day. Transport, auth, and room CRUD live elsewhere;
//! the engine talks to them through the [`store`] and [`directory`] seams.

pub mod directory;
pub mod engine;
pub mod limits;
pub mod model;
pub mod notify;
pub mod observability;
pub mod store;

pub use directory::{DirectoryError, OpenDirectory, RoomDirectory, StaticDirectory};
pub use engine::{AdmissionPolicy, Engine, EngineError};
pub use model::{Booking, BookingRequest, BookingStatus, Minute, Ms, RoomSchedule, TimeInterval};
pub use notify::{NotifyHub, ScheduleEvent};
pub use store::{BookingStore, MemoryStore, StoreError};
