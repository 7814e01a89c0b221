use time::Date;
use ulid::Ulid;

use crate::directory::DirectoryError;
use crate::model::Minute;

#[derive(Debug)]
pub enum EngineError {
    /// Malformed interval: start at or past end, or end past the day boundary.
    InvalidRange { start: Minute, end: Minute },
    /// Requested date/time has already elapsed.
    PastDate(Date),
    /// Overlap detected; carries the conflicting booking's id.
    SlotUnavailable(Ulid),
    NotFound(Ulid),
    UnknownRoom(Ulid),
    /// Room cannot seat the attendee count; carries the room capacity.
    CapacityExceeded(u32),
    InvalidAttendees(u32),
    LimitExceeded(&'static str),
    /// Durable store failed after bounded retries; the reservation was rolled back.
    Persistence(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidRange { start, end } => {
                write!(f, "invalid interval [{start}, {end})")
            }
            EngineError::PastDate(date) => write!(f, "date already elapsed: {date}"),
            EngineError::SlotUnavailable(id) => {
                write!(f, "slot unavailable: conflicts with booking {id}")
            }
            EngineError::NotFound(id) => write!(f, "booking not found: {id}"),
            EngineError::UnknownRoom(id) => write!(f, "unknown room: {id}"),
            EngineError::CapacityExceeded(cap) => {
                write!(f, "room capacity {cap} exceeded")
            }
            EngineError::InvalidAttendees(n) => {
                write!(f, "attendee count must be at least 1, got {n}")
            }
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::Persistence(e) => write!(f, "persistence failure: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<DirectoryError> for EngineError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::UnknownRoom(id) => EngineError::UnknownRoom(id),
            DirectoryError::OverCapacity(cap) => EngineError::CapacityExceeded(cap),
        }
    }
}
