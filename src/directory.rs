use async_trait::async_trait;
use dashmap::DashMap;
use ulid::Ulid;

/// Failure from the room-metadata collaborator.
#[derive(Debug)]
pub enum DirectoryError {
    UnknownRoom(Ulid),
    /// The room cannot seat the requested attendee count; carries the capacity.
    OverCapacity(u32),
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryError::UnknownRoom(id) => write!(f, "unknown room: {id}"),
            DirectoryError::OverCapacity(cap) => write!(f, "room capacity {cap} exceeded"),
        }
    }
}

impl std::error::Error for DirectoryError {}

/// Room-metadata collaborator. The engine holds no room metadata itself;
/// existence and capacity checks are delegated here.
#[async_trait]
pub trait RoomDirectory: Send + Sync {
    async fn validate(&self, room_id: Ulid, attendees: u32) -> Result<(), DirectoryError>;
}

/// Accepts any room id — for embedders that validate rooms elsewhere.
pub struct OpenDirectory;

#[async_trait]
impl RoomDirectory for OpenDirectory {
    async fn validate(&self, _room_id: Ulid, _attendees: u32) -> Result<(), DirectoryError> {
        Ok(())
    }
}

/// Fixed room table with optional per-room capacities.
#[derive(Default)]
pub struct StaticDirectory {
    rooms: DashMap<Ulid, Option<u32>>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_room(&self, room_id: Ulid, capacity: Option<u32>) {
        self.rooms.insert(room_id, capacity);
    }
}

#[async_trait]
impl RoomDirectory for StaticDirectory {
    async fn validate(&self, room_id: Ulid, attendees: u32) -> Result<(), DirectoryError> {
        match self.rooms.get(&room_id) {
            None => Err(DirectoryError::UnknownRoom(room_id)),
            Some(entry) => match *entry.value() {
                Some(capacity) if attendees > capacity => {
                    Err(DirectoryError::OverCapacity(capacity))
                }
                _ => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_directory_accepts_everything() {
        assert!(OpenDirectory.validate(Ulid::new(), 500).await.is_ok());
    }

    #[tokio::test]
    async fn static_directory_rejects_unknown_rooms() {
        let dir = StaticDirectory::new();
        let result = dir.validate(Ulid::new(), 1).await;
        assert!(matches!(result, Err(DirectoryError::UnknownRoom(_))));
    }

    #[tokio::test]
    async fn static_directory_enforces_capacity() {
        let dir = StaticDirectory::new();
        let room = Ulid::new();
        dir.add_room(room, Some(8));
        assert!(dir.validate(room, 8).await.is_ok());
        assert!(matches!(
            dir.validate(room, 9).await,
            Err(DirectoryError::OverCapacity(8))
        ));
    }

    #[tokio::test]
    async fn room_without_capacity_accepts_any_headcount() {
        let dir = StaticDirectory::new();
        let room = Ulid::new();
        dir.add_room(room, None);
        assert!(dir.validate(room, 1000).await.is_ok());
    }
}
