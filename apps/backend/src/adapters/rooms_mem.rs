//! In-process [`RoomStore`], used when no database is configured and by service tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::state::RoomAggregate;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::repos::rooms::RoomStore;

#[derive(Debug, Default)]
pub struct MemoryRoomStore {
    rooms: Mutex<HashMap<String, RoomAggregate>>,
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn insert_room(&self, mut agg: RoomAggregate) -> Result<RoomAggregate, DomainError> {
        let mut rooms = self.rooms.lock();
        if rooms
            .values()
            .any(|r| r.room.invite_code == agg.room.invite_code)
        {
            return Err(DomainError::conflict(
                ConflictKind::InviteCodeConflict,
                "Invite code already in use",
            ));
        }
        agg.version = 1;
        rooms.insert(agg.room.id.clone(), agg.clone());
        Ok(agg)
    }

    async fn find_room(&self, room_id: &str) -> Result<Option<RoomAggregate>, DomainError> {
        Ok(self.rooms.lock().get(room_id).cloned())
    }

    async fn find_by_invite_code(
        &self,
        invite_code: &str,
    ) -> Result<Option<RoomAggregate>, DomainError> {
        Ok(self
            .rooms
            .lock()
            .values()
            .find(|r| r.room.invite_code == invite_code)
            .cloned())
    }

    async fn compare_and_set(
        &self,
        expected_version: i32,
        mut next: RoomAggregate,
    ) -> Result<RoomAggregate, DomainError> {
        let mut rooms = self.rooms.lock();
        let current = rooms.get_mut(&next.room.id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Room, format!("Room {} not found", next.room.id))
        })?;
        if current.version != expected_version {
            return Err(DomainError::stale_state(expected_version, current.version));
        }
        next.version = expected_version + 1;
        *current = next.clone();
        Ok(next)
    }
}
