//! Room repository: the transactional record store behind the phase controller.

use async_trait::async_trait;

use crate::domain::state::RoomAggregate;
use crate::errors::domain::{DomainError, NotFoundKind};

/// Aggregate store with compare-and-set semantics keyed by room id.
///
/// Every write covers the room row, all of its players and all of its round
/// logs at once. Implementations must be all-or-nothing.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Persist a brand-new room. The aggregate's version is ignored; the stored
    /// room starts at version 1.
    ///
    /// Fails with `Conflict(InviteCodeConflict)` when the invite code is taken.
    async fn insert_room(&self, room: RoomAggregate) -> Result<RoomAggregate, DomainError>;

    async fn find_room(&self, room_id: &str) -> Result<Option<RoomAggregate>, DomainError>;

    async fn find_by_invite_code(
        &self,
        invite_code: &str,
    ) -> Result<Option<RoomAggregate>, DomainError>;

    /// Replace the stored aggregate with `next` if its version still equals
    /// `expected_version`. Returns the stored aggregate with the bumped version.
    ///
    /// Version mismatch yields `Conflict(StaleState)`; a missing room yields
    /// `NotFound(Room)`.
    async fn compare_and_set(
        &self,
        expected_version: i32,
        next: RoomAggregate,
    ) -> Result<RoomAggregate, DomainError>;
}

/// Load a room or fail with `NotFound(Room)`.
pub async fn require_room(
    store: &dyn RoomStore,
    room_id: &str,
) -> Result<RoomAggregate, DomainError> {
    store.find_room(room_id).await?.ok_or_else(|| {
        DomainError::not_found(
            NotFoundKind::Room,
            format!("Room {room_id} not found"),
        )
    })
}
