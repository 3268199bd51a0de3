//! Realtime fan-out: public room notices and addressed private payloads.

use async_trait::async_trait;

use crate::domain::state::{RoomStatus, RoundNo, UserId};

pub mod hub;
pub mod protocol;

pub use hub::RoomHub;
pub use protocol::ServerMsg;

/// One payload for exactly one player of one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressedMessage {
    pub room_id: String,
    pub user_id: UserId,
    pub msg: ServerMsg,
}

/// Delivery is best effort; callers log failures and never undo a commit because of them.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish_snapshot(
        &self,
        room_id: &str,
        version: i32,
        status: RoomStatus,
        round: RoundNo,
    ) -> Result<(), PublishError>;

    async fn send_private(&self, message: AddressedMessage) -> Result<(), PublishError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("no subscriber for {0}")]
    NoSubscriber(String),
}
