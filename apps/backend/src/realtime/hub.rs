//! In-process broadcast hub keyed by room and by (room, player).

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use super::{AddressedMessage, PublishError, Publisher, ServerMsg};
use crate::domain::state::{RoomStatus, RoundNo, UserId};

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Default)]
pub struct RoomHub {
    rooms: DashMap<String, broadcast::Sender<ServerMsg>>,
    players: DashMap<(String, UserId), broadcast::Sender<ServerMsg>>,
}

impl RoomHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Public notices for `room_id`.
    pub fn subscribe_room(&self, room_id: &str) -> broadcast::Receiver<ServerMsg> {
        self.rooms
            .entry(room_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Messages addressed to `user_id` in `room_id`.
    pub fn subscribe_player(&self, room_id: &str, user_id: UserId) -> broadcast::Receiver<ServerMsg> {
        self.players
            .entry((room_id.to_string(), user_id))
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Both feeds of one member, released from the registry when dropped.
    pub fn subscribe(self: &Arc<Self>, room_id: &str, user_id: UserId) -> RoomSubscription {
        let receivers = (
            self.subscribe_room(room_id),
            self.subscribe_player(room_id, user_id),
        );
        RoomSubscription {
            hub: Arc::clone(self),
            room_id: room_id.to_string(),
            user_id,
            receivers: Some(receivers),
        }
    }

    /// Forget the room channel if nobody listens any more.
    pub fn unsubscribe_room(&self, room_id: &str) {
        self.rooms
            .remove_if(room_id, |_, tx| tx.receiver_count() == 0);
    }

    /// Forget the player channel if nobody listens any more.
    pub fn unsubscribe_player(&self, room_id: &str, user_id: UserId) {
        self.players
            .remove_if(&(room_id.to_string(), user_id), |_, tx| tx.receiver_count() == 0);
    }

    fn send_room(&self, room_id: &str, msg: ServerMsg) -> Result<(), PublishError> {
        let Some(tx) = self.rooms.get(room_id) else {
            return Err(PublishError::NoSubscriber(room_id.to_string()));
        };
        if tx.send(msg).is_err() {
            drop(tx);
            // A subscriber may have joined since the send; only drop an idle channel.
            self.unsubscribe_room(room_id);
            return Err(PublishError::NoSubscriber(room_id.to_string()));
        }
        Ok(())
    }
}

/// A member's live feed: room notices plus messages addressed to them.
#[derive(Debug)]
pub struct RoomSubscription {
    hub: Arc<RoomHub>,
    room_id: String,
    user_id: UserId,
    // `None` only while dropping.
    receivers: Option<(broadcast::Receiver<ServerMsg>, broadcast::Receiver<ServerMsg>)>,
}

impl RoomSubscription {
    /// Next message from either feed.
    pub async fn recv(&mut self) -> Result<ServerMsg, RecvError> {
        let Some((room_rx, private_rx)) = self.receivers.as_mut() else {
            return Err(RecvError::Closed);
        };
        tokio::select! {
            msg = room_rx.recv() => msg,
            msg = private_rx.recv() => msg,
        }
    }
}

impl Drop for RoomSubscription {
    fn drop(&mut self) {
        // Receivers must go first so the channels read as idle.
        self.receivers = None;
        self.hub.unsubscribe_room(&self.room_id);
        self.hub.unsubscribe_player(&self.room_id, self.user_id);
        debug!(room_id = %self.room_id, user_id = self.user_id, "subscription released");
    }
}

#[async_trait]
impl Publisher for RoomHub {
    async fn publish_snapshot(
        &self,
        room_id: &str,
        version: i32,
        status: RoomStatus,
        round: RoundNo,
    ) -> Result<(), PublishError> {
        let msg = ServerMsg::RoomState {
            room_id: room_id.to_string(),
            version,
            status,
            round,
        };
        self.send_room(room_id, msg)
    }

    async fn send_private(&self, message: AddressedMessage) -> Result<(), PublishError> {
        let key = (message.room_id, message.user_id);
        let Some(tx) = self.players.get(&key) else {
            return Err(PublishError::NoSubscriber(format!("{}/{}", key.0, key.1)));
        };
        debug!(room_id = %key.0, user_id = key.1, kind = message.msg.kind(), "addressed message");
        if tx.send(message.msg).is_err() {
            drop(tx);
            self.players
                .remove_if(&key, |_, tx| tx.receiver_count() == 0);
            return Err(PublishError::NoSubscriber(format!("{}/{}", key.0, key.1)));
        }
        Ok(())
    }
}
