//! Messages pushed to room subscribers.

use serde::{Deserialize, Serialize};

use crate::domain::action_log::SeerVerdict;
use crate::domain::state::{RoomStatus, RoundNo, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// The room moved to a new version; subscribers refetch their snapshot.
    RoomState {
        room_id: String,
        version: i32,
        status: RoomStatus,
        round: RoundNo,
    },
    /// Private to the seer who asked.
    SeerResult {
        room_id: String,
        round: RoundNo,
        target: UserId,
        verdict: SeerVerdict,
        target_was_alive: bool,
    },
}

impl ServerMsg {
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMsg::RoomState { .. } => "room_state",
            ServerMsg::SeerResult { .. } => "seer_result",
        }
    }
}
