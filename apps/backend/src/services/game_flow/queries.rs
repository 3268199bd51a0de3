use serde::Serialize;

use super::GameFlowService;
use crate::domain::action_log::ActionLog;
use crate::domain::snapshot::{snapshot, RoomSnapshot};
use crate::domain::state::UserId;
use crate::error::AppError;

/// The complete action log, for the host.
#[derive(Debug, Clone, Serialize)]
pub struct AuditView {
    pub room_id: String,
    pub version: i32,
    pub rounds: ActionLog,
}

impl GameFlowService {
    /// Room state as seen by `viewer`. Members only.
    pub async fn snapshot(&self, room_id: &str, viewer: UserId) -> Result<RoomSnapshot, AppError> {
        let agg = self.ctl.load(room_id).await?;
        Ok(snapshot(&agg, viewer)?)
    }

    pub async fn audit_log(&self, room_id: &str, actor: UserId) -> Result<AuditView, AppError> {
        let agg = self.ctl.load(room_id).await?;
        agg.require_host(actor)?;
        Ok(AuditView {
            room_id: agg.room.id,
            version: agg.version,
            rounds: agg.log,
        })
    }
}
