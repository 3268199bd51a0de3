use time::OffsetDateTime;
use tracing::{error, info};

use super::{GameFlowService, WriteOutcome};
use crate::domain::dealing::{assign_roles, check_start, derive_dealing_seed};
use crate::domain::phase::PhaseEvent;
use crate::domain::state::{RoomAggregate, UserId};
use crate::error::AppError;

impl GameFlowService {
    /// Deal roles and enter the first night.
    ///
    /// `Lobby -> Dealing` claims the room so concurrent starts lose, then the
    /// dealt aggregate commits `Dealing -> NightWolf`. If that second write
    /// fails the room is put back in the lobby.
    pub async fn start_game(&self, room_id: &str, actor: UserId) -> Result<WriteOutcome, AppError> {
        let agg = self.ctl.load(room_id).await?;
        check_start(&agg, actor)?;

        let seed = derive_dealing_seed(agg.room.rng_seed, agg.version);
        let config = agg.room.settings.start_config();
        let claimed = self.ctl.commit(agg, Some(PhaseEvent::BeginDealing)).await?;

        let mut dealt = claimed.clone();
        assign_roles(&mut dealt, seed, config);
        dealt.room.started_at = Some(OffsetDateTime::now_utc());

        match self.ctl.commit(dealt, Some(PhaseEvent::RolesDealt)).await {
            Ok(stored) => {
                info!(room_id, players = stored.players.len(), "game started");
                Ok(WriteOutcome::of(&stored))
            }
            Err(e) => {
                self.abort_dealing(claimed).await;
                Err(e)
            }
        }
    }

    async fn abort_dealing(&self, claimed: RoomAggregate) {
        let room_id = claimed.room.id.clone();
        match self.ctl.commit(claimed, Some(PhaseEvent::DealingAborted)).await {
            Ok(_) => info!(room_id = %room_id, "dealing aborted, room back in lobby"),
            Err(e) => error!(room_id = %room_id, error = %e, "dealing abort failed; room left in dealing"),
        }
    }
}
