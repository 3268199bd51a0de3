use tracing::{debug, info};

use super::{GameFlowService, PrivateResult, WriteOutcome};
use crate::domain::night::{
    submit_seer_check, submit_witch_action, submit_wolf_target, WitchCommand, WolfOutcome,
};
use crate::domain::phase::PhaseEvent;
use crate::domain::state::UserId;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::realtime::{AddressedMessage, ServerMsg};

impl GameFlowService {
    /// Record the wolves' target. Later submissions for the same round are
    /// accepted without effect; a lost race is re-evaluated once.
    pub async fn submit_wolf_target(
        &self,
        room_id: &str,
        actor: UserId,
        target: UserId,
    ) -> Result<WriteOutcome, AppError> {
        let mut retried = false;
        loop {
            let mut agg = self.ctl.load(room_id).await?;
            match submit_wolf_target(&mut agg, actor, target)? {
                WolfOutcome::AlreadyRecorded => {
                    debug!(room_id, actor, "wolf target already recorded");
                    return Ok(WriteOutcome::of(&agg));
                }
                WolfOutcome::Recorded { .. } => {}
            }
            match self.ctl.commit(agg, Some(PhaseEvent::WolfTargetChosen)).await {
                Ok(stored) => return Ok(WriteOutcome::of(&stored)),
                Err(e) if e.code() == ErrorCode::StaleState && !retried => retried = true,
                Err(e) => return Err(e),
            }
        }
    }

    /// Seer checks a player; the verdict goes only to the seer.
    pub async fn submit_seer_check(
        &self,
        room_id: &str,
        actor: UserId,
        target: UserId,
    ) -> Result<WriteOutcome, AppError> {
        let mut agg = self.ctl.load(room_id).await?;
        let check = submit_seer_check(&mut agg, actor, target)?;
        let stored = self.ctl.commit(agg, Some(PhaseEvent::SeerChecked)).await?;

        self.ctl
            .send_private(AddressedMessage {
                room_id: room_id.to_string(),
                user_id: actor,
                msg: ServerMsg::SeerResult {
                    room_id: room_id.to_string(),
                    round: stored.room.round(),
                    target: check.target,
                    verdict: check.result,
                    target_was_alive: check.target_was_alive,
                },
            })
            .await;

        Ok(WriteOutcome::of(&stored).with_private(PrivateResult::SeerCheck {
            target: check.target,
            verdict: check.result,
            target_was_alive: check.target_was_alive,
        }))
    }

    /// Witch acts, the night ends, and the election opens (best effort).
    pub async fn submit_witch_action(
        &self,
        room_id: &str,
        actor: UserId,
        command: WitchCommand,
    ) -> Result<WriteOutcome, AppError> {
        let mut agg = self.ctl.load(room_id).await?;
        let config = agg.room.start_config;
        let action = submit_witch_action(&mut agg, actor, command, config)?;
        let night_over = self.ctl.commit(agg, Some(PhaseEvent::WitchActed)).await?;
        info!(room_id, ?action, "witch acted");

        let stored = self.ctl.finish_night(night_over).await;
        Ok(WriteOutcome::of(&stored))
    }

    /// Host moves a stalled night phase along with its default action.
    pub async fn force_skip(&self, room_id: &str, actor: UserId) -> Result<WriteOutcome, AppError> {
        let agg = self.ctl.load(room_id).await?;
        agg.require_host(actor)?;
        let stored = self.ctl.skip_phase(agg).await?;
        Ok(WriteOutcome::of(&stored))
    }
}
