use super::{GameFlowService, WriteOutcome};
use crate::domain::day::{self, DayOutcome};
use crate::domain::phase::PhaseEvent;
use crate::domain::speech::{set_speech_order, Direction};
use crate::domain::state::UserId;
use crate::error::AppError;

impl GameFlowService {
    pub async fn proceed_from_results(
        &self,
        room_id: &str,
        actor: UserId,
    ) -> Result<WriteOutcome, AppError> {
        let mut agg = self.ctl.load(room_id).await?;
        let event = day::proceed_from_results(&mut agg, actor)?;
        let stored = self.ctl.commit(agg, Some(event)).await?;
        Ok(WriteOutcome::of(&stored))
    }

    pub async fn set_speech_order(
        &self,
        room_id: &str,
        actor: UserId,
        direction: Direction,
    ) -> Result<WriteOutcome, AppError> {
        let mut agg = self.ctl.load(room_id).await?;
        set_speech_order(&mut agg, actor, direction)?;
        let stored = self
            .ctl
            .commit(agg, Some(PhaseEvent::SpeechOrderSet))
            .await?;
        Ok(WriteOutcome::of(&stored))
    }

    pub async fn start_day_vote(
        &self,
        room_id: &str,
        actor: UserId,
    ) -> Result<WriteOutcome, AppError> {
        let agg = self.ctl.load(room_id).await?;
        let event = day::start_vote(&agg, actor)?;
        let stored = self.ctl.commit(agg, Some(event)).await?;
        Ok(WriteOutcome::of(&stored))
    }

    pub async fn end_day(
        &self,
        room_id: &str,
        actor: UserId,
        outcome: DayOutcome,
    ) -> Result<WriteOutcome, AppError> {
        let mut agg = self.ctl.load(room_id).await?;
        let event = day::end_day(&mut agg, actor, outcome)?;
        let stored = self.ctl.commit(agg, Some(event)).await?;
        Ok(WriteOutcome::of(&stored))
    }
}
