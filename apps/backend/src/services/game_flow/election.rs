use tracing::info;

use super::{GameFlowService, WriteOutcome};
use crate::domain::election::{cast_vote, declare_candidacy, process_results};
use crate::domain::phase::PhaseEvent;
use crate::domain::state::UserId;
use crate::error::AppError;

impl GameFlowService {
    pub async fn declare_candidacy(
        &self,
        room_id: &str,
        actor: UserId,
    ) -> Result<WriteOutcome, AppError> {
        let mut agg = self.ctl.load(room_id).await?;
        declare_candidacy(&mut agg, actor)?;
        let stored = self.ctl.commit(agg, None).await?;
        Ok(WriteOutcome::of(&stored))
    }

    pub async fn cast_vote(
        &self,
        room_id: &str,
        voter: UserId,
        candidate: UserId,
    ) -> Result<WriteOutcome, AppError> {
        let mut agg = self.ctl.load(room_id).await?;
        cast_vote(&mut agg, voter, candidate)?;
        let stored = self.ctl.commit(agg, None).await?;
        Ok(WriteOutcome::of(&stored))
    }

    /// Tally votes and apply the night's deaths in one write.
    ///
    /// Replaying this after it committed fails with `WRONG_PHASE`, so deaths
    /// are never applied twice.
    pub async fn process_election_results(
        &self,
        room_id: &str,
        actor: UserId,
    ) -> Result<WriteOutcome, AppError> {
        let mut agg = self.ctl.load(room_id).await?;
        let result = process_results(&mut agg, actor)?;
        let stored = self
            .ctl
            .commit(agg, Some(PhaseEvent::ResultsProcessed))
            .await?;
        info!(
            room_id,
            sheriff = ?result.sheriff,
            deaths = ?result.deaths,
            "election results processed"
        );
        Ok(WriteOutcome::of(&stored))
    }
}
