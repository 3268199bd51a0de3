//! Daytime progression after the election: leaving the results screen,
//! opening the day vote and ending the day.

use serde::{Deserialize, Serialize};

use crate::domain::phase::PhaseEvent;
use crate::domain::speech::default_order;
use crate::domain::state::{RoomAggregate, UserId};
use crate::errors::domain::{DomainError, ForbiddenKind};

/// How the host ends a day. Exile voting itself is decided outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOutcome {
    NextNight,
    Finish,
}

/// Leave `DayResultsAnnouncement`. With a badge holder the sheriff picks the
/// order next; without one discussion starts right away in default order.
pub fn proceed_from_results(
    agg: &mut RoomAggregate,
    actor: UserId,
) -> Result<PhaseEvent, DomainError> {
    agg.require_member(actor)?;
    if agg.room.police_badge_holder.is_some() {
        return Ok(PhaseEvent::ProceedWithSheriff);
    }
    default_order(agg);
    Ok(PhaseEvent::ProceedWithoutSheriff)
}

/// Host or sheriff closes the discussion.
pub fn start_vote(agg: &RoomAggregate, actor: UserId) -> Result<PhaseEvent, DomainError> {
    agg.require_member(actor)?;
    let is_sheriff = agg.room.police_badge_holder == Some(actor);
    if !agg.room.is_host(actor) && !is_sheriff {
        return Err(DomainError::forbidden(
            ForbiddenKind::NotHost,
            "Only the host or the sheriff can open the vote",
        ));
    }
    Ok(PhaseEvent::DiscussionEnded)
}

/// Host ends the day. A new night starts without a speaker order.
pub fn end_day(
    agg: &mut RoomAggregate,
    actor: UserId,
    outcome: DayOutcome,
) -> Result<PhaseEvent, DomainError> {
    agg.require_host(actor)?;
    match outcome {
        DayOutcome::NextNight => {
            agg.room.speaker_order.clear();
            agg.room.current_speaker = None;
            Ok(PhaseEvent::NightBegins)
        }
        DayOutcome::Finish => Ok(PhaseEvent::GameFinished),
    }
}
