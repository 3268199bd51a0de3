//! Room status state machine.
//!
//! The transition table is the single authority on which status follows which.
//! Components validate their own business rules and hand back a `PhaseEvent`;
//! `advance` applies it to the room together with the status-owned fields
//! (round counter and night acting role).

use crate::domain::state::{Room, RoomStatus};
use crate::errors::domain::DomainError;

/// Events that move a room from one status to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// Host claimed the room for dealing.
    BeginDealing,
    /// Roles are assigned; the first night begins.
    RolesDealt,
    /// Dealing failed; release the claim.
    DealingAborted,
    /// Wolf faction chose a target, or the wolf turn was skipped.
    WolfTargetChosen,
    /// Seer looked at a player, or the seer turn was skipped.
    SeerChecked,
    /// Witch saved, poisoned, or passed.
    WitchActed,
    /// Night is over; a new election cycle opens.
    ElectionOpened,
    /// Election tallied and night deaths applied.
    ResultsProcessed,
    ProceedWithSheriff,
    ProceedWithoutSheriff,
    SpeechOrderSet,
    DiscussionEnded,
    NightBegins,
    GameFinished,
    RoomClosed,
}

/// Pure transition table. Rejects any event whose source status does not match.
pub fn next_status(from: RoomStatus, event: PhaseEvent) -> Result<RoomStatus, DomainError> {
    use PhaseEvent as E;
    use RoomStatus as S;

    let to = match (from, event) {
        (S::Lobby, E::BeginDealing) => S::Dealing,
        (S::Dealing, E::RolesDealt) => S::NightWolf,
        (S::Dealing, E::DealingAborted) => S::Lobby,
        (S::NightWolf, E::WolfTargetChosen) => S::NightSeer,
        (S::NightSeer, E::SeerChecked) => S::NightWitch,
        (S::NightWitch, E::WitchActed) => S::NightFinished,
        (S::NightFinished, E::ElectionOpened) => S::PoliceElection,
        (S::PoliceElection, E::ResultsProcessed) => S::DayResultsAnnouncement,
        (S::DayResultsAnnouncement, E::ProceedWithSheriff) => S::SheriffSetsSpeechOrder,
        (S::DayResultsAnnouncement, E::ProceedWithoutSheriff) => S::DayDiscussion,
        (S::SheriffSetsSpeechOrder, E::SpeechOrderSet) => S::DayDiscussion,
        (S::DayDiscussion, E::DiscussionEnded) => S::DayVote,
        (S::DayVote, E::NightBegins) => S::NightWolf,
        (S::DayVote, E::GameFinished) => S::Finished,
        (from, E::RoomClosed) if from != S::Closed => S::Closed,
        (from, event) => {
            return Err(DomainError::wrong_phase(format!(
                "{event:?} is not valid while the room is {from}"
            )))
        }
    };
    Ok(to)
}

/// Apply `event` to the room: status, night acting role and round counter.
///
/// The round counter starts at 1 when roles are dealt and increments once per
/// cycle, when a day discussion begins.
pub fn advance(room: &mut Room, event: PhaseEvent) -> Result<RoomStatus, DomainError> {
    let to = next_status(room.status, event)?;

    match event {
        PhaseEvent::RolesDealt => room.round_number = Some(1),
        PhaseEvent::SpeechOrderSet | PhaseEvent::ProceedWithoutSheriff => {
            room.round_number = Some(room.round() + 1);
        }
        PhaseEvent::DealingAborted => room.round_number = None,
        _ => {}
    }

    room.status = to;
    room.night_acting_role = to.night_role();
    Ok(to)
}
