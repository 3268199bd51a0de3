//! Sheriff election: candidacy, voting, tally and the joint death resolution.

use std::collections::BTreeMap;

use crate::domain::state::{RoomAggregate, RoomStatus, UserId};
use crate::errors::domain::{ConflictKind, DomainError, ForbiddenKind, ValidationKind};

fn require_election(agg: &RoomAggregate) -> Result<(), DomainError> {
    if agg.status() != RoomStatus::PoliceElection {
        return Err(DomainError::wrong_phase(format!(
            "No election is running (room is {})",
            agg.status()
        )));
    }
    Ok(())
}

pub fn declare_candidacy(agg: &mut RoomAggregate, actor: UserId) -> Result<(), DomainError> {
    let player = agg.require_alive_member(actor)?;
    if player.is_candidate_for_sheriff {
        return Err(DomainError::forbidden(
            ForbiddenKind::AlreadyCandidate,
            format!("Player {actor} is already running for sheriff"),
        ));
    }
    require_election(agg)?;

    if let Some(player) = agg.player_mut(actor) {
        player.is_candidate_for_sheriff = true;
    }
    Ok(())
}

pub fn cast_vote(
    agg: &mut RoomAggregate,
    voter: UserId,
    candidate: UserId,
) -> Result<(), DomainError> {
    let player = agg.require_alive_member(voter)?;
    let already_voted = player.voted_for_sheriff_candidate.is_some();
    require_election(agg)?;

    if already_voted {
        return Err(DomainError::conflict(
            ConflictKind::AlreadyVoted,
            format!("Player {voter} has already voted"),
        ));
    }

    let eligible = agg
        .player(candidate)
        .is_some_and(|c| c.is_alive && c.is_candidate_for_sheriff);
    if !eligible {
        return Err(DomainError::validation(
            ValidationKind::InvalidCandidate,
            format!("Player {candidate} is not an alive declared candidate"),
        ));
    }

    if let Some(player) = agg.player_mut(voter) {
        player.voted_for_sheriff_candidate = Some(candidate);
    }
    Ok(())
}

/// Votes per candidate, counting only currently alive voters.
pub fn tally(agg: &RoomAggregate) -> BTreeMap<UserId, u32> {
    let mut counts = BTreeMap::new();
    for voter in agg.players.iter().filter(|p| p.is_alive) {
        if let Some(candidate) = voter.voted_for_sheriff_candidate {
            *counts.entry(candidate).or_insert(0) += 1;
        }
    }
    counts
}

/// Winner of a tally: the unique strict maximum.
///
/// A tie at the maximum, or no votes at all, elects nobody.
pub fn elect(counts: &BTreeMap<UserId, u32>) -> Option<UserId> {
    let max = counts.values().copied().max().filter(|&m| m > 0)?;
    let mut leaders = counts.iter().filter(|&(_, &n)| n == max).map(|(&id, _)| id);
    let winner = leaders.next()?;
    match leaders.next() {
        Some(_) => None,
        None => Some(winner),
    }
}

/// What `process_results` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectionResult {
    pub sheriff: Option<UserId>,
    pub deaths: Vec<UserId>,
}

/// Tally the election and apply the just-completed night's deaths.
///
/// The tally is taken before deaths are applied. A badge holder who dies
/// tonight loses the badge, so the holder is always null or alive.
pub fn process_results(
    agg: &mut RoomAggregate,
    actor: UserId,
) -> Result<ElectionResult, DomainError> {
    agg.require_member(actor)?;
    require_election(agg)?;

    let sheriff = elect(&tally(agg));
    let deaths = agg
        .log
        .get(agg.room.round())
        .map(|r| r.deaths())
        .unwrap_or_default();

    for player in &mut agg.players {
        if deaths.contains(&player.user_id) {
            player.is_alive = false;
        }
    }

    agg.room.last_night_deaths = deaths.clone();
    agg.room.police_badge_holder = sheriff.filter(|id| !deaths.contains(id));

    Ok(ElectionResult {
        sheriff: agg.room.police_badge_holder,
        deaths,
    })
}
