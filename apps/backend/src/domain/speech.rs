//! Circular speech order around the table.

use serde::{Deserialize, Serialize};

use crate::domain::state::{RoomAggregate, RoomStatus, UserId};
use crate::errors::domain::{DomainError, ForbiddenKind, InfraErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

/// Rotate `ring` so it starts at index `start` and walks in `direction`,
/// visiting every element exactly once.
pub fn rotate<T: Copy>(ring: &[T], start: usize, direction: Direction) -> Vec<T> {
    let n = ring.len();
    (0..n)
        .map(|step| {
            let idx = match direction {
                Direction::Clockwise => (start + step) % n,
                Direction::CounterClockwise => (start + n - step % n) % n,
            };
            ring[idx]
        })
        .collect()
}

/// Alive players by ascending seat, starting from the sheriff.
pub fn speech_order(
    agg: &RoomAggregate,
    sheriff: UserId,
    direction: Direction,
) -> Result<Vec<UserId>, DomainError> {
    let ring: Vec<UserId> = agg.alive_by_seat().iter().map(|p| p.user_id).collect();
    let start = ring.iter().position(|&id| id == sheriff).ok_or_else(|| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("Badge holder {sheriff} is not among the alive players"),
        )
    })?;
    Ok(rotate(&ring, start, direction))
}

/// Sheriff chooses the direction; the order and first speaker are written to the room.
pub fn set_speech_order(
    agg: &mut RoomAggregate,
    actor: UserId,
    direction: Direction,
) -> Result<Vec<UserId>, DomainError> {
    agg.require_member(actor)?;
    if agg.room.police_badge_holder != Some(actor) {
        return Err(DomainError::forbidden(
            ForbiddenKind::NotSheriff,
            "Only the sheriff can set the speech order",
        ));
    }
    if agg.status() != RoomStatus::SheriffSetsSpeechOrder {
        return Err(DomainError::wrong_phase(format!(
            "Speech order cannot be set while the room is {}",
            agg.status()
        )));
    }

    let order = speech_order(agg, actor, direction)?;
    apply_order(agg, order.clone());
    Ok(order)
}

/// Without a sheriff, discussion runs clockwise from the lowest alive seat.
pub fn default_order(agg: &mut RoomAggregate) -> Vec<UserId> {
    let ring: Vec<UserId> = agg.alive_by_seat().iter().map(|p| p.user_id).collect();
    apply_order(agg, ring.clone());
    ring
}

fn apply_order(agg: &mut RoomAggregate, order: Vec<UserId>) {
    agg.room.current_speaker = order.first().copied();
    agg.room.speaker_order = order;
}
