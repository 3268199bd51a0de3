//! Lobby bookkeeping before a game starts: joining, seats, ready flags, leaving.

use crate::domain::state::{Player, RoomAggregate, RoomStatus, Seat, UserId, ROOM_SIZE};
use crate::errors::domain::{ConflictKind, DomainError, ForbiddenKind, ValidationKind};

/// Length of a room invite code.
pub const INVITE_CODE_LEN: usize = 6;

fn require_lobby(agg: &RoomAggregate) -> Result<(), DomainError> {
    if agg.status() != RoomStatus::Lobby {
        return Err(DomainError::wrong_phase(format!(
            "Room {} is no longer in the lobby (status {})",
            agg.room.id,
            agg.status()
        )));
    }
    Ok(())
}

/// Upper-case `raw` and check it looks like an invite code.
pub fn normalize_invite_code(raw: &str) -> Result<String, DomainError> {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() != INVITE_CODE_LEN || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DomainError::validation(
            ValidationKind::InvalidInput,
            format!("Invite codes are {INVITE_CODE_LEN} letters or digits"),
        ));
    }
    Ok(code)
}

/// Add `user_id` to the room. Returns `false` when they were already a member.
pub fn join(agg: &mut RoomAggregate, user_id: UserId) -> Result<bool, DomainError> {
    if agg.player(user_id).is_some() {
        return Ok(false);
    }
    require_lobby(agg)?;
    if agg.players.len() >= ROOM_SIZE {
        return Err(DomainError::conflict(
            ConflictKind::RoomFull,
            format!("Room {} already has {ROOM_SIZE} players", agg.room.id),
        ));
    }
    agg.insert_player(Player::joined(user_id));
    Ok(true)
}

/// Take (or move to) `seat`. Moving clears the ready flag.
pub fn take_seat(agg: &mut RoomAggregate, user_id: UserId, seat: i64) -> Result<(), DomainError> {
    agg.require_member(user_id)?;
    require_lobby(agg)?;

    let seat = Seat::try_from(seat)
        .ok()
        .filter(|s| (1..=ROOM_SIZE as Seat).contains(s))
        .ok_or_else(|| {
            DomainError::validation(
                ValidationKind::InvalidSeat,
                format!("Seat {seat} is outside 1..={ROOM_SIZE}"),
            )
        })?;

    let holder = agg
        .players
        .iter()
        .find(|p| p.seat_number == Some(seat))
        .map(|p| p.user_id);
    match holder {
        Some(holder) if holder == user_id => return Ok(()),
        Some(_) => {
            return Err(DomainError::conflict(
                ConflictKind::SeatTaken,
                format!("Seat {seat} is taken"),
            ))
        }
        None => {}
    }

    if let Some(player) = agg.player_mut(user_id) {
        player.seat_number = Some(seat);
        player.is_ready = false;
    }
    Ok(())
}

pub fn set_ready(agg: &mut RoomAggregate, user_id: UserId, ready: bool) -> Result<(), DomainError> {
    let seated = agg.require_member(user_id)?.seat_number.is_some();
    require_lobby(agg)?;
    if ready && !seated {
        return Err(DomainError::validation(
            ValidationKind::NotAllSeated,
            "Take a seat before marking ready",
        ));
    }
    if let Some(player) = agg.player_mut(user_id) {
        player.is_ready = ready;
    }
    Ok(())
}

/// Leave before the game starts. The host closes the room instead.
pub fn leave(agg: &mut RoomAggregate, user_id: UserId) -> Result<(), DomainError> {
    agg.require_member(user_id)?;
    require_lobby(agg)?;
    if agg.room.is_host(user_id) {
        return Err(DomainError::forbidden(
            ForbiddenKind::NotHost,
            "The host cannot leave; close the room instead",
        ));
    }
    agg.players.retain(|p| p.user_id != user_id);
    Ok(())
}
