//! Role assignment at game start.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::domain::state::{Role, RoomAggregate, RoomStatus, StartConfig, UserId, ROOM_SIZE};
use crate::errors::domain::{DomainError, ValidationKind};

/// Fixed role multiset dealt into every nine-player room.
pub const ROLE_DECK: [Role; ROOM_SIZE] = [
    Role::Wolf,
    Role::Wolf,
    Role::Wolf,
    Role::Seer,
    Role::Witch,
    Role::Hunter,
    Role::Villager,
    Role::Villager,
    Role::Villager,
];

/// Derive the dealing seed from the room's stored seed and the lock version
/// the start attempt observed, so a retried start after an abort deals anew.
pub fn derive_dealing_seed(room_seed: i64, version: i32) -> u64 {
    (room_seed as u64)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(version as u64)
}

/// Uniform permutation of the role deck (Fisher-Yates via `SliceRandom::shuffle`).
pub fn shuffled_roles(seed: u64) -> [Role; ROOM_SIZE] {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut roles = ROLE_DECK;
    roles.shuffle(&mut rng);
    roles
}

/// Check everything a start needs: host actor, Lobby, nine players, all seated
/// on distinct seats, all ready.
pub fn check_start(agg: &RoomAggregate, actor: UserId) -> Result<(), DomainError> {
    agg.require_host(actor)?;

    if agg.status() != RoomStatus::Lobby {
        return Err(DomainError::wrong_phase(format!(
            "Game can only start from the lobby (room is {})",
            agg.status()
        )));
    }

    if agg.players.len() != ROOM_SIZE {
        return Err(DomainError::validation(
            ValidationKind::WrongPlayerCount,
            format!(
                "A game needs exactly {ROOM_SIZE} players, room has {}",
                agg.players.len()
            ),
        ));
    }

    let mut seats = HashSet::with_capacity(ROOM_SIZE);
    for player in &agg.players {
        match player.seat_number {
            Some(seat) if (1..=ROOM_SIZE as u8).contains(&seat) => {
                if !seats.insert(seat) {
                    return Err(DomainError::validation(
                        ValidationKind::InvalidSeat,
                        format!("Seat {seat} is held by more than one player"),
                    ));
                }
            }
            _ => {
                return Err(DomainError::validation(
                    ValidationKind::NotAllSeated,
                    format!("Player {} has not taken a seat", player.user_id),
                ))
            }
        }
    }

    if let Some(player) = agg.players.iter().find(|p| !p.is_ready) {
        return Err(DomainError::validation(
            ValidationKind::NotAllReady,
            format!("Player {} is not ready", player.user_id),
        ));
    }

    Ok(())
}

/// Deal roles and reset every per-game field.
///
/// Slot `i` of the shuffled deck goes to the `i`-th player by ascending user
/// id, which keeps the assignment independent of seat numbers.
pub fn assign_roles(agg: &mut RoomAggregate, seed: u64, config: StartConfig) {
    let roles = shuffled_roles(seed);

    agg.players.sort_by_key(|p| p.user_id);
    for (player, role) in agg.players.iter_mut().zip(roles) {
        player.role = Some(role);
        player.is_alive = true;
        player.has_used_witch_save = false;
        player.has_used_witch_poison = false;
        player.is_candidate_for_sheriff = false;
        player.voted_for_sheriff_candidate = None;
    }

    let room = &mut agg.room;
    room.start_config = Some(config);
    room.police_badge_holder = None;
    room.speaker_order.clear();
    room.current_speaker = None;
    room.last_night_deaths.clear();
    agg.log.clear();
}
