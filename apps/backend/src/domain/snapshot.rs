//! Viewer-scoped snapshots of a room.
//!
//! The public part is identical for every member. Private information (own
//! role, potions, seer history, fellow wolves, tonight's victim for the witch)
//! only appears in the viewer's own `ViewerState`.

use serde::{Deserialize, Serialize};

use crate::domain::action_log::SeerCheck;
use crate::domain::state::{
    NightRole, Role, RoomAggregate, RoomStatus, RoundNo, Seat, UserId,
};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPublic {
    pub user_id: UserId,
    pub seat_number: Option<Seat>,
    pub is_ready: bool,
    pub is_alive: bool,
    pub is_candidate_for_sheriff: bool,
    pub has_voted: bool,
    /// Only filled once the game is over.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomPublic {
    pub room_id: String,
    pub invite_code: String,
    pub host_user_id: UserId,
    pub status: RoomStatus,
    pub round: Option<RoundNo>,
    pub night_acting_role: Option<NightRole>,
    pub police_badge_holder: Option<UserId>,
    pub speaker_order: Vec<UserId>,
    pub current_speaker: Option<UserId>,
    pub last_night_deaths: Vec<UserId>,
    pub version: i32,
    pub players: Vec<PlayerPublic>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerState {
    pub user_id: UserId,
    pub role: Option<Role>,
    pub is_alive: bool,
    pub has_used_witch_save: bool,
    pub has_used_witch_poison: bool,
    pub voted_for: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wolf_target_tonight: Option<UserId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fellow_wolves: Vec<UserId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub seer_checks: Vec<(RoundNo, SeerCheck)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub room: RoomPublic,
    pub viewer: ViewerState,
}

pub fn public_view(agg: &RoomAggregate) -> RoomPublic {
    let reveal = agg.status().is_terminal();
    let mut players: Vec<PlayerPublic> = agg
        .players
        .iter()
        .map(|p| PlayerPublic {
            user_id: p.user_id,
            seat_number: p.seat_number,
            is_ready: p.is_ready,
            is_alive: p.is_alive,
            is_candidate_for_sheriff: p.is_candidate_for_sheriff,
            has_voted: p.voted_for_sheriff_candidate.is_some(),
            role: if reveal { p.role } else { None },
        })
        .collect();
    players.sort_by_key(|p| (p.seat_number.is_none(), p.seat_number, p.user_id));

    let room = &agg.room;
    RoomPublic {
        room_id: room.id.clone(),
        invite_code: room.invite_code.clone(),
        host_user_id: room.host_user_id,
        status: room.status,
        round: room.round_number,
        night_acting_role: room.night_acting_role,
        police_badge_holder: room.police_badge_holder,
        speaker_order: room.speaker_order.clone(),
        current_speaker: room.current_speaker,
        last_night_deaths: room.last_night_deaths.clone(),
        version: agg.version,
        players,
    }
}

pub fn viewer_state(agg: &RoomAggregate, viewer: UserId) -> Result<ViewerState, DomainError> {
    let me = agg.require_member(viewer)?;
    let mut state = ViewerState {
        user_id: viewer,
        role: me.role,
        is_alive: me.is_alive,
        has_used_witch_save: me.has_used_witch_save,
        has_used_witch_poison: me.has_used_witch_poison,
        voted_for: me.voted_for_sheriff_candidate,
        ..ViewerState::default()
    };

    match me.role {
        Some(Role::Wolf) => {
            state.fellow_wolves = agg
                .players
                .iter()
                .filter(|p| p.user_id != viewer && p.has_role(Role::Wolf))
                .map(|p| p.user_id)
                .collect();
        }
        Some(Role::Seer) => {
            state.seer_checks = agg
                .log
                .rounds()
                .filter_map(|(round, log)| log.seer_check.map(|c| (round, c)))
                .filter(|(_, c)| c.seer == viewer)
                .collect();
        }
        Some(Role::Witch) if agg.status() == RoomStatus::NightWitch => {
            state.wolf_target_tonight = agg
                .log
                .get(agg.room.round())
                .and_then(|r| r.wolf_kill_target);
        }
        _ => {}
    }

    Ok(state)
}

/// Public view plus the viewer's private state. Members only.
pub fn snapshot(agg: &RoomAggregate, viewer: UserId) -> Result<RoomSnapshot, DomainError> {
    Ok(RoomSnapshot {
        viewer: viewer_state(agg, viewer)?,
        room: public_view(agg),
    })
}
