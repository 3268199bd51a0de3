//! Row <-> aggregate conversion for the rooms_sea adapter.
//!
//! Decoding failures mean the stored data is not something this service
//! wrote; they surface as `Infra(DataCorruption)`.

use sea_orm::{NotSet, Set};
use time::OffsetDateTime;

use crate::domain::action_log::{RoundLog, SeerCheck, SeerVerdict, WitchAction};
use crate::domain::state::{
    NightRole, Player, Role, Room, RoomStatus, RoundNo, Seat, SettingsChoice, StartConfig, UserId,
};
use crate::entities::{room_players, rooms, round_logs};
use crate::errors::domain::{DomainError, InfraErrorKind};

fn corrupt(detail: impl Into<String>) -> DomainError {
    DomainError::infra(InfraErrorKind::DataCorruption, detail)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, DomainError> {
    serde_json::to_string(value).map_err(|e| corrupt(format!("encode failed: {e}")))
}

fn from_json<T: serde::de::DeserializeOwned>(column: &str, raw: &str) -> Result<T, DomainError> {
    serde_json::from_str(raw).map_err(|e| corrupt(format!("bad {column} json: {e}")))
}

pub fn status_to_db(status: RoomStatus) -> rooms::RoomStatus {
    use rooms::RoomStatus as Db;
    match status {
        RoomStatus::Lobby => Db::Lobby,
        RoomStatus::Dealing => Db::Dealing,
        RoomStatus::NightWolf => Db::NightWolf,
        RoomStatus::NightSeer => Db::NightSeer,
        RoomStatus::NightWitch => Db::NightWitch,
        RoomStatus::NightFinished => Db::NightFinished,
        RoomStatus::PoliceElection => Db::PoliceElection,
        RoomStatus::DayResultsAnnouncement => Db::DayResultsAnnouncement,
        RoomStatus::SheriffSetsSpeechOrder => Db::SheriffSetsSpeechOrder,
        RoomStatus::DayDiscussion => Db::DayDiscussion,
        RoomStatus::DayVote => Db::DayVote,
        RoomStatus::Finished => Db::Finished,
        RoomStatus::Closed => Db::Closed,
    }
}

pub fn status_from_db(status: rooms::RoomStatus) -> RoomStatus {
    use rooms::RoomStatus as Db;
    match status {
        Db::Lobby => RoomStatus::Lobby,
        Db::Dealing => RoomStatus::Dealing,
        Db::NightWolf => RoomStatus::NightWolf,
        Db::NightSeer => RoomStatus::NightSeer,
        Db::NightWitch => RoomStatus::NightWitch,
        Db::NightFinished => RoomStatus::NightFinished,
        Db::PoliceElection => RoomStatus::PoliceElection,
        Db::DayResultsAnnouncement => RoomStatus::DayResultsAnnouncement,
        Db::SheriffSetsSpeechOrder => RoomStatus::SheriffSetsSpeechOrder,
        Db::DayDiscussion => RoomStatus::DayDiscussion,
        Db::DayVote => RoomStatus::DayVote,
        Db::Finished => RoomStatus::Finished,
        Db::Closed => RoomStatus::Closed,
    }
}

fn role_to_db(role: Role) -> room_players::PlayerRole {
    use room_players::PlayerRole as Db;
    match role {
        Role::Wolf => Db::Wolf,
        Role::Seer => Db::Seer,
        Role::Witch => Db::Witch,
        Role::Hunter => Db::Hunter,
        Role::Villager => Db::Villager,
    }
}

fn role_from_db(role: room_players::PlayerRole) -> Role {
    use room_players::PlayerRole as Db;
    match role {
        Db::Wolf => Role::Wolf,
        Db::Seer => Role::Seer,
        Db::Witch => Role::Witch,
        Db::Hunter => Role::Hunter,
        Db::Villager => Role::Villager,
    }
}

fn night_role_from_db(raw: &str) -> Result<NightRole, DomainError> {
    match raw.parse::<Role>()? {
        Role::Wolf => Ok(NightRole::Wolf),
        Role::Seer => Ok(NightRole::Seer),
        Role::Witch => Ok(NightRole::Witch),
        other => Err(corrupt(format!("{} never acts at night", other.as_str()))),
    }
}

fn round_to_db(round: RoundNo) -> Result<i16, DomainError> {
    i16::try_from(round).map_err(|_| corrupt(format!("round {round} out of range")))
}

fn round_from_db(round: i16) -> Result<RoundNo, DomainError> {
    RoundNo::try_from(round).map_err(|_| corrupt(format!("negative round {round}")))
}

fn seat_from_db(seat: i16) -> Result<Seat, DomainError> {
    Seat::try_from(seat).map_err(|_| corrupt(format!("seat {seat} out of range")))
}

/// Full active model for `room`. Callers unset the columns they must not write.
pub fn room_active(
    room: &Room,
    updated_at: OffsetDateTime,
) -> Result<rooms::ActiveModel, DomainError> {
    Ok(rooms::ActiveModel {
        id: Set(room.id.clone()),
        host_user_id: Set(room.host_user_id),
        invite_code: Set(room.invite_code.clone()),
        settings_choice: Set(room.settings.as_str().to_string()),
        status: Set(status_to_db(room.status)),
        round_number: Set(room.round_number.map(round_to_db).transpose()?),
        night_acting_role: Set(room
            .night_acting_role
            .map(|r| r.role().as_str().to_string())),
        police_badge_holder: Set(room.police_badge_holder),
        speaker_order: Set(to_json(&room.speaker_order)?),
        current_speaker: Set(room.current_speaker),
        start_config: Set(room.start_config.as_ref().map(to_json).transpose()?),
        last_night_deaths: Set(to_json(&room.last_night_deaths)?),
        rng_seed: Set(room.rng_seed),
        created_at: Set(room.created_at),
        updated_at: Set(updated_at),
        started_at: Set(room.started_at),
        lock_version: NotSet,
    })
}

pub fn room_from_row(row: rooms::Model) -> Result<Room, DomainError> {
    let settings: SettingsChoice = row
        .settings_choice
        .parse()
        .map_err(|()| corrupt(format!("unknown settings choice '{}'", row.settings_choice)))?;
    let start_config: Option<StartConfig> = row
        .start_config
        .as_deref()
        .map(|raw| from_json("start_config", raw))
        .transpose()?;

    Ok(Room {
        settings,
        status: status_from_db(row.status),
        round_number: row.round_number.map(round_from_db).transpose()?,
        night_acting_role: row
            .night_acting_role
            .as_deref()
            .map(night_role_from_db)
            .transpose()?,
        police_badge_holder: row.police_badge_holder,
        speaker_order: from_json("speaker_order", &row.speaker_order)?,
        current_speaker: row.current_speaker,
        start_config,
        last_night_deaths: from_json("last_night_deaths", &row.last_night_deaths)?,
        rng_seed: row.rng_seed,
        created_at: row.created_at,
        started_at: row.started_at,
        id: row.id,
        host_user_id: row.host_user_id,
        invite_code: row.invite_code,
    })
}

pub fn player_active(
    room_id: &str,
    player: &Player,
    joined_at: OffsetDateTime,
) -> room_players::ActiveModel {
    room_players::ActiveModel {
        room_id: Set(room_id.to_string()),
        user_id: Set(player.user_id),
        seat_number: Set(player.seat_number.map(i16::from)),
        is_ready: Set(player.is_ready),
        role: Set(player.role.map(role_to_db)),
        is_alive: Set(player.is_alive),
        has_used_witch_save: Set(player.has_used_witch_save),
        has_used_witch_poison: Set(player.has_used_witch_poison),
        is_candidate_for_sheriff: Set(player.is_candidate_for_sheriff),
        voted_for_sheriff_candidate: Set(player.voted_for_sheriff_candidate),
        joined_at: Set(joined_at),
    }
}

pub fn player_from_row(row: room_players::Model) -> Result<Player, DomainError> {
    Ok(Player {
        user_id: row.user_id,
        seat_number: row.seat_number.map(seat_from_db).transpose()?,
        is_ready: row.is_ready,
        role: row.role.map(role_from_db),
        is_alive: row.is_alive,
        has_used_witch_save: row.has_used_witch_save,
        has_used_witch_poison: row.has_used_witch_poison,
        is_candidate_for_sheriff: row.is_candidate_for_sheriff,
        voted_for_sheriff_candidate: row.voted_for_sheriff_candidate,
    })
}

pub fn round_log_active(
    room_id: &str,
    round: RoundNo,
    log: &RoundLog,
) -> Result<round_logs::ActiveModel, DomainError> {
    let (witch_action, witch_target) = match log.witch_action {
        Some(WitchAction::Save(t)) => (Some("save"), Some(t)),
        Some(WitchAction::Poison(t)) => (Some("poison"), Some(t)),
        Some(WitchAction::Skip) => (Some("skip"), None),
        None => (None, None),
    };
    let check = log.seer_check.as_ref();

    Ok(round_logs::ActiveModel {
        room_id: Set(room_id.to_string()),
        round_no: Set(round_to_db(round)?),
        wolf_kill_target: Set(log.wolf_kill_target),
        witch_action: Set(witch_action.map(str::to_string)),
        witch_target: Set(witch_target),
        seer_id: Set(check.map(|c| c.seer)),
        seer_target: Set(check.map(|c| c.target)),
        seer_result: Set(check.map(|c| c.result.as_str().to_string())),
        seer_target_was_alive: Set(check.map(|c| c.target_was_alive)),
    })
}

fn witch_from_row(
    action: Option<&str>,
    target: Option<UserId>,
) -> Result<Option<WitchAction>, DomainError> {
    match (action, target) {
        (None, _) => Ok(None),
        (Some("skip"), _) => Ok(Some(WitchAction::Skip)),
        (Some("save"), Some(t)) => Ok(Some(WitchAction::Save(t))),
        (Some("poison"), Some(t)) => Ok(Some(WitchAction::Poison(t))),
        (Some(other), _) => Err(corrupt(format!("bad witch action '{other}'"))),
    }
}

fn seer_from_row(row: &round_logs::Model) -> Result<Option<SeerCheck>, DomainError> {
    let (Some(seer), Some(target), Some(result)) =
        (row.seer_id, row.seer_target, row.seer_result.as_deref())
    else {
        return Ok(None);
    };
    let result = match result {
        "wolf" => SeerVerdict::Wolf,
        "good" => SeerVerdict::Good,
        other => return Err(corrupt(format!("bad seer verdict '{other}'"))),
    };
    Ok(Some(SeerCheck {
        seer,
        target,
        result,
        target_was_alive: row.seer_target_was_alive.unwrap_or(true),
    }))
}

pub fn round_log_from_row(row: round_logs::Model) -> Result<(RoundNo, RoundLog), DomainError> {
    let log = RoundLog {
        wolf_kill_target: row.wolf_kill_target,
        witch_action: witch_from_row(row.witch_action.as_deref(), row.witch_target)?,
        seer_check: seer_from_row(&row)?,
    };
    Ok((round_from_db(row.round_no)?, log))
}
