use time::OffsetDateTime;
use tracing::{info, warn};

use super::{GameFlowService, WriteOutcome};
use crate::domain::lobby;
use crate::domain::phase::PhaseEvent;
use crate::domain::state::{Player, Room, RoomAggregate, RoomStatus, SettingsChoice, UserId};
use crate::domain::ActionLog;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::utils::invite_code::generate_invite_code;

const INVITE_CODE_ATTEMPTS: usize = 10;

fn new_room(host: UserId, settings: SettingsChoice, invite_code: String) -> RoomAggregate {
    let mut agg = RoomAggregate {
        room: Room {
            id: ulid::Ulid::new().to_string(),
            host_user_id: host,
            invite_code,
            settings,
            status: RoomStatus::Lobby,
            round_number: None,
            night_acting_role: None,
            police_badge_holder: None,
            speaker_order: Vec::new(),
            current_speaker: None,
            start_config: None,
            last_night_deaths: Vec::new(),
            rng_seed: rand::random(),
            created_at: OffsetDateTime::now_utc(),
            started_at: None,
        },
        players: Vec::new(),
        log: ActionLog::new(),
        version: 0,
    };
    agg.insert_player(Player::joined(host));
    agg
}

impl GameFlowService {
    /// Create a room in the lobby with `host` as its first (unseated) member.
    pub async fn create_room(
        &self,
        host: UserId,
        settings_choice: &str,
    ) -> Result<RoomAggregate, AppError> {
        let settings: SettingsChoice = settings_choice.parse().map_err(|()| {
            DomainError::validation(
                ValidationKind::InvalidInput,
                format!("Unknown settings choice '{settings_choice}' (expected A or B)"),
            )
        })?;

        for attempt in 1..=INVITE_CODE_ATTEMPTS {
            let agg = new_room(host, settings, generate_invite_code());
            match self.ctl.store().insert_room(agg).await {
                Ok(stored) => {
                    info!(room_id = %stored.room.id, host, settings = settings.as_str(), "room created");
                    return Ok(stored);
                }
                Err(DomainError::Conflict(ConflictKind::InviteCodeConflict, _)) => {
                    warn!(attempt, "invite code collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(DomainError::conflict(
            ConflictKind::InviteCodeConflict,
            "Could not allocate a unique invite code",
        )
        .into())
    }

    /// Join by invite code. Rejoining is a no-op that returns the current room.
    pub async fn join_room(
        &self,
        user_id: UserId,
        invite_code: &str,
    ) -> Result<RoomAggregate, AppError> {
        let code = lobby::normalize_invite_code(invite_code)?;
        let mut agg = self
            .ctl
            .store()
            .find_by_invite_code(&code)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::InviteCode, format!("No room with code {code}"))
            })?;

        if !lobby::join(&mut agg, user_id)? {
            return Ok(agg);
        }
        let stored = self.ctl.commit(agg, None).await?;
        info!(room_id = %stored.room.id, user_id, players = stored.players.len(), "player joined");
        Ok(stored)
    }

    pub async fn take_seat(
        &self,
        room_id: &str,
        user_id: UserId,
        seat: i64,
    ) -> Result<WriteOutcome, AppError> {
        let mut agg = self.ctl.load(room_id).await?;
        lobby::take_seat(&mut agg, user_id, seat)?;
        let stored = self.ctl.commit(agg, None).await?;
        Ok(WriteOutcome::of(&stored))
    }

    pub async fn set_ready(
        &self,
        room_id: &str,
        user_id: UserId,
        ready: bool,
    ) -> Result<WriteOutcome, AppError> {
        let mut agg = self.ctl.load(room_id).await?;
        lobby::set_ready(&mut agg, user_id, ready)?;
        let stored = self.ctl.commit(agg, None).await?;
        Ok(WriteOutcome::of(&stored))
    }

    pub async fn leave_room(&self, room_id: &str, user_id: UserId) -> Result<WriteOutcome, AppError> {
        let mut agg = self.ctl.load(room_id).await?;
        lobby::leave(&mut agg, user_id)?;
        let stored = self.ctl.commit(agg, None).await?;
        info!(room_id, user_id, "player left");
        Ok(WriteOutcome::of(&stored))
    }

    /// Host closes the room from any status.
    pub async fn close_room(&self, room_id: &str, actor: UserId) -> Result<WriteOutcome, AppError> {
        let agg = self.ctl.load(room_id).await?;
        agg.require_host(actor)?;
        let stored = self.ctl.commit(agg, Some(PhaseEvent::RoomClosed)).await?;
        Ok(WriteOutcome::of(&stored))
    }
}
