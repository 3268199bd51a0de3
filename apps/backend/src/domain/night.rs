//! Night action resolver: wolf, seer and witch sub-phases.
//!
//! Every submission is validated the same way: the actor must be an alive
//! member holding the sub-phase's role, and the room must be in the matching
//! night status. On success the action is recorded in the current round's
//! log and the event to commit is returned.

use serde::{Deserialize, Serialize};

use crate::domain::action_log::{SeerCheck, SeerVerdict, WitchAction};
use crate::domain::phase::PhaseEvent;
use crate::domain::state::{
    NightRole, Player, Role, RoomAggregate, RoomStatus, RoundNo, StartConfig, UserId,
};
use crate::errors::domain::{
    ConflictKind, DomainError, ForbiddenKind, InfraErrorKind, ValidationKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WolfOutcome {
    /// First accepted submission of the round; the phase advances.
    Recorded { target: UserId },
    /// The faction already decided this round; nothing changes.
    AlreadyRecorded,
}

/// Witch request as submitted by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum WitchCommand {
    Save,
    Poison(UserId),
    Skip,
}

fn require_night_actor(
    agg: &RoomAggregate,
    actor: UserId,
    role: NightRole,
) -> Result<&Player, DomainError> {
    let player = agg.require_alive_member(actor)?;
    if !player.has_role(role.role()) {
        return Err(DomainError::forbidden(
            ForbiddenKind::WrongRole,
            format!("Only the {role:?} may act in this sub-phase"),
        ));
    }
    Ok(player)
}

fn require_status(agg: &RoomAggregate, status: RoomStatus) -> Result<(), DomainError> {
    if agg.status() != status {
        return Err(DomainError::wrong_phase(format!(
            "Expected room to be {status}, it is {}",
            agg.status()
        )));
    }
    Ok(())
}

fn current_round(agg: &RoomAggregate) -> Result<RoundNo, DomainError> {
    agg.room.round_number.ok_or_else(|| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("Room {} is in a night phase without a round", agg.room.id),
        )
    })
}

/// Record the wolf faction's target. First valid submission wins.
pub fn submit_wolf_target(
    agg: &mut RoomAggregate,
    actor: UserId,
    target: UserId,
) -> Result<WolfOutcome, DomainError> {
    if !matches!(
        agg.status(),
        RoomStatus::NightWolf | RoomStatus::NightSeer | RoomStatus::NightWitch
    ) {
        return Err(DomainError::wrong_phase(format!(
            "Wolves cannot act while the room is {}",
            agg.status()
        )));
    }
    require_night_actor(agg, actor, NightRole::Wolf)?;
    let round = current_round(agg)?;

    match agg.status() {
        RoomStatus::NightWolf => {}
        RoomStatus::NightSeer | RoomStatus::NightWitch
            if agg
                .log
                .get(round)
                .is_some_and(|r| r.wolf_kill_target.is_some()) =>
        {
            return Ok(WolfOutcome::AlreadyRecorded);
        }
        other => {
            return Err(DomainError::wrong_phase(format!(
                "Wolves cannot act while the room is {other}"
            )))
        }
    }

    let victim = agg.require_player(target)?;
    if !victim.is_alive {
        return Err(DomainError::validation(
            ValidationKind::InvalidTarget,
            format!("Player {target} is already dead"),
        ));
    }

    let entry = agg.log.entry(round);
    if entry.wolf_kill_target.is_some() {
        return Ok(WolfOutcome::AlreadyRecorded);
    }
    entry.wolf_kill_target = Some(target);
    Ok(WolfOutcome::Recorded { target })
}

/// Check another player's true role. Dead targets are allowed.
pub fn submit_seer_check(
    agg: &mut RoomAggregate,
    actor: UserId,
    target: UserId,
) -> Result<SeerCheck, DomainError> {
    require_status(agg, RoomStatus::NightSeer)?;
    require_night_actor(agg, actor, NightRole::Seer)?;
    let round = current_round(agg)?;

    if target == actor {
        return Err(DomainError::validation(
            ValidationKind::SelfTarget,
            "The seer cannot check herself",
        ));
    }
    let subject = agg.require_player(target)?;
    let result = if subject.has_role(Role::Wolf) {
        SeerVerdict::Wolf
    } else {
        SeerVerdict::Good
    };
    let check = SeerCheck {
        seer: actor,
        target,
        result,
        target_was_alive: subject.is_alive,
    };

    agg.log.entry(round).seer_check = Some(check);
    Ok(check)
}

/// Apply one witch action. Save always targets the recorded wolf target.
///
/// `config` is the room's frozen start config; a started room without one is
/// corrupt, but that is only reported once the phase and actor are valid.
pub fn submit_witch_action(
    agg: &mut RoomAggregate,
    actor: UserId,
    command: WitchCommand,
    config: Option<StartConfig>,
) -> Result<WitchAction, DomainError> {
    require_status(agg, RoomStatus::NightWitch)?;
    let witch = require_night_actor(agg, actor, NightRole::Witch)?.clone();
    let round = current_round(agg)?;
    let config = config.ok_or_else(|| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("Room {} has no start config", agg.room.id),
        )
    })?;
    let log = agg.log.get(round).cloned().unwrap_or_default();

    let action = match command {
        WitchCommand::Save => {
            if witch.has_used_witch_save {
                return Err(DomainError::conflict(
                    ConflictKind::AlreadyUsedSave,
                    "The save potion has already been used",
                ));
            }
            let target = log.wolf_kill_target.ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::NoWolfTarget,
                    "Nobody was attacked tonight",
                )
            })?;
            if round == 1 && target == actor && !config.witch_can_self_save_first_night {
                return Err(DomainError::validation(
                    ValidationKind::SelfSaveForbidden,
                    "The witch may not save herself on the first night",
                ));
            }
            WitchAction::Save(target)
        }
        WitchCommand::Poison(target) => {
            if witch.has_used_witch_poison {
                return Err(DomainError::conflict(
                    ConflictKind::AlreadyUsedPoison,
                    "The poison has already been used",
                ));
            }
            if log.saved().is_some() {
                return Err(DomainError::validation(
                    ValidationKind::SaveAndPoison,
                    "Save and poison cannot both be used in one night",
                ));
            }
            if target == actor {
                return Err(DomainError::validation(
                    ValidationKind::SelfTarget,
                    "The witch cannot poison herself",
                ));
            }
            if !agg.require_player(target)?.is_alive {
                return Err(DomainError::validation(
                    ValidationKind::InvalidTarget,
                    format!("Player {target} is already dead"),
                ));
            }
            WitchAction::Poison(target)
        }
        WitchCommand::Skip => WitchAction::Skip,
    };

    if let Some(witch) = agg.player_mut(actor) {
        match action {
            WitchAction::Save(_) => witch.has_used_witch_save = true,
            WitchAction::Poison(_) => witch.has_used_witch_poison = true,
            WitchAction::Skip => {}
        }
    }
    agg.log.entry(round).witch_action = Some(action);
    Ok(action)
}

/// Default action for a stalled night sub-phase.
///
/// Wolves kill nobody, the seer checks nobody, the witch skips, and a finished
/// night opens the election.
pub fn skip_stalled(agg: &mut RoomAggregate) -> Result<PhaseEvent, DomainError> {
    match agg.status() {
        RoomStatus::NightWolf => Ok(PhaseEvent::WolfTargetChosen),
        RoomStatus::NightSeer => Ok(PhaseEvent::SeerChecked),
        RoomStatus::NightWitch => {
            let round = current_round(agg)?;
            agg.log.entry(round).witch_action = Some(WitchAction::Skip);
            Ok(PhaseEvent::WitchActed)
        }
        RoomStatus::NightFinished => {
            open_election(agg);
            Ok(PhaseEvent::ElectionOpened)
        }
        other => Err(DomainError::wrong_phase(format!(
            "Nothing to skip while the room is {other}"
        ))),
    }
}

/// Start a fresh election cycle: clear every candidacy and vote.
pub fn open_election(agg: &mut RoomAggregate) {
    for player in &mut agg.players {
        player.is_candidate_for_sheriff = false;
        player.voted_for_sheriff_candidate = None;
    }
}
