use crate::domain::action_log::{SeerVerdict, WitchAction};
use crate::domain::night::{
    skip_stalled, submit_seer_check, submit_witch_action, submit_wolf_target, WitchCommand,
    WolfOutcome,
};
use crate::domain::phase::PhaseEvent;
use crate::domain::state::{RoomStatus, SettingsChoice};
use crate::domain::test_state_helpers::{
    kill, ready_lobby, started_room, with_status, HOST, HUNTER, SEER, VILLAGER, WITCH, WOLF,
    WOLF_2,
};
use crate::errors::domain::{
    ConflictKind, DomainError, ForbiddenKind, InfraErrorKind, ValidationKind,
};

fn witch_turn(settings: SettingsChoice, wolf_target: Option<i64>) -> crate::domain::RoomAggregate {
    let mut agg = with_status(started_room(settings), RoomStatus::NightWitch);
    agg.log.entry(1).wolf_kill_target = wolf_target;
    agg
}

#[test]
fn wolf_first_submission_wins() {
    let mut agg = started_room(SettingsChoice::A);
    let out = submit_wolf_target(&mut agg, WOLF, VILLAGER).unwrap();
    assert_eq!(out, WolfOutcome::Recorded { target: VILLAGER });

    // The commit moves the room on; a second wolf arriving late is a no-op.
    agg = with_status(agg, RoomStatus::NightSeer);
    let out = submit_wolf_target(&mut agg, WOLF_2, HUNTER).unwrap();
    assert_eq!(out, WolfOutcome::AlreadyRecorded);
    assert_eq!(agg.log.get(1).unwrap().wolf_kill_target, Some(VILLAGER));
}

#[test]
fn wolf_after_skipped_turn_is_wrong_phase() {
    let mut agg = with_status(started_room(SettingsChoice::A), RoomStatus::NightSeer);
    let err = submit_wolf_target(&mut agg, WOLF, VILLAGER).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::WrongPhase, _)));
}

#[test]
fn wolf_cannot_target_the_dead() {
    let mut agg = started_room(SettingsChoice::A);
    kill(&mut agg, VILLAGER);
    let err = submit_wolf_target(&mut agg, WOLF, VILLAGER).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::InvalidTarget, _)));
}

#[test]
fn non_wolf_is_forbidden() {
    let mut agg = started_room(SettingsChoice::A);
    let err = submit_wolf_target(&mut agg, SEER, VILLAGER).unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(ForbiddenKind::WrongRole, _)));
}

#[test]
fn dead_actor_is_forbidden_in_every_sub_phase() {
    let mut agg = started_room(SettingsChoice::A);
    kill(&mut agg, WOLF);
    kill(&mut agg, SEER);
    kill(&mut agg, WITCH);

    let err = submit_wolf_target(&mut agg, WOLF, VILLAGER).unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(ForbiddenKind::Dead, _)));

    let mut agg = with_status(agg, RoomStatus::NightSeer);
    let err = submit_seer_check(&mut agg, SEER, WOLF_2).unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(ForbiddenKind::Dead, _)));

    let mut agg = with_status(agg, RoomStatus::NightWitch);
    let config = Some(SettingsChoice::A.start_config());
    let err = submit_witch_action(&mut agg, WITCH, WitchCommand::Skip, config).unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(ForbiddenKind::Dead, _)));
}

#[test]
fn seer_reads_true_role_of_dead_player() {
    let mut agg = with_status(started_room(SettingsChoice::A), RoomStatus::NightSeer);
    kill(&mut agg, WOLF_2);

    let check = submit_seer_check(&mut agg, SEER, WOLF_2).unwrap();
    assert_eq!(check.result, SeerVerdict::Wolf);
    assert!(!check.target_was_alive);
    assert_eq!(agg.log.get(1).unwrap().seer_check, Some(check));
}

#[test]
fn seer_sees_good_for_villagers() {
    let mut agg = with_status(started_room(SettingsChoice::A), RoomStatus::NightSeer);
    let check = submit_seer_check(&mut agg, SEER, HUNTER).unwrap();
    assert_eq!(check.result, SeerVerdict::Good);
    assert!(check.target_was_alive);
}

#[test]
fn seer_cannot_check_herself() {
    let mut agg = with_status(started_room(SettingsChoice::A), RoomStatus::NightSeer);
    let err = submit_seer_check(&mut agg, SEER, SEER).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::SelfTarget, _)));
}

#[test]
fn save_targets_wolf_victim_and_spends_potion() {
    let mut agg = witch_turn(SettingsChoice::A, Some(VILLAGER));
    let config = Some(SettingsChoice::A.start_config());
    let action = submit_witch_action(&mut agg, WITCH, WitchCommand::Save, config).unwrap();
    assert_eq!(action, WitchAction::Save(VILLAGER));
    assert!(agg.player(WITCH).unwrap().has_used_witch_save);
    assert!(agg.log.get(1).unwrap().deaths().is_empty());
}

#[test]
fn save_needs_a_wolf_target() {
    let mut agg = witch_turn(SettingsChoice::A, None);
    let config = Some(SettingsChoice::A.start_config());
    let err = submit_witch_action(&mut agg, WITCH, WitchCommand::Save, config).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::NoWolfTarget, _)));
}

#[test]
fn save_only_once_per_game() {
    let mut agg = witch_turn(SettingsChoice::A, Some(VILLAGER));
    agg.player_mut(WITCH).unwrap().has_used_witch_save = true;
    let config = Some(SettingsChoice::A.start_config());
    let err = submit_witch_action(&mut agg, WITCH, WitchCommand::Save, config).unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::AlreadyUsedSave, _)));
}

#[test]
fn first_night_self_save_follows_settings() {
    let mut agg = witch_turn(SettingsChoice::A, Some(WITCH));
    let err = submit_witch_action(
        &mut agg,
        WITCH,
        WitchCommand::Save,
        Some(SettingsChoice::A.start_config()),
    )
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::SelfSaveForbidden, _)));
    assert!(!agg.player(WITCH).unwrap().has_used_witch_save);

    let mut agg = witch_turn(SettingsChoice::B, Some(WITCH));
    let action = submit_witch_action(
        &mut agg,
        WITCH,
        WitchCommand::Save,
        Some(SettingsChoice::B.start_config()),
    )
    .unwrap();
    assert_eq!(action, WitchAction::Save(WITCH));
}

#[test]
fn self_save_allowed_after_first_night() {
    let mut agg = witch_turn(SettingsChoice::A, None);
    agg.room.round_number = Some(2);
    agg.log.entry(2).wolf_kill_target = Some(WITCH);
    let action = submit_witch_action(
        &mut agg,
        WITCH,
        WitchCommand::Save,
        Some(SettingsChoice::A.start_config()),
    )
    .unwrap();
    assert_eq!(action, WitchAction::Save(WITCH));
}

#[test]
fn poison_rules() {
    let config = Some(SettingsChoice::A.start_config());

    let mut agg = witch_turn(SettingsChoice::A, Some(VILLAGER));
    let err =
        submit_witch_action(&mut agg, WITCH, WitchCommand::Poison(WITCH), config).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::SelfTarget, _)));

    kill(&mut agg, HUNTER);
    let err =
        submit_witch_action(&mut agg, WITCH, WitchCommand::Poison(HUNTER), config).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::InvalidTarget, _)));

    agg.log.entry(1).witch_action = Some(WitchAction::Save(VILLAGER));
    let err =
        submit_witch_action(&mut agg, WITCH, WitchCommand::Poison(WOLF), config).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::SaveAndPoison, _)));

    let mut agg = witch_turn(SettingsChoice::A, Some(VILLAGER));
    agg.player_mut(WITCH).unwrap().has_used_witch_poison = true;
    let err =
        submit_witch_action(&mut agg, WITCH, WitchCommand::Poison(WOLF), config).unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::AlreadyUsedPoison, _)));
}

#[test]
fn poison_kills_alongside_wolf_victim() {
    let mut agg = witch_turn(SettingsChoice::A, Some(VILLAGER));
    let config = Some(SettingsChoice::A.start_config());
    submit_witch_action(&mut agg, WITCH, WitchCommand::Poison(WOLF), config).unwrap();
    assert!(agg.player(WITCH).unwrap().has_used_witch_poison);
    assert_eq!(agg.log.get(1).unwrap().deaths(), vec![WOLF, VILLAGER]);
}

#[test]
fn skip_always_succeeds() {
    let mut agg = witch_turn(SettingsChoice::A, None);
    agg.player_mut(WITCH).unwrap().has_used_witch_save = true;
    agg.player_mut(WITCH).unwrap().has_used_witch_poison = true;
    let action = submit_witch_action(
        &mut agg,
        WITCH,
        WitchCommand::Skip,
        Some(SettingsChoice::A.start_config()),
    )
    .unwrap();
    assert_eq!(action, WitchAction::Skip);
}

#[test]
fn witch_in_wrong_phase() {
    let mut agg = started_room(SettingsChoice::A);
    let err = submit_witch_action(
        &mut agg,
        WITCH,
        WitchCommand::Skip,
        Some(SettingsChoice::A.start_config()),
    )
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::WrongPhase, _)));
}

#[test]
fn stalled_sub_phases_have_defaults() {
    let mut agg = started_room(SettingsChoice::A);
    assert_eq!(skip_stalled(&mut agg).unwrap(), PhaseEvent::WolfTargetChosen);
    assert!(agg.log.get(1).is_none());

    let mut agg = with_status(agg, RoomStatus::NightWitch);
    assert_eq!(skip_stalled(&mut agg).unwrap(), PhaseEvent::WitchActed);
    assert_eq!(agg.log.get(1).unwrap().witch_action, Some(WitchAction::Skip));

    let mut agg = with_status(agg, RoomStatus::NightFinished);
    agg.player_mut(VILLAGER).unwrap().is_candidate_for_sheriff = true;
    assert_eq!(skip_stalled(&mut agg).unwrap(), PhaseEvent::ElectionOpened);
    assert!(!agg.player(VILLAGER).unwrap().is_candidate_for_sheriff);

    let mut agg = with_status(agg, RoomStatus::DayVote);
    let err = skip_stalled(&mut agg).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::WrongPhase, _)));
}

#[test]
fn night_actions_before_the_deal_are_wrong_phase() {
    let mut agg = ready_lobby(9);

    let err = submit_wolf_target(&mut agg, HOST, VILLAGER).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::WrongPhase, _)));

    let err = submit_seer_check(&mut agg, HOST, VILLAGER).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::WrongPhase, _)));

    let err = submit_witch_action(&mut agg, HOST, WitchCommand::Skip, None).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::WrongPhase, _)));
}

#[test]
fn witch_turn_without_start_config_is_corrupt() {
    let mut agg = witch_turn(SettingsChoice::A, Some(VILLAGER));
    let err = submit_witch_action(&mut agg, WITCH, WitchCommand::Skip, None).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Infra(InfraErrorKind::DataCorruption, _)
    ));
    assert!(agg.log.get(1).unwrap().witch_action.is_none());
}
