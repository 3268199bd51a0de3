use crate::domain::action_log::WitchAction;
use crate::domain::election::{cast_vote, declare_candidacy, process_results, tally};
use crate::domain::phase::{advance, PhaseEvent};
use crate::domain::state::{RoomAggregate, RoomStatus, SettingsChoice};
use crate::domain::test_state_helpers::{
    kill, started_room, with_status, HUNTER, SEER, VILLAGER, WITCH, WOLF, WOLF_2,
};
use crate::errors::domain::{ConflictKind, DomainError, ForbiddenKind, ValidationKind};

fn election() -> RoomAggregate {
    with_status(started_room(SettingsChoice::A), RoomStatus::PoliceElection)
}

#[test]
fn candidacy_once_per_cycle() {
    let mut agg = election();
    declare_candidacy(&mut agg, SEER).unwrap();
    assert!(agg.player(SEER).unwrap().is_candidate_for_sheriff);

    let err = declare_candidacy(&mut agg, SEER).unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(ForbiddenKind::AlreadyCandidate, _)));
}

#[test]
fn candidacy_outside_election_is_wrong_phase() {
    let mut agg = started_room(SettingsChoice::A);
    let err = declare_candidacy(&mut agg, SEER).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::WrongPhase, _)));
}

#[test]
fn dead_players_cannot_run_or_vote() {
    let mut agg = election();
    declare_candidacy(&mut agg, SEER).unwrap();
    kill(&mut agg, HUNTER);

    let err = declare_candidacy(&mut agg, HUNTER).unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(ForbiddenKind::Dead, _)));
    let err = cast_vote(&mut agg, HUNTER, SEER).unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(ForbiddenKind::Dead, _)));
}

#[test]
fn vote_rules() {
    let mut agg = election();
    declare_candidacy(&mut agg, SEER).unwrap();

    let err = cast_vote(&mut agg, WOLF, HUNTER).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::InvalidCandidate, _)));

    cast_vote(&mut agg, WOLF, SEER).unwrap();
    let err = cast_vote(&mut agg, WOLF, SEER).unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::AlreadyVoted, _)));

    // A candidate may vote for herself.
    cast_vote(&mut agg, SEER, SEER).unwrap();
    assert_eq!(tally(&agg).get(&SEER), Some(&2));
}

#[test]
fn vote_for_dead_candidate_is_invalid() {
    let mut agg = election();
    declare_candidacy(&mut agg, SEER).unwrap();
    kill(&mut agg, SEER);
    let err = cast_vote(&mut agg, WOLF, SEER).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::InvalidCandidate, _)));
}

#[test]
fn tally_ignores_dead_voters() {
    let mut agg = election();
    declare_candidacy(&mut agg, SEER).unwrap();
    cast_vote(&mut agg, WOLF, SEER).unwrap();
    cast_vote(&mut agg, VILLAGER, SEER).unwrap();
    kill(&mut agg, VILLAGER);
    assert_eq!(tally(&agg).get(&SEER), Some(&1));
}

#[test]
fn results_apply_deaths_and_elect() {
    let mut agg = election();
    agg.log.entry(1).wolf_kill_target = Some(VILLAGER);
    agg.log.entry(1).witch_action = Some(WitchAction::Poison(WOLF_2));
    declare_candidacy(&mut agg, SEER).unwrap();
    declare_candidacy(&mut agg, HUNTER).unwrap();
    cast_vote(&mut agg, WOLF, SEER).unwrap();
    cast_vote(&mut agg, WITCH, SEER).unwrap();
    cast_vote(&mut agg, HUNTER, HUNTER).unwrap();

    let result = process_results(&mut agg, WOLF).unwrap();
    assert_eq!(result.sheriff, Some(SEER));
    assert_eq!(result.deaths, vec![WOLF_2, VILLAGER]);
    assert_eq!(agg.room.last_night_deaths, vec![WOLF_2, VILLAGER]);
    assert_eq!(agg.room.police_badge_holder, Some(SEER));
    assert!(!agg.player(VILLAGER).unwrap().is_alive);
    assert!(!agg.player(WOLF_2).unwrap().is_alive);
}

#[test]
fn tie_elects_nobody() {
    let mut agg = election();
    declare_candidacy(&mut agg, SEER).unwrap();
    declare_candidacy(&mut agg, HUNTER).unwrap();
    cast_vote(&mut agg, WOLF, SEER).unwrap();
    cast_vote(&mut agg, WITCH, HUNTER).unwrap();

    let result = process_results(&mut agg, WOLF).unwrap();
    assert_eq!(result.sheriff, None);
    assert_eq!(agg.room.police_badge_holder, None);
}

#[test]
fn elected_sheriff_killed_tonight_loses_badge() {
    let mut agg = election();
    agg.log.entry(1).wolf_kill_target = Some(SEER);
    declare_candidacy(&mut agg, SEER).unwrap();
    cast_vote(&mut agg, WOLF, SEER).unwrap();

    let result = process_results(&mut agg, WOLF).unwrap();
    assert_eq!(result.sheriff, None);
    assert_eq!(agg.room.police_badge_holder, None);
    assert_eq!(result.deaths, vec![SEER]);
}

#[test]
fn replayed_results_are_wrong_phase() {
    let mut agg = election();
    agg.log.entry(1).wolf_kill_target = Some(VILLAGER);
    process_results(&mut agg, WOLF).unwrap();
    advance(&mut agg.room, PhaseEvent::ResultsProcessed).unwrap();

    let before = agg.clone();
    let err = process_results(&mut agg, WOLF).unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::WrongPhase, _)));
    assert_eq!(agg, before);
}
