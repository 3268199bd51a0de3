use std::sync::Arc;

use backend::adapters::rooms_sea::SeaRoomStore;
use backend::domain::action_log::{SeerVerdict, WitchAction};
use backend::domain::night::WitchCommand;
use backend::domain::state::RoomStatus;
use backend::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use backend::infra::db::connect_and_migrate;
use backend::repos::rooms::RoomStore;

use crate::support::room_setup::{lobby, play_night, service_over, started, HOST};

async fn sqlite_store() -> Arc<SeaRoomStore> {
    let conn = connect_and_migrate("sqlite::memory:")
        .await
        .expect("connect and migrate sqlite");
    Arc::new(SeaRoomStore::new(conn))
}

#[tokio::test]
async fn insert_and_load_round_trip() {
    let store = sqlite_store().await;
    let (svc, _hub) = service_over(store.clone());
    let created = svc.create_room(HOST, "B").await.unwrap();

    let loaded = store.find_room(&created.room.id).await.unwrap().unwrap();
    assert_eq!(loaded.version, 1);
    assert_eq!(loaded.room.invite_code, created.room.invite_code);
    assert_eq!(loaded.room.rng_seed, created.room.rng_seed);
    assert_eq!(loaded.players.len(), 1);
    assert_eq!(loaded.players[0].user_id, HOST);

    let by_code = store
        .find_by_invite_code(&created.room.invite_code)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_code.room.id, created.room.id);

    assert!(store.find_room("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_invite_code_is_a_conflict() {
    let store = sqlite_store().await;
    let (svc, _hub) = service_over(store.clone());
    let created = svc.create_room(HOST, "A").await.unwrap();

    let mut copy = created.clone();
    copy.room.id = "another-room".to_string();
    let err = store.insert_room(copy).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::InviteCodeConflict, _)
    ));
}

#[tokio::test]
async fn compare_and_set_checks_the_version() {
    let store = sqlite_store().await;
    let (svc, _hub) = service_over(store.clone());
    let room_id = lobby(&svc, "A", 3, false).await;
    let current = store.find_room(&room_id).await.unwrap().unwrap();

    let mut next = current.clone();
    next.player_mut(2).unwrap().seat_number = Some(7);
    let stored = store
        .compare_and_set(current.version, next.clone())
        .await
        .unwrap();
    assert_eq!(stored.version, current.version + 1);
    assert_eq!(stored.player(2).unwrap().seat_number, Some(7));

    let err = store
        .compare_and_set(current.version, next.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::StaleState, _)));

    let reloaded = store.find_room(&room_id).await.unwrap().unwrap();
    assert_eq!(reloaded.version, stored.version);

    let mut ghost = next;
    ghost.room.id = "ghost".to_string();
    let err = store.compare_and_set(1, ghost).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Room, _)));
}

#[tokio::test]
async fn a_full_night_persists_logs_and_flags() {
    let store = sqlite_store().await;
    let (svc, _hub) = service_over(store.clone());
    let (room_id, roles) = started(&svc, "A").await;
    let victim = roles.villagers[0];
    play_night(&svc, &room_id, &roles, victim, WitchCommand::Save).await;

    let agg = store.find_room(&room_id).await.unwrap().unwrap();
    assert_eq!(agg.status(), RoomStatus::PoliceElection);
    assert!(agg.room.start_config.is_some());
    assert!(agg.player(roles.witch).unwrap().has_used_witch_save);

    let log = agg.log.get(1).unwrap();
    assert_eq!(log.wolf_kill_target, Some(victim));
    assert_eq!(log.witch_action, Some(WitchAction::Save(victim)));
    let check = log.seer_check.unwrap();
    assert_eq!(check.seer, roles.seer);
    assert_eq!(check.result, SeerVerdict::Wolf);

    svc.declare_candidacy(&room_id, roles.hunter).await.unwrap();
    svc.cast_vote(&room_id, roles.seer, roles.hunter)
        .await
        .unwrap();
    svc.process_election_results(&room_id, HOST).await.unwrap();

    let agg = store.find_room(&room_id).await.unwrap().unwrap();
    assert_eq!(agg.status(), RoomStatus::DayResultsAnnouncement);
    assert_eq!(agg.room.police_badge_holder, Some(roles.hunter));
    assert!(agg.players.iter().all(|p| p.is_alive));
}

#[tokio::test]
async fn player_removal_is_persisted() {
    let store = sqlite_store().await;
    let (svc, _hub) = service_over(store.clone());
    let room_id = lobby(&svc, "A", 4, false).await;
    svc.leave_room(&room_id, 3).await.unwrap();

    let agg = store.find_room(&room_id).await.unwrap().unwrap();
    let ids: Vec<_> = agg.players.iter().map(|p| p.user_id).collect();
    assert_eq!(ids, vec![1, 2, 4]);
}
