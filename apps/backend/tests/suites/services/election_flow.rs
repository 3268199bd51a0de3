use backend::domain::night::WitchCommand;
use backend::domain::state::RoomStatus;
use backend::errors::ErrorCode;

use crate::support::room_setup::{memory_service, play_night, started, HOST};

#[tokio::test]
async fn strict_majority_elects_a_sheriff_and_deaths_apply_once() {
    let (svc, _hub) = memory_service();
    let (room_id, roles) = started(&svc, "A").await;
    let victim = roles.villagers[0];
    play_night(&svc, &room_id, &roles, victim, WitchCommand::Skip).await;

    let candidate = roles.seer;
    let rival = roles.hunter;
    svc.declare_candidacy(&room_id, candidate).await.unwrap();
    svc.declare_candidacy(&room_id, rival).await.unwrap();
    let err = svc.declare_candidacy(&room_id, candidate).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyCandidate);

    for voter in [roles.wolves[0], roles.wolves[1], roles.witch] {
        svc.cast_vote(&room_id, voter, candidate).await.unwrap();
    }
    svc.cast_vote(&room_id, roles.wolves[2], rival).await.unwrap();

    let err = svc
        .cast_vote(&room_id, roles.wolves[0], rival)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyVoted);
    let err = svc
        .cast_vote(&room_id, roles.villagers[1], roles.villagers[2])
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidCandidate);

    let out = svc.process_election_results(&room_id, HOST).await.unwrap();
    assert_eq!(out.status, RoomStatus::DayResultsAnnouncement);

    let snap = svc.snapshot(&room_id, HOST).await.unwrap();
    assert_eq!(snap.room.police_badge_holder, Some(candidate));
    assert_eq!(snap.room.last_night_deaths, vec![victim]);
    let dead = snap.room.players.iter().find(|p| p.user_id == victim).unwrap();
    assert!(!dead.is_alive);

    // Replaying the tally is rejected, so deaths are never applied twice.
    let err = svc
        .process_election_results(&room_id, HOST)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::WrongPhase);
}

#[tokio::test]
async fn tie_elects_nobody() {
    let (svc, _hub) = memory_service();
    let (room_id, roles) = started(&svc, "A").await;
    play_night(&svc, &room_id, &roles, roles.villagers[0], WitchCommand::Save).await;

    svc.declare_candidacy(&room_id, roles.seer).await.unwrap();
    svc.declare_candidacy(&room_id, roles.hunter).await.unwrap();
    svc.cast_vote(&room_id, roles.wolves[0], roles.seer)
        .await
        .unwrap();
    svc.cast_vote(&room_id, roles.wolves[1], roles.hunter)
        .await
        .unwrap();

    svc.process_election_results(&room_id, HOST).await.unwrap();
    let snap = svc.snapshot(&room_id, HOST).await.unwrap();
    assert_eq!(snap.room.police_badge_holder, None);
    assert!(snap.room.last_night_deaths.is_empty());
}

#[tokio::test]
async fn elected_candidate_killed_tonight_loses_the_badge() {
    let (svc, _hub) = memory_service();
    let (room_id, roles) = started(&svc, "A").await;
    let doomed = roles.hunter;
    play_night(&svc, &room_id, &roles, doomed, WitchCommand::Skip).await;

    // The victim is still alive until results are processed.
    svc.declare_candidacy(&room_id, doomed).await.unwrap();
    svc.cast_vote(&room_id, roles.seer, doomed).await.unwrap();

    svc.process_election_results(&room_id, HOST).await.unwrap();
    let snap = svc.snapshot(&room_id, HOST).await.unwrap();
    assert_eq!(snap.room.police_badge_holder, None);
    assert_eq!(snap.room.last_night_deaths, vec![doomed]);
}

#[tokio::test]
async fn election_actions_outside_the_election_are_wrong_phase() {
    let (svc, _hub) = memory_service();
    let (room_id, roles) = started(&svc, "A").await;
    let err = svc
        .declare_candidacy(&room_id, roles.seer)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::WrongPhase);
    let err = svc
        .process_election_results(&room_id, HOST)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::WrongPhase);
}
