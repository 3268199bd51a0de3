use backend::domain::day::DayOutcome;
use backend::domain::night::WitchCommand;
use backend::domain::speech::Direction;
use backend::domain::state::{NightRole, RoomStatus, UserId};
use backend::errors::ErrorCode;
use backend::services::GameFlowService;

use crate::support::room_setup::{memory_service, play_night, started, Roles, HOST};

/// Night one with `victim` killed and `sheriff` (if any) elected unanimously.
async fn into_day(
    svc: &GameFlowService,
    room_id: &str,
    roles: &Roles,
    victim: UserId,
    sheriff: Option<UserId>,
) {
    play_night(svc, room_id, roles, victim, WitchCommand::Skip).await;
    if let Some(sheriff) = sheriff {
        svc.declare_candidacy(room_id, sheriff).await.unwrap();
        svc.cast_vote(room_id, sheriff, sheriff).await.unwrap();
    }
    svc.process_election_results(room_id, HOST).await.unwrap();
}

#[tokio::test]
async fn sheriff_orders_speeches_and_round_advances() {
    let (svc, _hub) = memory_service();
    let (room_id, roles) = started(&svc, "A").await;
    let sheriff = roles.seer;
    let victim = roles.villagers[0];
    into_day(&svc, &room_id, &roles, victim, Some(sheriff)).await;

    let out = svc.proceed_from_results(&room_id, HOST).await.unwrap();
    assert_eq!(out.status, RoomStatus::SheriffSetsSpeechOrder);

    let err = svc
        .set_speech_order(&room_id, roles.witch, Direction::Clockwise)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotSheriff);

    let out = svc
        .set_speech_order(&room_id, sheriff, Direction::Clockwise)
        .await
        .unwrap();
    assert_eq!(out.status, RoomStatus::DayDiscussion);
    assert_eq!(out.round, 2);

    let snap = svc.snapshot(&room_id, HOST).await.unwrap();
    assert_eq!(snap.room.speaker_order.len(), 8);
    assert_eq!(snap.room.speaker_order[0], sheriff);
    assert_eq!(snap.room.current_speaker, Some(sheriff));
    assert!(!snap.room.speaker_order.contains(&victim));
    // Seats equal user ids, so clockwise means ascending ids after the sheriff.
    let expected: Vec<UserId> = (sheriff..=9)
        .chain(1..sheriff)
        .filter(|&u| u != victim)
        .collect();
    assert_eq!(snap.room.speaker_order, expected);

    let out = svc.start_day_vote(&room_id, sheriff).await.unwrap();
    assert_eq!(out.status, RoomStatus::DayVote);
}

#[tokio::test]
async fn without_sheriff_discussion_starts_at_the_lowest_alive_seat() {
    let (svc, _hub) = memory_service();
    let (room_id, roles) = started(&svc, "A").await;
    into_day(&svc, &room_id, &roles, 1, None).await;

    let out = svc.proceed_from_results(&room_id, 2).await.unwrap();
    assert_eq!(out.status, RoomStatus::DayDiscussion);
    assert_eq!(out.round, 2);

    let snap = svc.snapshot(&room_id, 2).await.unwrap();
    assert_eq!(snap.room.speaker_order, (2..=9).collect::<Vec<UserId>>());
}

#[tokio::test]
async fn day_vote_then_next_night_or_finish() {
    let (svc, _hub) = memory_service();
    let (room_id, roles) = started(&svc, "A").await;
    into_day(&svc, &room_id, &roles, roles.villagers[0], None).await;
    svc.proceed_from_results(&room_id, HOST).await.unwrap();

    let err = svc
        .end_day(&room_id, HOST, DayOutcome::NextNight)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::WrongPhase);

    svc.start_day_vote(&room_id, HOST).await.unwrap();
    let err = svc
        .end_day(&room_id, 2, DayOutcome::NextNight)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotHost);

    let out = svc
        .end_day(&room_id, HOST, DayOutcome::NextNight)
        .await
        .unwrap();
    assert_eq!(out.status, RoomStatus::NightWolf);
    assert_eq!(out.round, 2);

    let snap = svc.snapshot(&room_id, HOST).await.unwrap();
    assert_eq!(snap.room.night_acting_role, Some(NightRole::Wolf));
    assert!(snap.room.speaker_order.is_empty());
}

#[tokio::test]
async fn finished_game_reveals_every_role() {
    let (svc, _hub) = memory_service();
    let (room_id, roles) = started(&svc, "A").await;
    into_day(&svc, &room_id, &roles, roles.villagers[0], None).await;
    svc.proceed_from_results(&room_id, HOST).await.unwrap();
    svc.start_day_vote(&room_id, HOST).await.unwrap();

    let out = svc
        .end_day(&room_id, HOST, DayOutcome::Finish)
        .await
        .unwrap();
    assert_eq!(out.status, RoomStatus::Finished);

    let snap = svc.snapshot(&room_id, roles.villagers[1]).await.unwrap();
    assert!(snap.room.players.iter().all(|p| p.role.is_some()));
}
