use backend::domain::state::RoomStatus;
use backend::errors::ErrorCode;

use crate::support::room_setup::{lobby, memory_service, HOST};

#[tokio::test]
async fn create_room_starts_in_lobby_with_host_joined() {
    let (svc, _hub) = memory_service();
    let agg = svc.create_room(HOST, "a").await.unwrap();

    assert_eq!(agg.status(), RoomStatus::Lobby);
    assert_eq!(agg.version, 1);
    assert_eq!(agg.room.invite_code.len(), 6);
    assert_eq!(agg.players.len(), 1);
    assert_eq!(agg.players[0].seat_number, None);
    assert!(!agg.players[0].is_ready);
}

#[tokio::test]
async fn create_room_rejects_unknown_settings() {
    let (svc, _hub) = memory_service();
    let err = svc.create_room(HOST, "C").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidInput);
}

#[tokio::test]
async fn join_is_case_insensitive_and_idempotent() {
    let (svc, _hub) = memory_service();
    let created = svc.create_room(HOST, "A").await.unwrap();
    let code = created.room.invite_code.to_lowercase();

    let joined = svc.join_room(2, &code).await.unwrap();
    assert_eq!(joined.players.len(), 2);
    let again = svc.join_room(2, &code).await.unwrap();
    assert_eq!(again.players.len(), 2);
    assert_eq!(again.version, joined.version);
}

#[tokio::test]
async fn join_failures() {
    let (svc, _hub) = memory_service();
    let err = svc.join_room(2, "ABC").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidInput);

    let err = svc.join_room(2, "ZZZZZZ").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InviteCodeNotFound);

    let room_id = lobby(&svc, "A", 9, false).await;
    let code = svc.snapshot(&room_id, HOST).await.unwrap().room.invite_code;
    let err = svc.join_room(10, &code).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::RoomFull);
}

#[tokio::test]
async fn seats_are_unique_and_reseating_clears_ready() {
    let (svc, _hub) = memory_service();
    let room_id = lobby(&svc, "A", 3, false).await;

    svc.take_seat(&room_id, 2, 5).await.unwrap();
    let err = svc.take_seat(&room_id, 3, 5).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::SeatTaken);

    let err = svc.take_seat(&room_id, 3, 10).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidSeat);

    svc.set_ready(&room_id, 2, true).await.unwrap();
    svc.take_seat(&room_id, 2, 6).await.unwrap();
    let snap = svc.snapshot(&room_id, 2).await.unwrap();
    let me = snap.room.players.iter().find(|p| p.user_id == 2).unwrap();
    assert_eq!(me.seat_number, Some(6));
    assert!(!me.is_ready);
}

#[tokio::test]
async fn unseated_player_cannot_ready() {
    let (svc, _hub) = memory_service();
    let room_id = lobby(&svc, "A", 2, false).await;
    let err = svc.set_ready(&room_id, 2, true).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotAllSeated);
}

#[tokio::test]
async fn leave_and_close() {
    let (svc, _hub) = memory_service();
    let room_id = lobby(&svc, "A", 3, false).await;

    let err = svc.leave_room(&room_id, HOST).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotHost);

    svc.leave_room(&room_id, 3).await.unwrap();
    let snap = svc.snapshot(&room_id, HOST).await.unwrap();
    assert_eq!(snap.room.players.len(), 2);

    let err = svc.close_room(&room_id, 2).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotHost);
    let out = svc.close_room(&room_id, HOST).await.unwrap();
    assert_eq!(out.status, RoomStatus::Closed);

    let err = svc.close_room(&room_id, HOST).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::WrongPhase);
}

#[tokio::test]
async fn start_requires_full_ready_table() {
    let (svc, _hub) = memory_service();
    let room_id = lobby(&svc, "A", 8, true).await;
    let err = svc.start_game(&room_id, HOST).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::WrongPlayerCount);
    assert_eq!(
        svc.snapshot(&room_id, HOST).await.unwrap().room.status,
        RoomStatus::Lobby
    );
}

#[tokio::test]
async fn start_deals_roles_and_enters_first_night() {
    let (svc, _hub) = memory_service();
    let room_id = lobby(&svc, "B", 9, true).await;

    let err = svc.start_game(&room_id, 2).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotHost);

    let out = svc.start_game(&room_id, HOST).await.unwrap();
    assert_eq!(out.status, RoomStatus::NightWolf);
    assert_eq!(out.round, 1);

    let snap = svc.snapshot(&room_id, HOST).await.unwrap();
    assert_eq!(snap.room.round, Some(1));
    assert!(snap.viewer.role.is_some());

    let err = svc.start_game(&room_id, HOST).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::WrongPhase);
}
