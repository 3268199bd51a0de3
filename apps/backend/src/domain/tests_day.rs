use crate::domain::day::{end_day, proceed_from_results, start_vote, DayOutcome};
use crate::domain::phase::PhaseEvent;
use crate::domain::state::{RoomStatus, SettingsChoice};
use crate::domain::test_state_helpers::{kill, started_room, with_status, HOST, SEER, VILLAGER};
use crate::errors::domain::{DomainError, ForbiddenKind};

#[test]
fn proceed_without_sheriff_uses_default_order() {
    let mut agg = with_status(
        started_room(SettingsChoice::A),
        RoomStatus::DayResultsAnnouncement,
    );
    kill(&mut agg, 1);

    let event = proceed_from_results(&mut agg, VILLAGER).unwrap();
    assert_eq!(event, PhaseEvent::ProceedWithoutSheriff);
    assert_eq!(agg.room.speaker_order, vec![2, 3, 4, 5, 6, 7, 8, 9]);
    assert_eq!(agg.room.current_speaker, Some(2));
}

#[test]
fn proceed_with_sheriff_leaves_order_to_them() {
    let mut agg = with_status(
        started_room(SettingsChoice::A),
        RoomStatus::DayResultsAnnouncement,
    );
    agg.room.police_badge_holder = Some(SEER);

    let event = proceed_from_results(&mut agg, VILLAGER).unwrap();
    assert_eq!(event, PhaseEvent::ProceedWithSheriff);
    assert!(agg.room.speaker_order.is_empty());
}

#[test]
fn vote_opens_for_host_or_sheriff_only() {
    let mut agg = with_status(started_room(SettingsChoice::A), RoomStatus::DayDiscussion);
    agg.room.police_badge_holder = Some(SEER);

    assert_eq!(start_vote(&agg, HOST).unwrap(), PhaseEvent::DiscussionEnded);
    assert_eq!(start_vote(&agg, SEER).unwrap(), PhaseEvent::DiscussionEnded);
    let err = start_vote(&agg, VILLAGER).unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(ForbiddenKind::NotHost, _)));
}

#[test]
fn next_night_clears_the_speaker_order() {
    let mut agg = with_status(started_room(SettingsChoice::A), RoomStatus::DayVote);
    agg.room.speaker_order = vec![3, 4, 5];
    agg.room.current_speaker = Some(3);

    let err = end_day(&mut agg, VILLAGER, DayOutcome::Finish).unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(ForbiddenKind::NotHost, _)));

    assert_eq!(
        end_day(&mut agg, HOST, DayOutcome::NextNight).unwrap(),
        PhaseEvent::NightBegins
    );
    assert!(agg.room.speaker_order.is_empty());
    assert_eq!(agg.room.current_speaker, None);
}
