//! Room HTTP routes under `/api/rooms`.
//!
//! Handlers are thin: resolve the caller, parse the body, call the game flow
//! service and render its `WriteOutcome`. All rules live in the service.

use actix_web::http::header::{CACHE_CONTROL, ETAG, IF_NONE_MATCH};
use actix_web::http::StatusCode;
use actix_web::web::Bytes;
use actix_web::{web, HttpRequest, HttpResponse};
use futures::stream;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::domain::day::DayOutcome;
use crate::domain::night::WitchCommand;
use crate::domain::speech::Direction;
use crate::domain::state::{RoomAggregate, RoomStatus, UserId};
use crate::error::AppError;
use crate::extractors::{CurrentPlayer, ValidatedJson};
use crate::http::etag::{if_none_match_hits, room_etag};
use crate::realtime::ServerMsg;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
struct CreateRoomBody {
    settings_choice: String,
}

#[derive(Debug, Deserialize)]
struct JoinRoomBody {
    invite_code: String,
}

#[derive(Debug, Deserialize)]
struct SeatBody {
    seat: i64,
}

#[derive(Debug, Deserialize)]
struct ReadyBody {
    ready: bool,
}

#[derive(Debug, Deserialize)]
struct TargetBody {
    target: UserId,
}

#[derive(Debug, Deserialize)]
struct VoteBody {
    candidate: UserId,
}

#[derive(Debug, Deserialize)]
struct SpeechOrderBody {
    direction: Direction,
}

#[derive(Debug, Deserialize)]
struct EndDayBody {
    outcome: DayOutcome,
}

/// Response for create/join: enough for the client to fetch a snapshot.
#[derive(Debug, Serialize)]
struct RoomCreated {
    room_id: String,
    invite_code: String,
    status: RoomStatus,
    version: i32,
}

impl From<RoomAggregate> for RoomCreated {
    fn from(agg: RoomAggregate) -> Self {
        Self {
            status: agg.status(),
            version: agg.version,
            room_id: agg.room.id,
            invite_code: agg.room.invite_code,
        }
    }
}

async fn create_room(
    player: CurrentPlayer,
    body: ValidatedJson<CreateRoomBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let agg = app_state
        .rooms
        .create_room(player.user_id, &body.settings_choice)
        .await?;
    Ok(HttpResponse::Created().json(RoomCreated::from(agg)))
}

async fn join_room(
    player: CurrentPlayer,
    body: ValidatedJson<JoinRoomBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let agg = app_state
        .rooms
        .join_room(player.user_id, &body.invite_code)
        .await?;
    Ok(HttpResponse::Ok().json(RoomCreated::from(agg)))
}

async fn take_seat(
    path: web::Path<String>,
    player: CurrentPlayer,
    body: ValidatedJson<SeatBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let out = app_state
        .rooms
        .take_seat(&path, player.user_id, body.seat)
        .await?;
    Ok(HttpResponse::Ok().json(out))
}

async fn set_ready(
    path: web::Path<String>,
    player: CurrentPlayer,
    body: ValidatedJson<ReadyBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let out = app_state
        .rooms
        .set_ready(&path, player.user_id, body.ready)
        .await?;
    Ok(HttpResponse::Ok().json(out))
}

async fn leave_room(
    path: web::Path<String>,
    player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let out = app_state.rooms.leave_room(&path, player.user_id).await?;
    Ok(HttpResponse::Ok().json(out))
}

async fn start_game(
    path: web::Path<String>,
    player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let out = app_state.rooms.start_game(&path, player.user_id).await?;
    Ok(HttpResponse::Ok().json(out))
}

async fn wolf_kill(
    path: web::Path<String>,
    player: CurrentPlayer,
    body: ValidatedJson<TargetBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let out = app_state
        .rooms
        .submit_wolf_target(&path, player.user_id, body.target)
        .await?;
    Ok(HttpResponse::Ok().json(out))
}

async fn seer_check(
    path: web::Path<String>,
    player: CurrentPlayer,
    body: ValidatedJson<TargetBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let out = app_state
        .rooms
        .submit_seer_check(&path, player.user_id, body.target)
        .await?;
    Ok(HttpResponse::Ok().json(out))
}

/// Body: `{"action": "save" | "skip"}` or `{"action": "poison", "target": 5}`.
async fn witch_action(
    path: web::Path<String>,
    player: CurrentPlayer,
    body: ValidatedJson<WitchCommand>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let out = app_state
        .rooms
        .submit_witch_action(&path, player.user_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(out))
}

async fn force_skip(
    path: web::Path<String>,
    player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let out = app_state.rooms.force_skip(&path, player.user_id).await?;
    Ok(HttpResponse::Ok().json(out))
}

async fn run_for_sheriff(
    path: web::Path<String>,
    player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let out = app_state
        .rooms
        .declare_candidacy(&path, player.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(out))
}

async fn vote(
    path: web::Path<String>,
    player: CurrentPlayer,
    body: ValidatedJson<VoteBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let out = app_state
        .rooms
        .cast_vote(&path, player.user_id, body.candidate)
        .await?;
    Ok(HttpResponse::Ok().json(out))
}

async fn process_results(
    path: web::Path<String>,
    player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let out = app_state
        .rooms
        .process_election_results(&path, player.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(out))
}

async fn proceed(
    path: web::Path<String>,
    player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let out = app_state
        .rooms
        .proceed_from_results(&path, player.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(out))
}

async fn speech_order(
    path: web::Path<String>,
    player: CurrentPlayer,
    body: ValidatedJson<SpeechOrderBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let out = app_state
        .rooms
        .set_speech_order(&path, player.user_id, body.direction)
        .await?;
    Ok(HttpResponse::Ok().json(out))
}

async fn start_voting(
    path: web::Path<String>,
    player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let out = app_state
        .rooms
        .start_day_vote(&path, player.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(out))
}

async fn end_day(
    path: web::Path<String>,
    player: CurrentPlayer,
    body: ValidatedJson<EndDayBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let out = app_state
        .rooms
        .end_day(&path, player.user_id, body.outcome)
        .await?;
    Ok(HttpResponse::Ok().json(out))
}

async fn close_room(
    path: web::Path<String>,
    player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let out = app_state.rooms.close_room(&path, player.user_id).await?;
    Ok(HttpResponse::Ok().json(out))
}

/// GET /api/rooms/{id}/snapshot
///
/// The viewer's snapshot with an ETag derived from the room version.
/// A matching `If-None-Match` gets `304 Not Modified` with no body.
async fn get_snapshot(
    req: HttpRequest,
    path: web::Path<String>,
    player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = app_state.rooms.snapshot(&path, player.user_id).await?;
    let etag = room_etag(&snapshot.room.room_id, snapshot.room.version);

    let not_modified = req
        .headers()
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| if_none_match_hits(v, &etag));
    if not_modified {
        return Ok(HttpResponse::build(StatusCode::NOT_MODIFIED)
            .insert_header((ETAG, etag))
            .finish());
    }

    Ok(HttpResponse::Ok()
        .insert_header((ETAG, etag))
        .insert_header((CACHE_CONTROL, "no-cache"))
        .json(snapshot))
}

async fn get_audit(
    path: web::Path<String>,
    player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let audit = app_state.rooms.audit_log(&path, player.user_id).await?;
    Ok(HttpResponse::Ok().json(audit))
}

fn sse_frame(msg: &ServerMsg) -> Bytes {
    match serde_json::to_string(msg) {
        Ok(json) => Bytes::from(format!("event: {}\ndata: {json}\n\n", msg.kind())),
        Err(e) => {
            warn!(error = %e, kind = msg.kind(), "failed to encode event");
            Bytes::from_static(b": encode error\n\n")
        }
    }
}

/// GET /api/rooms/{id}/events
///
/// Server-sent events: every room snapshot notification plus the caller's
/// private messages. Members only.
async fn events(
    path: web::Path<String>,
    player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    app_state.rooms.snapshot(&room_id, player.user_id).await?;

    let subscription = app_state.hub.subscribe(&room_id, player.user_id);
    debug!(room_id = %room_id, user_id = player.user_id, "event stream opened");

    // The subscription lives in the stream state, so a disconnect drops it
    // and releases the hub channels.
    let body = stream::unfold(subscription, |mut subscription| async move {
        let frame = match subscription.recv().await {
            Ok(msg) => sse_frame(&msg),
            Err(RecvError::Lagged(skipped)) => Bytes::from(format!(": lagged {skipped}\n\n")),
            Err(RecvError::Closed) => return None,
        };
        Some((Ok::<_, actix_web::Error>(frame), subscription))
    });

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((CACHE_CONTROL, "no-cache"))
        .streaming(body))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(create_room)))
        .service(web::resource("/join").route(web::post().to(join_room)))
        .service(
            web::scope("/{room_id}")
                .route("/seat", web::post().to(take_seat))
                .route("/ready", web::post().to(set_ready))
                .route("/leave", web::post().to(leave_room))
                .route("/start", web::post().to(start_game))
                .route("/night/wolf-kill", web::post().to(wolf_kill))
                .route("/night/seer-check", web::post().to(seer_check))
                .route("/night/witch-action", web::post().to(witch_action))
                .route("/night/force-skip", web::post().to(force_skip))
                .route("/election/run", web::post().to(run_for_sheriff))
                .route("/election/vote", web::post().to(vote))
                .route("/election/process-results", web::post().to(process_results))
                .route("/day/proceed", web::post().to(proceed))
                .route("/sheriff/speech-order", web::post().to(speech_order))
                .route("/day/start-voting", web::post().to(start_voting))
                .route("/day/end", web::post().to(end_day))
                .route("/close", web::post().to(close_room))
                .route("/snapshot", web::get().to(get_snapshot))
                .route("/audit", web::get().to(get_audit))
                .route("/events", web::get().to(events)),
        );
}
