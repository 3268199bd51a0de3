//! SeaORM -> DomainError translation.
//!
//! Room adapters convert `sea_orm::DbErr` into `DomainError` here; the web
//! layer then maps `DomainError` to `AppError` via `From`.

use serde::Deserialize;
use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::trace_ctx;

/// Prefix for the structured payload the room adapter attaches to lost CAS races.
pub const OPTIMISTIC_LOCK_PREFIX: &str = "OPTIMISTIC_LOCK:";
/// Prefix for a room lookup that came back empty inside a write.
pub const ROOM_NOT_FOUND_PREFIX: &str = "ROOM_NOT_FOUND:";

#[derive(Deserialize)]
struct LockInfo {
    expected: i32,
    actual: i32,
}

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// `table.column` from SQLite's "UNIQUE constraint failed: table.column".
fn sqlite_unique_column(msg: &str) -> Option<&str> {
    let start = msg.find("UNIQUE constraint failed: ")? + "UNIQUE constraint failed: ".len();
    msg[start..].split_whitespace().next()
}

fn unique_conflict(msg: &str) -> Option<(ConflictKind, &'static str)> {
    let invite = matches!(sqlite_unique_column(msg), Some("rooms.invite_code"))
        || msg.contains("ux_rooms_invite_code");
    invite.then_some((ConflictKind::InviteCodeConflict, "Invite code already in use"))
}

/// Build the `DbErr` the room adapter returns when a versioned update matched no row.
pub fn optimistic_lock_err(expected: i32, actual: i32) -> sea_orm::DbErr {
    sea_orm::DbErr::Custom(format!(
        "{OPTIMISTIC_LOCK_PREFIX}{}",
        serde_json::json!({ "expected": expected, "actual": actual })
    ))
}

/// Translate a `DbErr` into a `DomainError` with a client-safe detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let raw = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(NotFoundKind::Room, "Room not found");
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with(ROOM_NOT_FOUND_PREFIX) => {
            let room_id = &msg[ROOM_NOT_FOUND_PREFIX.len()..];
            warn!(trace_id = %trace_id, room_id, "Room not found");
            return DomainError::not_found(NotFoundKind::Room, format!("Room {room_id} not found"));
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with(OPTIMISTIC_LOCK_PREFIX) => {
            if let Ok(info) = serde_json::from_str::<LockInfo>(&msg[OPTIMISTIC_LOCK_PREFIX.len()..])
            {
                warn!(
                    trace_id = %trace_id,
                    expected = info.expected,
                    actual = info.actual,
                    "Optimistic lock conflict detected"
                );
                return DomainError::stale_state(info.expected, info.actual);
            }
            warn!(trace_id = %trace_id, "Optimistic lock conflict detected (version info unavailable)");
            return DomainError::conflict(
                ConflictKind::StaleState,
                "Room was modified concurrently; refetch and retry",
            );
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %raw, "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&raw, "23505")
        || raw.contains("duplicate key value violates unique constraint")
        || raw.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %raw, "Unique constraint violation");
        if let Some((kind, detail)) = unique_conflict(&raw) {
            return DomainError::conflict(kind, detail);
        }
        return DomainError::infra(
            InfraErrorKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if raw.contains("timeout") || raw.contains("pool") || raw.contains("unavailable") {
        warn!(trace_id = %trace_id, raw_error = %raw, "Database timeout or pool issue");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %raw, "Unhandled database error");
    DomainError::infra(InfraErrorKind::Other("DbErr".into()), "Database operation failed")
}
