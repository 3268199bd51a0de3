//! Timer-driven force-skip for stalled night phases.
//!
//! Each commit into a skippable status arms one timer for that exact
//! `(room, status, round)`. On expiry the room is skipped only if it still
//! sits in the armed status and round; anything else means players acted.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::controller::Controller;
use crate::domain::state::{RoomStatus, RoundNo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Armed {
    pub room_id: String,
    pub status: RoomStatus,
    pub round: RoundNo,
}

/// Start the watchdog task and return a controller that arms it.
pub(super) fn spawn(ctl: Controller, timeout: Duration) -> Controller {
    let (tx, rx) = mpsc::unbounded_channel();
    let ctl = ctl.with_timer(tx);
    tokio::spawn(run(ctl.clone(), rx, timeout));
    info!(timeout_secs = timeout.as_secs(), "night phase watchdog started");
    ctl
}

async fn run(ctl: Controller, mut rx: mpsc::UnboundedReceiver<Armed>, timeout: Duration) {
    while let Some(armed) = rx.recv().await {
        let ctl = ctl.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            expire(&ctl, armed).await;
        });
    }
}

async fn expire(ctl: &Controller, armed: Armed) {
    let agg = match ctl.load(&armed.room_id).await {
        Ok(agg) => agg,
        Err(e) => {
            debug!(room_id = %armed.room_id, error = %e, "watchdog could not load room");
            return;
        }
    };
    if agg.status() != armed.status || agg.room.round() != armed.round {
        return;
    }

    match ctl.skip_phase(agg).await {
        Ok(stored) => info!(
            room_id = %armed.room_id,
            skipped = %armed.status,
            now = %stored.status(),
            "watchdog skipped stalled phase"
        ),
        // A player acting at the same moment wins the race; nothing to do.
        Err(e) => debug!(room_id = %armed.room_id, error = %e, "watchdog skip not applied"),
    }
}
