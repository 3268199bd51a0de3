//! Room phase controller: the only writer of `status` and the round counter.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::watchdog::Armed;
use crate::domain::night::{open_election, skip_stalled};
use crate::domain::phase::{advance, PhaseEvent};
use crate::domain::state::{RoomAggregate, RoomStatus};
use crate::error::AppError;
use crate::realtime::{AddressedMessage, Publisher};
use crate::repos::rooms::{require_room, RoomStore};

#[derive(Clone)]
pub(super) struct Controller {
    store: Arc<dyn RoomStore>,
    publisher: Arc<dyn Publisher>,
    timer: Option<mpsc::UnboundedSender<Armed>>,
}

impl Controller {
    pub(super) fn new(store: Arc<dyn RoomStore>, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            store,
            publisher,
            timer: None,
        }
    }

    pub(super) fn with_timer(mut self, timer: mpsc::UnboundedSender<Armed>) -> Self {
        self.timer = Some(timer);
        self
    }

    pub(super) fn store(&self) -> &dyn RoomStore {
        self.store.as_ref()
    }

    pub(super) async fn load(&self, room_id: &str) -> Result<RoomAggregate, AppError> {
        Ok(require_room(self.store(), room_id).await?)
    }

    /// Write `agg` back, advancing the phase by `event` if given.
    ///
    /// The write is conditioned on the version `agg` was loaded at. On success
    /// subscribers get a snapshot notice and night phases arm the watchdog.
    pub(super) async fn commit(
        &self,
        mut agg: RoomAggregate,
        event: Option<PhaseEvent>,
    ) -> Result<RoomAggregate, AppError> {
        let expected = agg.version;
        let from = agg.status();
        if let Some(event) = event {
            advance(&mut agg.room, event)?;
        }

        let stored = self
            .store
            .compare_and_set(expected, agg)
            .await
            .inspect_err(|e| {
                if e.is_stale_state() {
                    warn!(expected, "room write lost a race");
                }
            })?;

        let room_id = stored.room.id.as_str();
        match event {
            Some(event) => info!(
                room_id,
                ?event,
                from = %from,
                to = %stored.status(),
                round = stored.room.round(),
                version = stored.version,
                "phase transition committed"
            ),
            None => debug!(
                room_id,
                status = %stored.status(),
                version = stored.version,
                "room updated"
            ),
        }

        self.announce(&stored).await;
        self.arm(&stored);
        Ok(stored)
    }

    async fn announce(&self, agg: &RoomAggregate) {
        let res = self
            .publisher
            .publish_snapshot(&agg.room.id, agg.version, agg.status(), agg.room.round())
            .await;
        if let Err(e) = res {
            debug!(room_id = %agg.room.id, error = %e, "snapshot notice not delivered");
        }
    }

    pub(super) async fn send_private(&self, message: AddressedMessage) {
        let (room_id, user_id) = (message.room_id.clone(), message.user_id);
        if let Err(e) = self.publisher.send_private(message).await {
            debug!(room_id = %room_id, user_id, error = %e, "private message not delivered");
        }
    }

    fn arm(&self, agg: &RoomAggregate) {
        let Some(timer) = &self.timer else {
            return;
        };
        if !is_skippable(agg.status()) {
            return;
        }
        let armed = Armed {
            room_id: agg.room.id.clone(),
            status: agg.status(),
            round: agg.room.round(),
        };
        if timer.send(armed).is_err() {
            warn!(room_id = %agg.room.id, "watchdog is gone; phase timer not armed");
        }
    }

    /// Best-effort `NightFinished -> PoliceElection`.
    ///
    /// Failure is logged and the room stays in `NightFinished`, from where a
    /// force-skip can open the election later.
    pub(super) async fn finish_night(&self, night_over: RoomAggregate) -> RoomAggregate {
        let mut next = night_over.clone();
        open_election(&mut next);
        match self.commit(next, Some(PhaseEvent::ElectionOpened)).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(room_id = %night_over.room.id, error = %e, "could not open the election");
                night_over
            }
        }
    }

    /// Apply the default action for the current stalled phase and commit it.
    pub(super) async fn skip_phase(&self, mut agg: RoomAggregate) -> Result<RoomAggregate, AppError> {
        let skipped = agg.status();
        let event = skip_stalled(&mut agg)?;
        let stored = self.commit(agg, Some(event)).await?;
        info!(room_id = %stored.room.id, skipped = %skipped, "stalled phase skipped");

        if stored.status() == RoomStatus::NightFinished {
            return Ok(self.finish_night(stored).await);
        }
        Ok(stored)
    }
}

/// Statuses a force-skip can move on from.
pub(super) fn is_skippable(status: RoomStatus) -> bool {
    matches!(
        status,
        RoomStatus::NightWolf
            | RoomStatus::NightSeer
            | RoomStatus::NightWitch
            | RoomStatus::NightFinished
    )
}
