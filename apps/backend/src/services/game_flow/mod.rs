//! Game flow service: loads a room aggregate, runs one domain rule against it
//! and commits the result through the phase controller.
//!
//! Every write is a compare-and-set on the room's lock version. Losing a race
//! surfaces as `STALE_STATE`; the room is never left between two statuses.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::domain::action_log::SeerVerdict;
use crate::domain::state::{RoomAggregate, RoomStatus, RoundNo, UserId};
use crate::realtime::Publisher;
use crate::repos::rooms::RoomStore;

mod controller;
mod day;
mod election;
mod lobby;
mod night;
mod queries;
mod start;
mod watchdog;

pub use queries::AuditView;

use controller::Controller;

/// Private payload returned only to the requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrivateResult {
    SeerCheck {
        target: UserId,
        verdict: SeerVerdict,
        target_was_alive: bool,
    },
}

/// What every write operation reports back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteOutcome {
    pub status: RoomStatus,
    pub round: RoundNo,
    pub version: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<PrivateResult>,
}

impl WriteOutcome {
    fn of(agg: &RoomAggregate) -> Self {
        Self {
            status: agg.status(),
            round: agg.room.round(),
            version: agg.version,
            private: None,
        }
    }

    fn with_private(mut self, private: PrivateResult) -> Self {
        self.private = Some(private);
        self
    }
}

pub struct GameFlowService {
    ctl: Controller,
}

impl GameFlowService {
    pub fn new(store: Arc<dyn RoomStore>, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            ctl: Controller::new(store, publisher),
        }
    }

    /// Enable the stalled-phase watchdog: a night sub-phase that is still
    /// current `timeout` after it was entered gets force-skipped.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn with_night_timeout(mut self, timeout: Duration) -> Self {
        self.ctl = watchdog::spawn(self.ctl, timeout);
        self
    }
}
