//! Domain layer: pure werewolf rules over an in-memory room aggregate.

pub mod action_log;
pub mod day;
pub mod dealing;
pub mod election;
pub mod lobby;
pub mod night;
pub mod phase;
pub mod snapshot;
pub mod speech;
pub mod state;

#[cfg(test)]
mod tests_day;
#[cfg(test)]
mod tests_election;
#[cfg(test)]
mod tests_night;

// Re-exports for ergonomics
pub use action_log::{ActionLog, RoundLog, SeerCheck, SeerVerdict, WitchAction};
pub use day::DayOutcome;
pub use night::{WitchCommand, WolfOutcome};
pub use phase::{advance, next_status, PhaseEvent};
pub use speech::Direction;
pub use state::{
    NightRole, Player, Role, Room, RoomAggregate, RoomStatus, RoundNo, Seat, SettingsChoice,
    StartConfig, UserId, ROOM_SIZE,
};
