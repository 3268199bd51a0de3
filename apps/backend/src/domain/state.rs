use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::action_log::ActionLog;
use crate::errors::domain::{DomainError, ForbiddenKind, InfraErrorKind, NotFoundKind};

pub type UserId = i64;
pub type RoundNo = u16;
pub type Seat = u8; // 1..=9

/// Seats per room; also the exact player count a game starts with.
pub const ROOM_SIZE: usize = 9;

/// Authoritative room status. Exactly one value at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Lobby,
    Dealing,
    NightWolf,
    NightSeer,
    NightWitch,
    NightFinished,
    PoliceElection,
    DayResultsAnnouncement,
    SheriffSetsSpeechOrder,
    DayDiscussion,
    DayVote,
    Finished,
    Closed,
}

impl RoomStatus {
    pub const ALL: [RoomStatus; 13] = [
        Self::Lobby,
        Self::Dealing,
        Self::NightWolf,
        Self::NightSeer,
        Self::NightWitch,
        Self::NightFinished,
        Self::PoliceElection,
        Self::DayResultsAnnouncement,
        Self::SheriffSetsSpeechOrder,
        Self::DayDiscussion,
        Self::DayVote,
        Self::Finished,
        Self::Closed,
    ];

    /// Role whose turn it is, only while a night sub-phase is active.
    pub const fn night_role(self) -> Option<NightRole> {
        match self {
            Self::NightWolf => Some(NightRole::Wolf),
            Self::NightSeer => Some(NightRole::Seer),
            Self::NightWitch => Some(NightRole::Witch),
            _ => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Closed)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lobby => "lobby",
            Self::Dealing => "dealing",
            Self::NightWolf => "night_wolf",
            Self::NightSeer => "night_seer",
            Self::NightWitch => "night_witch",
            Self::NightFinished => "night_finished",
            Self::PoliceElection => "police_election",
            Self::DayResultsAnnouncement => "day_results_announcement",
            Self::SheriffSetsSpeechOrder => "sheriff_sets_speech_order",
            Self::DayDiscussion => "day_discussion",
            Self::DayVote => "day_vote",
            Self::Finished => "finished",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The role acting during a night sub-phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NightRole {
    Wolf,
    Seer,
    Witch,
}

impl NightRole {
    pub const fn role(self) -> Role {
        match self {
            Self::Wolf => Role::Wolf,
            Self::Seer => Role::Seer,
            Self::Witch => Role::Witch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Wolf,
    Seer,
    Witch,
    Hunter,
    Villager,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wolf => "wolf",
            Self::Seer => "seer",
            Self::Witch => "witch",
            Self::Hunter => "hunter",
            Self::Villager => "villager",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wolf" => Ok(Self::Wolf),
            "seer" => Ok(Self::Seer),
            "witch" => Ok(Self::Witch),
            "hunter" => Ok(Self::Hunter),
            "villager" => Ok(Self::Villager),
            other => Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("unknown role '{other}'"),
            )),
        }
    }
}

/// Room settings picked by the host at creation.
///
/// `A` forbids the witch from saving herself on the first night, `B` allows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingsChoice {
    A,
    B,
}

impl SettingsChoice {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }

    pub const fn start_config(self) -> StartConfig {
        StartConfig {
            witch_can_self_save_first_night: matches!(self, Self::B),
        }
    }
}

impl FromStr for SettingsChoice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            _ => Err(()),
        }
    }
}

/// Frozen at game start; never mutated afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartConfig {
    pub witch_can_self_save_first_night: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub user_id: UserId,
    pub seat_number: Option<Seat>,
    pub is_ready: bool,
    pub role: Option<Role>,
    pub is_alive: bool,
    pub has_used_witch_save: bool,
    pub has_used_witch_poison: bool,
    pub is_candidate_for_sheriff: bool,
    pub voted_for_sheriff_candidate: Option<UserId>,
}

impl Player {
    /// A freshly joined, unseated player.
    pub fn joined(user_id: UserId) -> Self {
        Self {
            user_id,
            seat_number: None,
            is_ready: false,
            role: None,
            is_alive: true,
            has_used_witch_save: false,
            has_used_witch_poison: false,
            is_candidate_for_sheriff: false,
            voted_for_sheriff_candidate: None,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: String,
    pub host_user_id: UserId,
    pub invite_code: String,
    pub settings: SettingsChoice,
    pub status: RoomStatus,
    pub round_number: Option<RoundNo>,
    pub night_acting_role: Option<NightRole>,
    pub police_badge_holder: Option<UserId>,
    pub speaker_order: Vec<UserId>,
    pub current_speaker: Option<UserId>,
    pub start_config: Option<StartConfig>,
    pub last_night_deaths: Vec<UserId>,
    pub rng_seed: i64,
    pub created_at: OffsetDateTime,
    pub started_at: Option<OffsetDateTime>,
}

impl Room {
    pub fn is_host(&self, user_id: UserId) -> bool {
        self.host_user_id == user_id
    }

    /// Round number, or 0 before the first game starts.
    pub fn round(&self) -> RoundNo {
        self.round_number.unwrap_or(0)
    }
}

/// Everything one compare-and-set write covers: the room row, its players and its log.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomAggregate {
    pub room: Room,
    /// Sorted by ascending user id.
    pub players: Vec<Player>,
    pub log: ActionLog,
    /// Optimistic lock version of the persisted aggregate.
    pub version: i32,
}

impl RoomAggregate {
    pub fn status(&self) -> RoomStatus {
        self.room.status
    }

    pub fn player(&self, user_id: UserId) -> Option<&Player> {
        self.players.iter().find(|p| p.user_id == user_id)
    }

    pub fn player_mut(&mut self, user_id: UserId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.user_id == user_id)
    }

    /// Look up a member of this room, rejecting outsiders.
    pub fn require_member(&self, user_id: UserId) -> Result<&Player, DomainError> {
        self.player(user_id).ok_or_else(|| {
            DomainError::forbidden(
                ForbiddenKind::NotMember,
                format!("User {user_id} is not a member of room {}", self.room.id),
            )
        })
    }

    /// Look up a player referenced as a target.
    pub fn require_player(&self, user_id: UserId) -> Result<&Player, DomainError> {
        self.player(user_id).ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Player,
                format!("Player {user_id} not found in room {}", self.room.id),
            )
        })
    }

    /// Member who is still alive; dead actors are refused.
    pub fn require_alive_member(&self, user_id: UserId) -> Result<&Player, DomainError> {
        let player = self.require_member(user_id)?;
        if !player.is_alive {
            return Err(DomainError::forbidden(
                ForbiddenKind::Dead,
                format!("Player {user_id} is dead and cannot act"),
            ));
        }
        Ok(player)
    }

    pub fn require_host(&self, user_id: UserId) -> Result<(), DomainError> {
        if !self.room.is_host(user_id) {
            return Err(DomainError::forbidden(
                ForbiddenKind::NotHost,
                "Only the host can do this",
            ));
        }
        Ok(())
    }

    /// Alive players ordered by ascending seat.
    pub fn alive_by_seat(&self) -> Vec<&Player> {
        let mut alive: Vec<&Player> = self.players.iter().filter(|p| p.is_alive).collect();
        alive.sort_by_key(|p| p.seat_number);
        alive
    }

    pub fn insert_player(&mut self, player: Player) {
        let at = self
            .players
            .partition_point(|p| p.user_id < player.user_id);
        self.players.insert(at, player);
    }
}
