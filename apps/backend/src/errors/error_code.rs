//! Error codes for the werewolf backend API.
//!
//! Every rejection the core can produce carries exactly one of these codes.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized, stable reason codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Invalid JWT token
    UnauthorizedInvalidJwt,
    /// JWT token has expired
    UnauthorizedExpiredJwt,

    // Forbidden actors
    /// Actor's role does not match the acting role
    ForbiddenActor,
    /// Actor is dead
    DeadActor,
    /// Only the host may do this
    NotHost,
    /// Only the police badge holder may do this
    NotSheriff,
    /// Player already declared candidacy this election
    AlreadyCandidate,
    /// User is not seated in the room
    NotAMember,

    // Phase
    /// Operation is not valid for the room's current status
    WrongPhase,

    // Request Validation
    /// Missing or malformed input
    InvalidInput,
    /// Target player is not a valid target
    InvalidTarget,
    /// Vote for a player who is not an alive declared candidate
    InvalidCandidate,
    /// Seat number outside 1..=9
    InvalidSeat,
    /// Room does not hold exactly nine players
    WrongPlayerCount,
    /// At least one player has no seat
    NotAllSeated,
    /// At least one player is not ready
    NotAllReady,
    /// Witch attempted to poison herself
    SelfTarget,
    /// Witch self-save forbidden on the first night
    SelfSaveForbidden,
    /// Save requested but the wolves recorded no target
    NoWolfTarget,
    /// Poison requested after a save in the same night
    SaveAndPoison,

    // Resource Not Found
    /// Room not found
    RoomNotFound,
    /// Player not found in the room
    PlayerNotFound,
    /// No room matches the invite code
    InviteCodeNotFound,

    // Business Logic Conflicts
    /// Save potion already used
    AlreadyUsedSave,
    /// Poison potion already used
    AlreadyUsedPoison,
    /// Voter already cast a sheriff vote
    AlreadyVoted,
    /// Optimistic write lost the race
    StaleState,
    /// Seat already taken
    SeatTaken,
    /// Room already holds nine players
    RoomFull,
    /// Could not allocate a unique invite code
    InviteCodeConflict,

    // System Errors
    /// Storage collaborator failed
    StorageFailure,
    /// Database unavailable
    DbUnavailable,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
    /// Persisted data could not be decoded
    DataCorruption,
}

impl ErrorCode {
    /// Every code, for uniqueness checks.
    pub const ALL: &'static [ErrorCode] = &[
        Self::Unauthorized,
        Self::UnauthorizedMissingBearer,
        Self::UnauthorizedInvalidJwt,
        Self::UnauthorizedExpiredJwt,
        Self::ForbiddenActor,
        Self::DeadActor,
        Self::NotHost,
        Self::NotSheriff,
        Self::AlreadyCandidate,
        Self::NotAMember,
        Self::WrongPhase,
        Self::InvalidInput,
        Self::InvalidTarget,
        Self::InvalidCandidate,
        Self::InvalidSeat,
        Self::WrongPlayerCount,
        Self::NotAllSeated,
        Self::NotAllReady,
        Self::SelfTarget,
        Self::SelfSaveForbidden,
        Self::NoWolfTarget,
        Self::SaveAndPoison,
        Self::RoomNotFound,
        Self::PlayerNotFound,
        Self::InviteCodeNotFound,
        Self::AlreadyUsedSave,
        Self::AlreadyUsedPoison,
        Self::AlreadyVoted,
        Self::StaleState,
        Self::SeatTaken,
        Self::RoomFull,
        Self::InviteCodeConflict,
        Self::StorageFailure,
        Self::DbUnavailable,
        Self::Internal,
        Self::ConfigError,
        Self::DataCorruption,
    ];

    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",

            Self::ForbiddenActor => "FORBIDDEN_ACTOR",
            Self::DeadActor => "DEAD_ACTOR",
            Self::NotHost => "NOT_HOST",
            Self::NotSheriff => "NOT_SHERIFF",
            Self::AlreadyCandidate => "ALREADY_CANDIDATE",
            Self::NotAMember => "NOT_A_MEMBER",

            Self::WrongPhase => "WRONG_PHASE",

            Self::InvalidInput => "INVALID_INPUT",
            Self::InvalidTarget => "INVALID_TARGET",
            Self::InvalidCandidate => "INVALID_CANDIDATE",
            Self::InvalidSeat => "INVALID_SEAT",
            Self::WrongPlayerCount => "WRONG_PLAYER_COUNT",
            Self::NotAllSeated => "NOT_ALL_SEATED",
            Self::NotAllReady => "NOT_ALL_READY",
            Self::SelfTarget => "SELF_TARGET",
            Self::SelfSaveForbidden => "SELF_SAVE_FORBIDDEN",
            Self::NoWolfTarget => "NO_WOLF_TARGET",
            Self::SaveAndPoison => "SAVE_AND_POISON",

            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::InviteCodeNotFound => "INVITE_CODE_NOT_FOUND",

            Self::AlreadyUsedSave => "ALREADY_USED_SAVE",
            Self::AlreadyUsedPoison => "ALREADY_USED_POISON",
            Self::AlreadyVoted => "ALREADY_VOTED",
            Self::StaleState => "STALE_STATE",
            Self::SeatTaken => "SEAT_TAKEN",
            Self::RoomFull => "ROOM_FULL",
            Self::InviteCodeConflict => "INVITE_CODE_CONFLICT",

            Self::StorageFailure => "STORAGE_FAILURE",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
