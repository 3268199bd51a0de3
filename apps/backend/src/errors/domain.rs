//! Domain-level error type used across services and adapters.
//!
//! This error type is HTTP- and DB-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.
//!
//! Every variant is recoverable by the caller: the operation that produced
//! it left the room unchanged.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::ErrorCode;

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    DataCorruption,
    Other(String),
}

/// Missing resources
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Room,
    Player,
    InviteCode,
}

/// Actor is known but not allowed to perform the action
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ForbiddenKind {
    WrongRole,
    Dead,
    NotHost,
    NotSheriff,
    AlreadyCandidate,
    NotMember,
}

/// Input or rule violations
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    WrongPhase,
    InvalidInput,
    InvalidTarget,
    InvalidCandidate,
    InvalidSeat,
    WrongPlayerCount,
    NotAllSeated,
    NotAllReady,
    SelfTarget,
    SelfSaveForbidden,
    NoWolfTarget,
    SaveAndPoison,
}

/// Semantic conflicts, including one-shot resources already spent
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    AlreadyUsedSave,
    AlreadyUsedPoison,
    AlreadyVoted,
    StaleState,
    SeatTaken,
    RoomFull,
    InviteCodeConflict,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or business rule violation
    Validation(ValidationKind, String),
    /// Actor may not perform the action
    Forbidden(ForbiddenKind, String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::Forbidden(kind, d) => write!(f, "forbidden {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn forbidden(kind: ForbiddenKind, detail: impl Into<String>) -> Self {
        Self::Forbidden(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    pub fn wrong_phase(detail: impl Into<String>) -> Self {
        Self::validation(ValidationKind::WrongPhase, detail)
    }

    pub fn stale_state(expected: i32, actual: i32) -> Self {
        Self::conflict(
            ConflictKind::StaleState,
            format!(
                "Room was modified concurrently (expected version {expected}, actual version {actual}). Refetch and retry."
            ),
        )
    }

    pub fn is_stale_state(&self) -> bool {
        matches!(self, DomainError::Conflict(ConflictKind::StaleState, _))
    }

    /// Stable reason code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::WrongPhase => ErrorCode::WrongPhase,
                ValidationKind::InvalidInput => ErrorCode::InvalidInput,
                ValidationKind::InvalidTarget => ErrorCode::InvalidTarget,
                ValidationKind::InvalidCandidate => ErrorCode::InvalidCandidate,
                ValidationKind::InvalidSeat => ErrorCode::InvalidSeat,
                ValidationKind::WrongPlayerCount => ErrorCode::WrongPlayerCount,
                ValidationKind::NotAllSeated => ErrorCode::NotAllSeated,
                ValidationKind::NotAllReady => ErrorCode::NotAllReady,
                ValidationKind::SelfTarget => ErrorCode::SelfTarget,
                ValidationKind::SelfSaveForbidden => ErrorCode::SelfSaveForbidden,
                ValidationKind::NoWolfTarget => ErrorCode::NoWolfTarget,
                ValidationKind::SaveAndPoison => ErrorCode::SaveAndPoison,
            },
            DomainError::Forbidden(kind, _) => match kind {
                ForbiddenKind::WrongRole => ErrorCode::ForbiddenActor,
                ForbiddenKind::Dead => ErrorCode::DeadActor,
                ForbiddenKind::NotHost => ErrorCode::NotHost,
                ForbiddenKind::NotSheriff => ErrorCode::NotSheriff,
                ForbiddenKind::AlreadyCandidate => ErrorCode::AlreadyCandidate,
                ForbiddenKind::NotMember => ErrorCode::NotAMember,
            },
            DomainError::Conflict(kind, _) => match kind {
                ConflictKind::AlreadyUsedSave => ErrorCode::AlreadyUsedSave,
                ConflictKind::AlreadyUsedPoison => ErrorCode::AlreadyUsedPoison,
                ConflictKind::AlreadyVoted => ErrorCode::AlreadyVoted,
                ConflictKind::StaleState => ErrorCode::StaleState,
                ConflictKind::SeatTaken => ErrorCode::SeatTaken,
                ConflictKind::RoomFull => ErrorCode::RoomFull,
                ConflictKind::InviteCodeConflict => ErrorCode::InviteCodeConflict,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Room => ErrorCode::RoomNotFound,
                NotFoundKind::Player => ErrorCode::PlayerNotFound,
                NotFoundKind::InviteCode => ErrorCode::InviteCodeNotFound,
            },
            DomainError::Infra(kind, _) => match kind {
                InfraErrorKind::DbUnavailable => ErrorCode::DbUnavailable,
                InfraErrorKind::DataCorruption => ErrorCode::DataCorruption,
                InfraErrorKind::Timeout | InfraErrorKind::Other(_) => ErrorCode::StorageFailure,
            },
        }
    }
}
