use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which reference catalog a lookup went to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    Pokemon,
    Move,
    Ability,
    Nature,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Pokemon => "Pokemon",
            RecordKind::Move => "Move",
            RecordKind::Ability => "Ability",
            RecordKind::Nature => "Nature",
        };
        write!(f, "{}", name)
    }
}

/// Errors raised by the reference data store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// The record does not exist in an otherwise healthy catalog
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },
    /// A data file is missing or cannot be read
    #[error("reference data unavailable at {}: {reason}", path.display())]
    Unavailable { path: PathBuf, reason: String },
    /// A data file was read but its contents are not usable
    #[error("malformed reference data in {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

/// Caller-supplied values the engine refuses
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("level must be between 1 and 20, got {0}")]
    LevelOutOfRange(i64),
    #[error("HP method must be 'average' or 'roll', got '{0}'")]
    UnknownHpMethod(String),
    #[error("unknown type: {0}")]
    UnknownType(String),
    #[error("must select between 1 and 4 moves, got {0}")]
    MoveSelectionCount(usize),
    #[error("invalid move: {0}")]
    MoveNotInPool(String),
    #[error("{0} is not eligible as a starter")]
    NotStarterEligible(String),
    #[error("a starter has already been chosen")]
    AlreadyHasStarter,
    #[error("invalid roster slot {0}, slots are numbered 1-6")]
    InvalidSlot(u8),
    #[error("roster slot {0} is already occupied")]
    SlotOccupied(u8),
    #[error("active roster is full (6/6)")]
    RosterFull,
    #[error("Pokemon is already in storage")]
    AlreadyInStorage,
    #[error("Pokemon is already in the active roster")]
    AlreadyActive,
    #[error("no roster member with id {0}")]
    UnknownMember(u64),
}

/// Main error type for the character builder engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),
    #[error("reference data unavailable: {0}")]
    DataUnavailable(String),
}

/// Coarse failure categories handed back to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorTag {
    NotFound,
    InvalidLevel,
    InvalidMethod,
    InvalidInput,
    DataUnavailable,
}

impl fmt::Display for ErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl EngineError {
    pub fn tag(&self) -> ErrorTag {
        match self {
            EngineError::NotFound { .. } => ErrorTag::NotFound,
            EngineError::InvalidInput(InputError::LevelOutOfRange(_)) => ErrorTag::InvalidLevel,
            EngineError::InvalidInput(InputError::UnknownHpMethod(_)) => ErrorTag::InvalidMethod,
            EngineError::InvalidInput(_) => ErrorTag::InvalidInput,
            EngineError::DataUnavailable(_) => ErrorTag::DataUnavailable,
        }
    }
}

impl From<CatalogError> for EngineError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { kind, id } => EngineError::NotFound { kind, id },
            other => EngineError::DataUnavailable(other.to_string()),
        }
    }
}

/// Errors raised while assembling runtime configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Type alias for Results using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Type alias for Results using CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Lookups where a missing record is expected and handled by the caller.
pub trait OptionalRecord<T> {
    /// `NotFound` becomes `Ok(None)`; every other failure is kept.
    fn optional(self) -> CatalogResult<Option<T>>;
}

impl<T> OptionalRecord<T> for CatalogResult<T> {
    fn optional(self) -> CatalogResult<Option<T>> {
        match self {
            Ok(record) => Ok(Some(record)),
            Err(CatalogError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }
}
