use thiserror::Error;

/// Errors produced by type construction and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("identifier must not be empty")]
    EmptyIdentifier,

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown division: {0}")]
    UnknownDivision(String),

    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    #[error("tournament day must be 1 or greater, got {0}")]
    InvalidDay(u16),

    #[error("invalid entry id: {0}")]
    InvalidEntryId(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
