use std::path::PathBuf;

use weighin_types::TournamentId;

/// Errors from snapshot store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The stored record exists but cannot be decoded.
    #[error("corrupt snapshot for tournament {tournament}: {reason}")]
    Corrupt {
        tournament: TournamentId,
        reason: String,
    },

    /// Serialization failure while encoding a snapshot.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The storage directory is missing or is not a directory.
    #[error("store directory unavailable: {0}")]
    Directory(PathBuf),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
