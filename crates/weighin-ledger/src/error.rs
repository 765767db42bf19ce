use weighin_store::StoreError;
use weighin_types::{BoatId, Category, EntryId, TournamentDay};

/// Errors produced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("catch limit reached: boat {boat} already has {limit} {category} on day {day}")]
    LimitExceeded {
        boat: BoatId,
        day: TournamentDay,
        category: Category,
        limit: usize,
    },

    #[error("entry not found: {0}")]
    NotFound(EntryId),

    #[error("stale edit of entry {entry}: expected revision {expected}, found {actual}")]
    StaleRevision {
        entry: EntryId,
        expected: u32,
        actual: u32,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
