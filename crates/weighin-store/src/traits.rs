use tracing::warn;
use weighin_types::{LedgerSnapshot, TournamentId};

use crate::error::StoreResult;

/// What [`SnapshotStore::persist`] did with a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The record was replaced.
    Written,
    /// The snapshot was empty and the stored record was not; nothing changed.
    SkippedEmpty,
}

/// Durable storage keyed by tournament.
///
/// All implementations must satisfy these invariants:
/// - `write` replaces the record for `snapshot.tournament_id` wholesale.
/// - `load` returns `Ok(None)` when no record exists and `Err` when one
///   exists but cannot be decoded.
/// - All I/O errors are propagated, never silently ignored.
pub trait SnapshotStore: Send + Sync {
    /// Read the record for a tournament.
    fn load(&self, tournament: &TournamentId) -> StoreResult<Option<LedgerSnapshot>>;

    /// Unconditionally replace the record for `snapshot.tournament_id`.
    ///
    /// Prefer [`persist`](Self::persist), which protects stored data from
    /// being clobbered by an empty snapshot.
    fn write(&self, snapshot: &LedgerSnapshot) -> StoreResult<()>;

    /// Delete a tournament's record. Returns `true` if it existed.
    ///
    /// This is the only way to deliberately discard a non-empty record.
    fn delete(&self, tournament: &TournamentId) -> StoreResult<bool>;

    /// Every tournament with a stored record, sorted.
    fn tournaments(&self) -> StoreResult<Vec<TournamentId>>;

    /// Save a snapshot unless it is empty and the stored record is not.
    ///
    /// A view that publishes before its ledger has been hydrated holds an
    /// empty snapshot; writing it would erase real data. If the stored record
    /// cannot be read, the empty snapshot is not written and the error is
    /// returned.
    fn persist(&self, snapshot: &LedgerSnapshot) -> StoreResult<PersistOutcome> {
        if snapshot.is_empty() {
            if let Some(existing) = self.load(&snapshot.tournament_id)? {
                if !existing.is_empty() {
                    warn!(
                        tournament = %snapshot.tournament_id,
                        stored_entries = existing.entry_count(),
                        "refusing to overwrite stored entries with an empty snapshot"
                    );
                    return Ok(PersistOutcome::SkippedEmpty);
                }
            }
        }
        self.write(snapshot)?;
        Ok(PersistOutcome::Written)
    }
}
