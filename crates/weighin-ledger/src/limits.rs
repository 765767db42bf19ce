//! Per-boat, per-day, per-category catch limits.
//!
//! Counts are always recomputed from the snapshot, never cached, so an edit
//! or removal frees its slot immediately.

use weighin_types::{BoatId, Category, LedgerSnapshot, TournamentDay};

/// Most fish one boat may weigh in one category on one day.
pub const CATCH_LIMIT: usize = 4;

/// Entries already recorded for `(boat, day, category)`.
pub fn count(
    snapshot: &LedgerSnapshot,
    boat: &BoatId,
    day: TournamentDay,
    category: Category,
) -> usize {
    snapshot
        .boat(boat)
        .map(|log| log.on_day(day).filter(|e| e.category == category).count())
        .unwrap_or(0)
}

/// Returns `true` if one more entry fits in the bucket.
pub fn can_add(
    snapshot: &LedgerSnapshot,
    boat: &BoatId,
    day: TournamentDay,
    category: Category,
) -> bool {
    count(snapshot, boat, day, category) < CATCH_LIMIT
}

/// Free slots for every category of the snapshot's division, in display order.
pub fn remaining(
    snapshot: &LedgerSnapshot,
    boat: &BoatId,
    day: TournamentDay,
) -> Vec<(Category, usize)> {
    snapshot
        .division
        .categories()
        .iter()
        .map(|&category| {
            let used = count(snapshot, boat, day, category);
            (category, CATCH_LIMIT.saturating_sub(used))
        })
        .collect()
}
