use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};
use weighin_store::{InMemorySnapshotStore, PersistOutcome, SnapshotStore};
use weighin_types::{
    BoatId, BoatLog, Category, EntryChanges, EntryDraft, EntryId, FishEntry, LedgerSnapshot,
    Tournament, TournamentDay, TournamentId,
};

use crate::error::{LedgerError, LedgerResult};
use crate::limits::{self, CATCH_LIMIT};
use crate::notifier::{ChangeKind, ChangeNotifier, ChangeStream, LedgerObserver};

/// Authoritative record of every fish weighed in one tournament.
///
/// Every successful mutation is saved through the store and then published.
/// Save failures are logged and never undo the in-memory change.
pub struct WeighInLedger {
    snapshot: LedgerSnapshot,
    store: Arc<dyn SnapshotStore>,
    /// Memory mirrors the store; only then may removing the last entry
    /// delete the stored record.
    hydrated: bool,
    notifier: ChangeNotifier,
}

impl WeighInLedger {
    /// An empty ledger backed by its own in-memory store.
    ///
    /// Ledgers that save to a shared store come from [`WeighInLedger::open`].
    pub fn new(tournament: &Tournament) -> Self {
        Self {
            hydrated: true,
            ..Self::unhydrated(tournament, Arc::new(InMemorySnapshotStore::new()))
        }
    }

    fn unhydrated(tournament: &Tournament, store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            snapshot: LedgerSnapshot::empty(tournament.id.clone(), tournament.division),
            store,
            hydrated: false,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Hydrate from the store. Missing or unreadable data yields an empty ledger.
    pub fn open(tournament: &Tournament, store: Arc<dyn SnapshotStore>) -> Self {
        let mut ledger = Self::unhydrated(tournament, store);
        match ledger.store.load(&tournament.id) {
            Ok(Some(snapshot)) => {
                ledger.snapshot = conform(snapshot, tournament);
                ledger.hydrated = true;
                info!(
                    tournament = %tournament.id,
                    boats = ledger.snapshot.boats.len(),
                    entries = ledger.snapshot.entry_count(),
                    "ledger loaded"
                );
            }
            Ok(None) => {
                ledger.hydrated = true;
                debug!(tournament = %tournament.id, "no stored ledger; starting empty");
            }
            Err(e) => warn!(
                tournament = %tournament.id,
                error = %e,
                "failed to load ledger; starting empty"
            ),
        }
        ledger
    }

    pub fn tournament_id(&self) -> &TournamentId {
        &self.snapshot.tournament_id
    }

    /// Record a new catch if its bucket has room.
    pub fn append(&mut self, draft: EntryDraft) -> LedgerResult<FishEntry> {
        self.check_room(&draft.boat_id, draft.day, draft.category)?;

        let entry = FishEntry::from_draft(self.snapshot.tournament_id.clone(), draft);
        let index = match self
            .snapshot
            .boats
            .iter()
            .position(|log| log.boat_id == entry.boat_id)
        {
            Some(index) => index,
            None => {
                self.snapshot.boats.push(BoatLog::new(entry.boat_id.clone()));
                self.snapshot.boats.len() - 1
            }
        };
        self.snapshot.boats[index].entries.push(entry.clone());

        info!(
            entry_id = %entry.id,
            boat = %entry.boat_id,
            day = %entry.day,
            category = %entry.category,
            "entry appended"
        );
        self.commit(ChangeKind::Appended(entry.id));
        Ok(entry)
    }

    /// Edit an entry in place.
    ///
    /// A category change needs room in the destination bucket. A set
    /// `expected_revision` must match the entry's current revision.
    pub fn update(&mut self, id: EntryId, changes: EntryChanges) -> LedgerResult<FishEntry> {
        let (b, e) = self.locate(&id)?;
        let current = &self.snapshot.boats[b].entries[e];

        if let Some(expected) = changes.expected_revision {
            if expected != current.revision {
                return Err(LedgerError::StaleRevision {
                    entry: id,
                    expected,
                    actual: current.revision,
                });
            }
        }
        if let Some(category) = changes.category {
            if category != current.category {
                let (boat, day) = (current.boat_id.clone(), current.day);
                self.check_room(&boat, day, category)?;
            }
        }

        let entry = &mut self.snapshot.boats[b].entries[e];
        entry.apply(&changes);
        let updated = entry.clone();

        info!(
            entry_id = %id,
            category = %updated.category,
            revision = updated.revision,
            "entry updated"
        );
        self.commit(ChangeKind::Updated(id));
        Ok(updated)
    }

    /// Delete an entry, freeing its slot.
    pub fn remove(&mut self, id: EntryId) -> LedgerResult<FishEntry> {
        let (b, e) = self.locate(&id)?;
        let removed = self.snapshot.boats[b].entries.remove(e);
        info!(entry_id = %id, boat = %removed.boat_id, "entry removed");
        self.commit(ChangeKind::Removed(id));
        Ok(removed)
    }

    /// Replace memory with the persisted record (last write wins) and publish.
    ///
    /// If nothing is stored, memory becomes empty. On a store error memory is
    /// left unchanged.
    pub fn reload(&mut self) -> LedgerResult<()> {
        let tournament_id = self.snapshot.tournament_id.clone();
        let division = self.snapshot.division;
        self.snapshot = match self.store.load(&tournament_id)? {
            Some(mut snapshot) => {
                snapshot.division = division;
                snapshot
            }
            None => LedgerSnapshot::empty(tournament_id.clone(), division),
        };
        self.hydrated = true;
        debug!(
            tournament = %tournament_id,
            entries = self.snapshot.entry_count(),
            "ledger reloaded"
        );
        self.notifier
            .publish(&tournament_id, ChangeKind::Reloaded, &self.snapshot);
        Ok(())
    }

    pub fn get(&self, id: &EntryId) -> Option<&FishEntry> {
        self.snapshot.find(id)
    }

    /// All entries of one boat in submission order.
    pub fn by_boat(&self, boat: &BoatId) -> &[FishEntry] {
        self.snapshot
            .boat(boat)
            .map(|log| log.entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn by_boat_and_day(&self, boat: &BoatId, day: TournamentDay) -> Vec<&FishEntry> {
        self.by_boat(boat).iter().filter(|e| e.day == day).collect()
    }

    /// Boats in the order their first catch was recorded.
    pub fn boats(&self) -> impl Iterator<Item = &BoatId> {
        self.snapshot.boats.iter().map(|log| &log.boat_id)
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }

    pub fn len(&self) -> usize {
        self.snapshot.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    pub fn count(&self, boat: &BoatId, day: TournamentDay, category: Category) -> usize {
        limits::count(&self.snapshot, boat, day, category)
    }

    pub fn can_add(&self, boat: &BoatId, day: TournamentDay, category: Category) -> bool {
        limits::can_add(&self.snapshot, boat, day, category)
    }

    pub fn remaining(&self, boat: &BoatId, day: TournamentDay) -> Vec<(Category, usize)> {
        limits::remaining(&self.snapshot, boat, day)
    }

    pub fn attach_observer(&mut self, observer: Box<dyn LedgerObserver>) {
        self.notifier.attach(observer);
    }

    pub fn subscribe(&self) -> ChangeStream {
        self.notifier.subscribe()
    }

    fn check_room(&self, boat: &BoatId, day: TournamentDay, category: Category) -> LedgerResult<()> {
        if limits::can_add(&self.snapshot, boat, day, category) {
            return Ok(());
        }
        debug!(boat = %boat, day = %day, category = %category, "catch limit reached");
        Err(LedgerError::LimitExceeded {
            boat: boat.clone(),
            day,
            category,
            limit: CATCH_LIMIT,
        })
    }

    fn locate(&self, id: &EntryId) -> LedgerResult<(usize, usize)> {
        self.snapshot
            .boats
            .iter()
            .enumerate()
            .find_map(|(b, log)| log.entries.iter().position(|e| &e.id == id).map(|e| (b, e)))
            .ok_or(LedgerError::NotFound(*id))
    }

    /// Save then publish. Save errors are logged, never returned.
    fn commit(&mut self, kind: ChangeKind) {
        let tournament_id = self.snapshot.tournament_id.clone();
        // Removing the last entry is a deliberate wipe; `persist` would refuse it.
        let wipe = self.hydrated && matches!(kind, ChangeKind::Removed(_));
        let result = if wipe && self.snapshot.is_empty() {
            self.store.delete(&tournament_id).map(|_| PersistOutcome::Written)
        } else {
            self.store.persist(&self.snapshot)
        };
        match result {
            Ok(PersistOutcome::Written) => debug!(tournament = %tournament_id, "ledger saved"),
            Ok(PersistOutcome::SkippedEmpty) => {}
            Err(e) => warn!(
                tournament = %tournament_id,
                error = %e,
                "failed to save ledger; keeping in-memory change"
            ),
        }
        self.notifier.publish(&tournament_id, kind, &self.snapshot);
    }
}

/// Align a loaded snapshot with the tournament it is opened for.
fn conform(mut snapshot: LedgerSnapshot, tournament: &Tournament) -> LedgerSnapshot {
    if snapshot.division != tournament.division {
        warn!(
            tournament = %tournament.id,
            stored = %snapshot.division,
            configured = %tournament.division,
            "stored ledger division differs from tournament; using tournament division"
        );
        snapshot.division = tournament.division;
    }
    snapshot
}

impl fmt::Debug for WeighInLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeighInLedger")
            .field("tournament", &self.snapshot.tournament_id)
            .field("boats", &self.snapshot.boats.len())
            .field("entries", &self.snapshot.entry_count())
            .field("notifier", &self.notifier)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::LedgerChange;
    use proptest::prelude::*;
    use std::sync::Mutex;
    use weighin_store::{FileSnapshotStore, InMemorySnapshotStore, StoreError, StoreResult};
    use weighin_types::{AnglerId, Division};

    fn tournament(division: Division) -> Tournament {
        Tournament::new(TournamentId::new("summer-slam").unwrap(), "Summer Slam", division, 2)
            .unwrap()
    }

    fn boat(s: &str) -> BoatId {
        BoatId::new(s).unwrap()
    }

    fn day(n: u16) -> TournamentDay {
        TournamentDay::new(n).unwrap()
    }

    fn draft(b: &str, d: u16, category: Category, weight: f64) -> EntryDraft {
        EntryDraft::new(boat(b), AnglerId::new("cap").unwrap(), day(d), category).weight(weight)
    }

    fn ledger() -> (WeighInLedger, Arc<InMemorySnapshotStore>) {
        let store = Arc::new(InMemorySnapshotStore::new());
        let ledger = WeighInLedger::open(&tournament(Division::Offshore), store.clone());
        (ledger, store)
    }

    /// Store whose every operation fails.
    struct BrokenStore;

    impl SnapshotStore for BrokenStore {
        fn load(&self, _: &TournamentId) -> StoreResult<Option<LedgerSnapshot>> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }
        fn write(&self, _: &LedgerSnapshot) -> StoreResult<()> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }
        fn delete(&self, _: &TournamentId) -> StoreResult<bool> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }
        fn tournaments(&self) -> StoreResult<Vec<TournamentId>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn four_per_bucket_then_rejected() {
        let (mut ledger, _) = ledger();
        for _ in 0..CATCH_LIMIT {
            ledger.append(draft("reel-deal", 1, Category::Snapper, 6.0)).unwrap();
        }
        let err = ledger
            .append(draft("reel-deal", 1, Category::Snapper, 6.0))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::LimitExceeded { limit: CATCH_LIMIT, category: Category::Snapper, .. }
        ));
        assert_eq!(ledger.len(), CATCH_LIMIT);

        // Other buckets are unaffected.
        ledger.append(draft("reel-deal", 1, Category::Mackerel, 3.0)).unwrap();
        ledger.append(draft("reel-deal", 2, Category::Snapper, 6.0)).unwrap();
        ledger.append(draft("other", 1, Category::Snapper, 6.0)).unwrap();
        assert_eq!(ledger.len(), CATCH_LIMIT + 3);
    }

    #[test]
    fn append_persists_and_assigns_ids() {
        let (mut ledger, store) = ledger();
        let a = ledger.append(draft("a", 1, Category::Wahoo, 30.0)).unwrap();
        let b = ledger.append(draft("a", 1, Category::Wahoo, 31.0)).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.revision, 1);
        assert_eq!(ledger.get(&a.id), Some(&a));

        let stored = store.load(ledger.tournament_id()).unwrap().unwrap();
        assert_eq!(&stored, ledger.snapshot());
    }

    #[test]
    fn boats_keep_first_submission_order() {
        let (mut ledger, _) = ledger();
        ledger.append(draft("zulu", 1, Category::Tuna, 50.0)).unwrap();
        ledger.append(draft("alpha", 1, Category::Tuna, 50.0)).unwrap();
        ledger.append(draft("zulu", 2, Category::Tuna, 50.0)).unwrap();
        let order: Vec<_> = ledger.boats().map(BoatId::as_str).collect();
        assert_eq!(order, ["zulu", "alpha"]);
        assert_eq!(ledger.by_boat(&boat("zulu")).len(), 2);
        assert_eq!(ledger.by_boat_and_day(&boat("zulu"), day(2)).len(), 1);
        assert!(ledger.by_boat(&boat("nobody")).is_empty());
    }

    #[test]
    fn edit_into_full_bucket_is_rejected() {
        let (mut ledger, _) = ledger();
        for _ in 0..CATCH_LIMIT {
            ledger.append(draft("a", 1, Category::Mackerel, 3.0)).unwrap();
        }
        let snapper = ledger.append(draft("a", 1, Category::Snapper, 6.0)).unwrap();

        let err = ledger
            .update(snapper.id, EntryChanges::new().category(Category::Mackerel))
            .unwrap_err();
        assert!(matches!(err, LedgerError::LimitExceeded { .. }));
        assert_eq!(ledger.get(&snapper.id), Some(&snapper));
        assert_eq!(ledger.count(&boat("a"), day(1), Category::Mackerel), CATCH_LIMIT);
    }

    #[test]
    fn edit_moves_entry_between_buckets() {
        let (mut ledger, _) = ledger();
        let entry = ledger.append(draft("a", 1, Category::Snapper, 6.0)).unwrap();
        let updated = ledger
            .update(
                entry.id,
                EntryChanges::new().category(Category::Grouper).weight(Some(12.0)),
            )
            .unwrap();
        assert_eq!(updated.category, Category::Grouper);
        assert_eq!(updated.weight, Some(12.0));
        assert_eq!(updated.revision, 2);
        assert_eq!(ledger.count(&boat("a"), day(1), Category::Snapper), 0);
        assert_eq!(ledger.count(&boat("a"), day(1), Category::Grouper), 1);
    }

    #[test]
    fn same_category_edit_in_full_bucket_is_allowed() {
        let (mut ledger, _) = ledger();
        let mut last = None;
        for _ in 0..CATCH_LIMIT {
            last = Some(ledger.append(draft("a", 1, Category::Dolphin, 20.0)).unwrap());
        }
        let id = last.unwrap().id;
        let updated = ledger
            .update(id, EntryChanges::new().category(Category::Dolphin).weight(Some(22.0)))
            .unwrap();
        assert_eq!(updated.weight, Some(22.0));
    }

    #[test]
    fn stale_revision_is_rejected() {
        let (mut ledger, _) = ledger();
        let entry = ledger.append(draft("a", 1, Category::Cobia, 25.0)).unwrap();
        ledger
            .update(entry.id, EntryChanges::new().weight(Some(26.0)).expect_revision(1))
            .unwrap();
        let err = ledger
            .update(entry.id, EntryChanges::new().weight(Some(99.0)).expect_revision(1))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::StaleRevision { expected: 1, actual: 2, .. }
        ));
        assert_eq!(ledger.get(&entry.id).unwrap().weight, Some(26.0));
    }

    #[test]
    fn missing_ids_are_not_found() {
        let (mut ledger, _) = ledger();
        let ghost = EntryId::new();
        assert!(matches!(
            ledger.update(ghost, EntryChanges::new()),
            Err(LedgerError::NotFound(id)) if id == ghost
        ));
        assert!(matches!(ledger.remove(ghost), Err(LedgerError::NotFound(_))));
    }

    #[test]
    fn remove_frees_a_slot() {
        let (mut ledger, _) = ledger();
        let mut ids = Vec::new();
        for _ in 0..CATCH_LIMIT {
            ids.push(ledger.append(draft("a", 1, Category::Snapper, 6.0)).unwrap().id);
        }
        assert!(!ledger.can_add(&boat("a"), day(1), Category::Snapper));
        let removed = ledger.remove(ids[1]).unwrap();
        assert_eq!(removed.id, ids[1]);
        assert!(ledger.get(&ids[1]).is_none());
        ledger.append(draft("a", 1, Category::Snapper, 6.0)).unwrap();
    }

    #[test]
    fn removing_last_entry_clears_the_store() {
        let (mut ledger, store) = ledger();
        let entry = ledger.append(draft("a", 1, Category::Snapper, 6.0)).unwrap();
        ledger.remove(entry.id).unwrap();
        assert!(store.load(ledger.tournament_id()).unwrap().is_none());

        let reopened = WeighInLedger::open(&tournament(Division::Offshore), store);
        assert!(reopened.is_empty());
    }

    #[test]
    fn open_hydrates_from_store() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let t = tournament(Division::Offshore);
        let mut first = WeighInLedger::open(&t, store.clone());
        let entry = first.append(draft("a", 1, Category::Tuna, 80.0)).unwrap();

        let second = WeighInLedger::open(&t, store);
        assert_eq!(second.get(&entry.id), Some(&entry));
    }

    #[test]
    fn unsaved_ledger_leaves_shared_store_alone() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let t = tournament(Division::Offshore);
        let mut first = WeighInLedger::open(&t, store.clone());
        for _ in 0..3 {
            first.append(draft("a", 1, Category::Tuna, 80.0)).unwrap();
        }

        let mut scratch = WeighInLedger::new(&t);
        let entry = scratch.append(draft("b", 1, Category::Wahoo, 30.0)).unwrap();
        scratch.remove(entry.id).unwrap();

        let stored = store.load(&t.id).unwrap().unwrap();
        assert_eq!(stored.entry_count(), 3);
        assert_eq!(&stored, first.snapshot());
    }

    /// Store that cannot be read but accepts writes, counting deletes.
    #[derive(Default)]
    struct UnreadableStore {
        inner: InMemorySnapshotStore,
        deletes: Mutex<usize>,
    }

    impl SnapshotStore for UnreadableStore {
        fn load(&self, _: &TournamentId) -> StoreResult<Option<LedgerSnapshot>> {
            Err(StoreError::Io(std::io::Error::other("permission denied")))
        }
        fn write(&self, snapshot: &LedgerSnapshot) -> StoreResult<()> {
            self.inner.write(snapshot)
        }
        fn delete(&self, tournament: &TournamentId) -> StoreResult<bool> {
            *self.deletes.lock().unwrap() += 1;
            self.inner.delete(tournament)
        }
        fn tournaments(&self) -> StoreResult<Vec<TournamentId>> {
            self.inner.tournaments()
        }
    }

    #[test]
    fn degraded_open_never_deletes_the_record() {
        let store = Arc::new(UnreadableStore::default());
        let t = tournament(Division::Offshore);
        let mut ledger = WeighInLedger::open(&t, store.clone());
        let entry = ledger.append(draft("a", 1, Category::Tuna, 80.0)).unwrap();
        ledger.remove(entry.id).unwrap();

        assert!(ledger.is_empty());
        assert_eq!(*store.deletes.lock().unwrap(), 0);
    }

    #[test]
    fn open_survives_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileSnapshotStore::open(dir.path()).unwrap());
        let t = tournament(Division::Offshore);
        std::fs::write(store.path_for(&t.id), b"{ broken").unwrap();

        let ledger = WeighInLedger::open(&t, store);
        assert!(ledger.is_empty());
    }

    #[test]
    fn broken_store_never_undoes_mutations() {
        let t = tournament(Division::Offshore);
        let mut ledger = WeighInLedger::open(&t, Arc::new(BrokenStore));
        assert!(ledger.is_empty());

        let mut rx = ledger.subscribe();
        let entry = ledger.append(draft("a", 1, Category::Tuna, 80.0)).unwrap();
        assert_eq!(ledger.get(&entry.id), Some(&entry));
        assert_eq!(rx.try_recv().unwrap().kind, ChangeKind::Appended(entry.id));

        ledger.remove(entry.id).unwrap();
        assert!(ledger.is_empty());
        assert!(ledger.reload().is_err());
    }

    #[test]
    fn reload_is_last_write_wins() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let t = tournament(Division::Offshore);
        let mut mine = WeighInLedger::open(&t, store.clone());
        let mut theirs = WeighInLedger::open(&t, store.clone());

        mine.append(draft("a", 1, Category::Tuna, 80.0)).unwrap();
        let latest = theirs.append(draft("b", 1, Category::Wahoo, 40.0)).unwrap();

        let mut rx = mine.subscribe();
        mine.reload().unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine.get(&latest.id), Some(&latest));
        assert_eq!(rx.try_recv().unwrap().kind, ChangeKind::Reloaded);
    }

    #[test]
    fn every_mutation_is_published() {
        #[derive(Default)]
        struct Kinds(Vec<ChangeKind>);
        impl LedgerObserver for Kinds {
            fn on_change(&mut self, change: &LedgerChange) {
                self.0.push(change.kind);
            }
        }

        let (mut ledger, _) = ledger();
        let kinds = Arc::new(Mutex::new(Kinds::default()));
        ledger.attach_observer(Box::new(Arc::clone(&kinds)));
        let mut rx = ledger.subscribe();

        let entry = ledger.append(draft("a", 1, Category::Tuna, 80.0)).unwrap();
        ledger.update(entry.id, EntryChanges::new().weight(Some(81.0))).unwrap();
        // Rejected mutations publish nothing.
        let _ = ledger.update(EntryId::new(), EntryChanges::new());
        ledger.remove(entry.id).unwrap();

        assert_eq!(
            kinds.lock().unwrap().0,
            vec![
                ChangeKind::Appended(entry.id),
                ChangeKind::Updated(entry.id),
                ChangeKind::Removed(entry.id),
            ]
        );
        let first = rx.try_recv().unwrap();
        assert_eq!(first.snapshot.entry_count(), 1);
        assert_eq!(first.tournament_id, *ledger.tournament_id());
    }

    proptest! {
        #[test]
        fn buckets_never_exceed_limit(
            ops in prop::collection::vec((0usize..3, 1u16..=2, 0usize..3), 1..60)
        ) {
            let (mut ledger, _) = ledger();
            let boats = ["a", "b", "c"];
            let categories = [Category::Snapper, Category::Mackerel, Category::Tuna];
            for (b, d, c) in ops {
                let _ = ledger.append(draft(boats[b], d, categories[c], 5.0));
            }
            for b in boats {
                for d in 1..=2 {
                    for c in categories {
                        prop_assert!(ledger.count(&boat(b), day(d), c) <= CATCH_LIMIT);
                    }
                }
            }
        }
    }
}
