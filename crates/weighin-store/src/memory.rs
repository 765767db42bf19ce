use std::collections::HashMap;
use std::sync::RwLock;

use weighin_types::{LedgerSnapshot, TournamentId};

use crate::error::StoreResult;
use crate::traits::SnapshotStore;

/// In-memory, HashMap-based snapshot store.
///
/// Intended for tests and embedding. Snapshots are held behind a `RwLock`
/// and cloned on read/write.
pub struct InMemorySnapshotStore {
    records: RwLock<HashMap<TournamentId, LedgerSnapshot>>,
}

impl InMemorySnapshotStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Number of tournaments currently stored.
    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().expect("lock poisoned").is_empty()
    }

    /// Remove all records from the store.
    pub fn clear(&self) {
        self.records.write().expect("lock poisoned").clear();
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self, tournament: &TournamentId) -> StoreResult<Option<LedgerSnapshot>> {
        let map = self.records.read().expect("lock poisoned");
        Ok(map.get(tournament).cloned())
    }

    fn write(&self, snapshot: &LedgerSnapshot) -> StoreResult<()> {
        let mut map = self.records.write().expect("lock poisoned");
        map.insert(snapshot.tournament_id.clone(), snapshot.clone());
        Ok(())
    }

    fn delete(&self, tournament: &TournamentId) -> StoreResult<bool> {
        let mut map = self.records.write().expect("lock poisoned");
        Ok(map.remove(tournament).is_some())
    }

    fn tournaments(&self) -> StoreResult<Vec<TournamentId>> {
        let map = self.records.read().expect("lock poisoned");
        let mut ids: Vec<TournamentId> = map.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

impl std::fmt::Debug for InMemorySnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySnapshotStore")
            .field("tournaments", &self.len())
            .finish()
    }
}
