use serde::{Deserialize, Serialize};

use crate::division::Division;
use crate::entry::{FishEntry, TournamentDay};
use crate::error::TypeError;
use crate::identity::{BoatId, EntryId, TournamentId};

/// All entries recorded for one boat, in submission order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoatLog {
    pub boat_id: BoatId,
    pub entries: Vec<FishEntry>,
}

impl BoatLog {
    pub fn new(boat_id: BoatId) -> Self {
        Self {
            boat_id,
            entries: Vec::new(),
        }
    }

    /// Entries recorded on the given day.
    pub fn on_day(&self, day: TournamentDay) -> impl Iterator<Item = &FishEntry> {
        self.entries.iter().filter(move |e| e.day == day)
    }
}

/// Full, serializable state of one tournament's ledger.
///
/// Boats appear in the order their first catch was recorded. This order is
/// the natural tie order of the leaderboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub tournament_id: TournamentId,
    pub division: Division,
    #[serde(default)]
    pub boats: Vec<BoatLog>,
}

impl LedgerSnapshot {
    pub fn empty(tournament_id: TournamentId, division: Division) -> Self {
        Self {
            tournament_id,
            division,
            boats: Vec::new(),
        }
    }

    /// Total number of entries across all boats.
    pub fn entry_count(&self) -> usize {
        self.boats.iter().map(|b| b.entries.len()).sum()
    }

    /// `true` when no boat holds any entry.
    pub fn is_empty(&self) -> bool {
        self.boats.iter().all(|b| b.entries.is_empty())
    }

    pub fn boat(&self, boat_id: &BoatId) -> Option<&BoatLog> {
        self.boats.iter().find(|b| &b.boat_id == boat_id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &FishEntry> {
        self.boats.iter().flat_map(|b| b.entries.iter())
    }

    pub fn find(&self, id: &EntryId) -> Option<&FishEntry> {
        self.entries().find(|e| &e.id == id)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, TypeError> {
        serde_json::to_vec_pretty(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, TypeError> {
        serde_json::from_slice(bytes).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::division::Category;
    use crate::entry::EntryDraft;
    use crate::identity::AnglerId;
    use proptest::prelude::*;

    fn tid() -> TournamentId {
        TournamentId::new("summer-slam").unwrap()
    }

    fn entry(boat: &str, day: u16, weight: Option<f64>) -> FishEntry {
        let mut draft = EntryDraft::new(
            BoatId::new(boat).unwrap(),
            AnglerId::new("cap").unwrap(),
            TournamentDay::new(day).unwrap(),
            Category::Dolphin,
        );
        draft.weight = weight;
        FishEntry::from_draft(tid(), draft)
    }

    fn snapshot_with(entries: Vec<FishEntry>) -> LedgerSnapshot {
        let mut snapshot = LedgerSnapshot::empty(tid(), Division::Offshore);
        for e in entries {
            match snapshot.boats.iter_mut().find(|b| b.boat_id == e.boat_id) {
                Some(log) => log.entries.push(e),
                None => {
                    let mut log = BoatLog::new(e.boat_id.clone());
                    log.entries.push(e);
                    snapshot.boats.push(log);
                }
            }
        }
        snapshot
    }

    #[test]
    fn empty_snapshot_reports_empty() {
        let snapshot = LedgerSnapshot::empty(tid(), Division::Offshore);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.entry_count(), 0);
    }

    #[test]
    fn boats_without_entries_still_count_as_empty() {
        let mut snapshot = LedgerSnapshot::empty(tid(), Division::Offshore);
        snapshot.boats.push(BoatLog::new(BoatId::new("a").unwrap()));
        assert!(snapshot.is_empty());
    }

    #[test]
    fn find_and_filter_by_day() {
        let e1 = entry("a", 1, Some(10.0));
        let e2 = entry("a", 2, None);
        let id2 = e2.id;
        let snapshot = snapshot_with(vec![e1, e2]);

        assert_eq!(snapshot.find(&id2).unwrap().day.get(), 2);
        let boat = snapshot.boat(&BoatId::new("a").unwrap()).unwrap();
        assert_eq!(boat.on_day(TournamentDay::FIRST).count(), 1);
    }

    #[test]
    fn corrupt_json_is_a_serialization_error() {
        let err = LedgerSnapshot::from_json(b"{ not json").unwrap_err();
        assert!(matches!(err, TypeError::Serialization(_)));
    }

    proptest! {
        #[test]
        fn json_roundtrip_reproduces_entries(
            specs in prop::collection::vec(
                (0usize..3, 1u16..4, prop::option::of((0u32..800).prop_map(|q| q as f64 / 4.0))),
                0..12,
            )
        ) {
            let boats = ["alpha", "bravo", "charlie"];
            let entries: Vec<FishEntry> = specs
                .into_iter()
                .map(|(b, day, w)| entry(boats[b], day, w))
                .collect();
            let snapshot = snapshot_with(entries);

            let bytes = snapshot.to_json().unwrap();
            let decoded = LedgerSnapshot::from_json(&bytes).unwrap();
            prop_assert_eq!(decoded, snapshot);
        }
    }
}
