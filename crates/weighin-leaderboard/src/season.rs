use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use weighin_ledger::{LedgerChange, LedgerObserver};
use weighin_scoring::{score, ScoringMatrix};
use weighin_types::{AnglerId, LedgerSnapshot, TournamentId};

/// An angler's club-wide points across every tournament seen so far.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeasonTotal {
    pub angler_id: AnglerId,
    pub points: u64,
    pub entries: usize,
    pub tournaments: usize,
}

/// Annual standings kept current from ledger change notifications.
///
/// Holds the latest snapshot of every tournament and recomputes totals from
/// all of them whenever one changes. Feeding the same snapshot twice is a
/// no-op.
#[derive(Debug)]
pub struct SeasonStandings {
    matrix: Arc<ScoringMatrix>,
    members: Option<HashSet<AnglerId>>,
    snapshots: BTreeMap<TournamentId, Arc<LedgerSnapshot>>,
    totals: Vec<SeasonTotal>,
}

impl SeasonStandings {
    pub fn new(matrix: Arc<ScoringMatrix>) -> Self {
        Self {
            matrix,
            members: None,
            snapshots: BTreeMap::new(),
            totals: Vec::new(),
        }
    }

    /// Only count these anglers. Without a member list everyone counts.
    pub fn with_members(mut self, members: impl IntoIterator<Item = AnglerId>) -> Self {
        self.members = Some(members.into_iter().collect());
        self.recompute();
        self
    }

    /// Record the latest snapshot of a tournament. Returns `false` if it
    /// matched the one already held.
    pub fn apply(&mut self, tournament: TournamentId, snapshot: Arc<LedgerSnapshot>) -> bool {
        if let Some(held) = self.snapshots.get(&tournament) {
            if Arc::ptr_eq(held, &snapshot) || **held == *snapshot {
                return false;
            }
        }
        self.snapshots.insert(tournament, snapshot);
        self.recompute();
        true
    }

    /// Ranked descending by points; ties by angler id.
    pub fn totals(&self) -> &[SeasonTotal] {
        &self.totals
    }

    pub fn points_for(&self, angler: &AnglerId) -> u64 {
        self.totals
            .iter()
            .find(|t| &t.angler_id == angler)
            .map_or(0, |t| t.points)
    }

    pub fn tournaments(&self) -> impl Iterator<Item = &TournamentId> {
        self.snapshots.keys()
    }

    fn counts(&self, angler: &AnglerId) -> bool {
        self.members.as_ref().map_or(true, |m| m.contains(angler))
    }

    fn recompute(&mut self) {
        let mut acc: BTreeMap<&AnglerId, (u64, usize, BTreeSet<&TournamentId>)> = BTreeMap::new();
        for (tournament, snapshot) in &self.snapshots {
            for entry in snapshot.entries() {
                if !self.counts(&entry.angler_id) {
                    continue;
                }
                let points = u64::from(score(entry, snapshot.division, &self.matrix));
                let slot = acc.entry(&entry.angler_id).or_default();
                slot.0 += points;
                slot.1 += 1;
                slot.2.insert(tournament);
            }
        }

        let mut totals: Vec<SeasonTotal> = acc
            .into_iter()
            .map(|(angler, (points, entries, seen))| SeasonTotal {
                angler_id: angler.clone(),
                points,
                entries,
                tournaments: seen.len(),
            })
            .collect();
        totals.sort_by(|a, b| b.points.cmp(&a.points));
        debug!(
            tournaments = self.snapshots.len(),
            anglers = totals.len(),
            "season standings recomputed"
        );
        self.totals = totals;
    }
}

impl LedgerObserver for SeasonStandings {
    fn on_change(&mut self, change: &LedgerChange) {
        self.apply(change.tournament_id.clone(), Arc::clone(&change.snapshot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use weighin_ledger::WeighInLedger;
    use weighin_scoring::{Breakpoint, ScoringRule};
    use weighin_types::{
        BoatId, Category, Division, EntryDraft, Metric, Tournament, TournamentDay,
    };

    fn matrix() -> Arc<ScoringMatrix> {
        Arc::new(
            ScoringMatrix::from_rules([ScoringRule {
                division: Division::Nearshore,
                category: Category::Redfish,
                metric: Metric::Length,
                breakpoints: vec![Breakpoint::new(20.0, 10), Breakpoint::new(27.0, 25)],
            }])
            .unwrap(),
        )
    }

    fn tournament(id: &str) -> Tournament {
        Tournament::new(TournamentId::new(id).unwrap(), id, Division::Nearshore, 1).unwrap()
    }

    fn redfish(angler: &str, length: f64) -> EntryDraft {
        EntryDraft::new(
            BoatId::new("skiff").unwrap(),
            AnglerId::new(angler).unwrap(),
            TournamentDay::FIRST,
            Category::Redfish,
        )
        .length(length)
    }

    fn aid(s: &str) -> AnglerId {
        AnglerId::new(s).unwrap()
    }

    #[test]
    fn totals_accumulate_across_tournaments() {
        let season = Arc::new(Mutex::new(SeasonStandings::new(matrix())));
        let mut spring = WeighInLedger::new(&tournament("spring"));
        let mut fall = WeighInLedger::new(&tournament("fall"));
        spring.attach_observer(Box::new(Arc::clone(&season)));
        fall.attach_observer(Box::new(Arc::clone(&season)));

        spring.append(redfish("ann", 28.0)).unwrap();
        spring.append(redfish("bo", 21.0)).unwrap();
        fall.append(redfish("ann", 22.0)).unwrap();

        let season = season.lock().unwrap();
        assert_eq!(season.points_for(&aid("ann")), 35);
        assert_eq!(season.points_for(&aid("bo")), 10);
        assert_eq!(season.totals()[0].angler_id, aid("ann"));
        assert_eq!(season.totals()[0].tournaments, 2);
        assert_eq!(season.tournaments().count(), 2);
    }

    #[test]
    fn repeated_snapshot_is_idempotent() {
        let mut season = SeasonStandings::new(matrix());
        let mut ledger = WeighInLedger::new(&tournament("spring"));
        ledger.append(redfish("ann", 28.0)).unwrap();
        let snapshot = Arc::new(ledger.snapshot().clone());
        let tid = ledger.tournament_id().clone();

        assert!(season.apply(tid.clone(), Arc::clone(&snapshot)));
        let before = season.totals().to_vec();
        assert!(!season.apply(tid.clone(), Arc::new((*snapshot).clone())));
        assert_eq!(season.totals(), before.as_slice());
    }

    #[test]
    fn later_snapshot_replaces_earlier_one() {
        let season = Arc::new(Mutex::new(SeasonStandings::new(matrix())));
        let mut ledger = WeighInLedger::new(&tournament("spring"));
        ledger.attach_observer(Box::new(Arc::clone(&season)));

        let entry = ledger.append(redfish("ann", 28.0)).unwrap();
        ledger.append(redfish("ann", 21.0)).unwrap();
        assert_eq!(season.lock().unwrap().points_for(&aid("ann")), 35);

        ledger.remove(entry.id).unwrap();
        assert_eq!(season.lock().unwrap().points_for(&aid("ann")), 10);
    }

    #[test]
    fn member_filter_excludes_guests() {
        let mut ledger = WeighInLedger::new(&tournament("spring"));
        ledger.append(redfish("ann", 28.0)).unwrap();
        ledger.append(redfish("guest", 30.0)).unwrap();

        let mut season = SeasonStandings::new(matrix()).with_members([aid("ann")]);
        season.apply(
            ledger.tournament_id().clone(),
            Arc::new(ledger.snapshot().clone()),
        );
        assert_eq!(season.totals().len(), 1);
        assert_eq!(season.points_for(&aid("guest")), 0);
    }
}
