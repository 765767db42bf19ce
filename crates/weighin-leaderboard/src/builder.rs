use tracing::debug;
use weighin_roster::BoatRoster;
use weighin_scoring::{score, ScoringMatrix};
use weighin_types::{FishEntry, LedgerSnapshot, TournamentDay};

use crate::standings::{rank, AnglerStanding, BoatStanding, TieBreak};

/// Boat board with the default tie-break.
pub fn boat_standings(
    snapshot: &LedgerSnapshot,
    matrix: &ScoringMatrix,
    selected_day: TournamentDay,
) -> Vec<BoatStanding> {
    StandingsBuilder::new(matrix).boats(snapshot, selected_day)
}

/// Angler board with the default tie-break.
pub fn angler_standings(
    snapshot: &LedgerSnapshot,
    rosters: &[BoatRoster],
    matrix: &ScoringMatrix,
    selected_day: TournamentDay,
) -> Vec<AnglerStanding> {
    StandingsBuilder::new(matrix).anglers(snapshot, rosters, selected_day)
}

/// Deterministic standings projection over a ledger snapshot.
#[derive(Clone, Copy, Debug)]
pub struct StandingsBuilder<'a> {
    matrix: &'a ScoringMatrix,
    tie_break: TieBreak,
}

#[derive(Default)]
struct Tally {
    total: u64,
    daily: u64,
    count: usize,
    last: Option<chrono::DateTime<chrono::Utc>>,
}

impl<'a> StandingsBuilder<'a> {
    pub fn new(matrix: &'a ScoringMatrix) -> Self {
        Self {
            matrix,
            tie_break: TieBreak::default(),
        }
    }

    pub fn tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// One row per boat in the ledger, ranked.
    pub fn boats(&self, snapshot: &LedgerSnapshot, selected_day: TournamentDay) -> Vec<BoatStanding> {
        let mut rows: Vec<BoatStanding> = snapshot
            .boats
            .iter()
            .map(|log| {
                let tally = self.tally(snapshot, log.entries.iter(), selected_day);
                BoatStanding {
                    boat_id: log.boat_id.clone(),
                    total_points: tally.total,
                    daily_points: tally.daily,
                    entry_count: tally.count,
                    last_catch: tally.last,
                }
            })
            .collect();
        rank(&mut rows, self.tie_break);
        debug!(
            tournament = %snapshot.tournament_id,
            day = %selected_day,
            boats = rows.len(),
            "boat standings computed"
        );
        rows
    }

    /// One row per rostered angler, walking each roster captain first.
    ///
    /// Only entries recorded for the angler on their own boat count.
    pub fn anglers(
        &self,
        snapshot: &LedgerSnapshot,
        rosters: &[BoatRoster],
        selected_day: TournamentDay,
    ) -> Vec<AnglerStanding> {
        let mut rows = Vec::new();
        for roster in rosters {
            let log = snapshot.boat(&roster.boat_id);
            for member in roster.members() {
                let entries = log
                    .into_iter()
                    .flat_map(|l| l.entries.iter())
                    .filter(|e| e.angler_id == member.angler_id);
                let tally = self.tally(snapshot, entries, selected_day);
                rows.push(AnglerStanding {
                    angler_id: member.angler_id.clone(),
                    boat_id: roster.boat_id.clone(),
                    name: member.name.clone(),
                    is_member: member.is_member,
                    total_points: tally.total,
                    daily_points: tally.daily,
                    entry_count: tally.count,
                    last_catch: tally.last,
                });
            }
        }
        rank(&mut rows, self.tie_break);
        debug!(
            tournament = %snapshot.tournament_id,
            day = %selected_day,
            anglers = rows.len(),
            "angler standings computed"
        );
        rows
    }

    fn tally<'e>(
        &self,
        snapshot: &LedgerSnapshot,
        entries: impl Iterator<Item = &'e FishEntry>,
        selected_day: TournamentDay,
    ) -> Tally {
        entries.fold(Tally::default(), |mut t, entry| {
            let points = u64::from(score(entry, snapshot.division, self.matrix));
            t.total += points;
            if entry.day == selected_day {
                t.daily += points;
            }
            t.count += 1;
            t.last = t.last.max(Some(entry.created_at));
            t
        })
    }
}
