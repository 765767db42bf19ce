use std::sync::Arc;

use tracing::{info, warn};
use weighin_gate::{Action, GateRequest, Identity, WeighInGate};
use weighin_leaderboard::{AnglerStanding, BoatStanding, StandingsBuilder, TieBreak};
use weighin_ledger::{ChangeStream, LedgerObserver, WeighInLedger};
use weighin_roster::{BoatRoster, CrewMember};
use weighin_scoring::{score_detailed, ScoreOutcome, ScoringMatrix};
use weighin_store::{FileSnapshotStore, SnapshotStore};
use weighin_types::{
    BoatId, Category, EntryChanges, EntryDraft, EntryId, FishEntry, Tournament, TournamentDay,
};

use crate::config::WeighInConfig;
use crate::error::{SdkError, SdkResult};
use crate::event::EventFile;

/// Weigh-in console for one tournament.
///
/// Every mutation takes the caller's [`Identity`] and passes the gate
/// before reaching the ledger or a roster. Reads are open.
pub struct WeighIn {
    tournament: Tournament,
    rosters: Vec<BoatRoster>,
    matrix: Arc<ScoringMatrix>,
    ledger: WeighInLedger,
    gate: WeighInGate,
    tie_break: TieBreak,
}

impl WeighIn {
    /// Open a console over `store`, hydrating the ledger from it.
    pub fn new(
        event: EventFile,
        matrix: Arc<ScoringMatrix>,
        store: Arc<dyn SnapshotStore>,
    ) -> Self {
        let ledger = WeighInLedger::open(&event.tournament, store);
        let unscored = matrix.unscored_categories(event.tournament.division);
        if !unscored.is_empty() {
            warn!(
                tournament = %event.tournament.id,
                categories = ?unscored,
                "scoring matrix has no rule for some categories; they will score zero"
            );
        }
        Self {
            tournament: event.tournament,
            rosters: event.rosters,
            matrix,
            ledger,
            gate: WeighInGate::default(),
            tie_break: TieBreak::default(),
        }
    }

    /// Open the console described by a config file's settings.
    pub fn open(config: &WeighInConfig) -> SdkResult<Self> {
        let event = EventFile::load(&config.event_path)?;
        let matrix = Arc::new(ScoringMatrix::load(&config.matrix_path)?);
        let store = Arc::new(FileSnapshotStore::open(&config.data_dir)?);
        Ok(Self::new(event, matrix, store)
            .with_gate(WeighInGate::with_default_stages(config.gate.clone()))
            .with_tie_break(config.tie_break))
    }

    pub fn with_gate(mut self, gate: WeighInGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    // ---- Catch operations ----

    pub fn record_catch(&mut self, who: &Identity, draft: EntryDraft) -> SdkResult<FishEntry> {
        self.gate.authorize(
            &GateRequest::append(who, &draft),
            &self.tournament,
            &self.rosters,
        )?;
        Ok(self.ledger.append(draft)?)
    }

    pub fn edit_catch(
        &mut self,
        who: &Identity,
        id: EntryId,
        changes: EntryChanges,
    ) -> SdkResult<FishEntry> {
        let boat = self
            .ledger
            .get(&id)
            .map(|e| e.boat_id.clone())
            .ok_or(weighin_ledger::LedgerError::NotFound(id))?;
        self.gate.authorize(
            &GateRequest::update(who, &boat, &changes),
            &self.tournament,
            &self.rosters,
        )?;
        Ok(self.ledger.update(id, changes)?)
    }

    pub fn remove_catch(&mut self, who: &Identity, id: EntryId) -> SdkResult<FishEntry> {
        self.gate.authorize(
            &GateRequest::new(who, Action::RemoveEntry),
            &self.tournament,
            &self.rosters,
        )?;
        Ok(self.ledger.remove(id)?)
    }

    // ---- Roster operations ----

    /// Register a boat. Its roster is checked against the division.
    pub fn register_boat(&mut self, who: &Identity, mut roster: BoatRoster) -> SdkResult<()> {
        self.gate.authorize(
            &GateRequest::new(who, Action::EditRoster).on_boat(&roster.boat_id),
            &self.tournament,
            &self.rosters,
        )?;
        if self.roster(&roster.boat_id).is_some() {
            return Err(SdkError::DuplicateBoat(roster.boat_id));
        }
        roster.resolve_memberships();
        roster.validate(self.tournament.division)?;
        info!(tournament = %self.tournament.id, boat = %roster.boat_id, "boat registered");
        self.rosters.push(roster);
        Ok(())
    }

    /// Attach a crew member; offshore boats hand out a zip-tie color.
    pub fn add_crew(
        &mut self,
        who: &Identity,
        boat: &BoatId,
        member: CrewMember,
    ) -> SdkResult<CrewMember> {
        self.gate.authorize(
            &GateRequest::new(who, Action::EditRoster).on_boat(boat),
            &self.tournament,
            &self.rosters,
        )?;
        let division = self.tournament.division;
        let roster = self.roster_mut(boat)?;
        Ok(roster.attach(member, division)?.clone())
    }

    /// Rebuild every zip-tie color on an offshore boat.
    pub fn reassign_zip_ties(&mut self, who: &Identity, boat: &BoatId) -> SdkResult<&BoatRoster> {
        self.gate.authorize(
            &GateRequest::new(who, Action::AssignZipTie).on_boat(boat),
            &self.tournament,
            &self.rosters,
        )?;
        let division = self.tournament.division;
        let roster = self.roster_mut(boat)?;
        roster.reassign_zip_ties(division)?;
        Ok(roster)
    }

    // ---- Reads ----

    pub fn boat_standings(&self, day: TournamentDay) -> Vec<BoatStanding> {
        self.standings().boats(self.ledger.snapshot(), day)
    }

    pub fn angler_standings(&self, day: TournamentDay) -> Vec<AnglerStanding> {
        self.standings()
            .anglers(self.ledger.snapshot(), &self.rosters, day)
    }

    pub fn score(&self, entry: &FishEntry) -> ScoreOutcome {
        score_detailed(entry, self.tournament.division, &self.matrix)
    }

    pub fn entries(&self, boat: &BoatId) -> &[FishEntry] {
        self.ledger.by_boat(boat)
    }

    pub fn entries_on(&self, boat: &BoatId, day: TournamentDay) -> Vec<&FishEntry> {
        self.ledger.by_boat_and_day(boat, day)
    }

    pub fn remaining(&self, boat: &BoatId, day: TournamentDay) -> Vec<(Category, usize)> {
        self.ledger.remaining(boat, day)
    }

    /// Pick up writes made by other consoles (last write wins).
    pub fn reload(&mut self) -> SdkResult<()> {
        Ok(self.ledger.reload()?)
    }

    pub fn subscribe(&self) -> ChangeStream {
        self.ledger.subscribe()
    }

    pub fn attach_observer(&mut self, observer: Box<dyn LedgerObserver>) {
        self.ledger.attach_observer(observer);
    }

    pub fn tournament(&self) -> &Tournament {
        &self.tournament
    }

    pub fn rosters(&self) -> &[BoatRoster] {
        &self.rosters
    }

    pub fn roster(&self, boat: &BoatId) -> Option<&BoatRoster> {
        self.rosters.iter().find(|r| &r.boat_id == boat)
    }

    pub fn ledger(&self) -> &WeighInLedger {
        &self.ledger
    }

    pub fn matrix(&self) -> &ScoringMatrix {
        &self.matrix
    }

    /// Current tournament and rosters, for writing back to `event.toml`.
    pub fn event(&self) -> EventFile {
        EventFile {
            tournament: self.tournament.clone(),
            rosters: self.rosters.clone(),
        }
    }

    fn standings(&self) -> StandingsBuilder<'_> {
        StandingsBuilder::new(&self.matrix).tie_break(self.tie_break)
    }

    fn roster_mut(&mut self, boat: &BoatId) -> SdkResult<&mut BoatRoster> {
        self.rosters
            .iter_mut()
            .find(|r| &r.boat_id == boat)
            .ok_or_else(|| SdkError::UnknownBoat(boat.clone()))
    }
}
