use std::fmt;
use std::time::Duration;

use weighin_roster::BoatRoster;
use weighin_types::{BoatId, EntryChanges, EntryDraft, Tournament};

use crate::error::GateError;
use crate::identity::Identity;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// Operation a caller asks to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    AppendEntry,
    UpdateEntry,
    RemoveEntry,
    /// Register a boat or attach crew to one.
    EditRoster,
    /// Rebuild the zip-tie colors of a boat.
    AssignZipTie,
    /// Boards, counts, and entry listings.
    Read,
}

impl Action {
    /// Returns `true` for actions that change the ledger or a roster.
    pub fn is_mutation(self) -> bool {
        !matches!(self, Self::Read)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AppendEntry => "append_entry",
            Self::UpdateEntry => "update_entry",
            Self::RemoveEntry => "remove_entry",
            Self::EditRoster => "edit_roster",
            Self::AssignZipTie => "assign_zip_tie",
            Self::Read => "read",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GateRequest
// ---------------------------------------------------------------------------

/// A request evaluated by the gate pipeline.
///
/// Carries the payload the action needs: a draft for appends, changes for
/// updates, and the affected boat where one exists.
#[derive(Clone, Copy, Debug)]
pub struct GateRequest<'a> {
    pub identity: &'a Identity,
    pub action: Action,
    pub draft: Option<&'a EntryDraft>,
    pub changes: Option<&'a EntryChanges>,
    pub boat: Option<&'a BoatId>,
}

impl<'a> GateRequest<'a> {
    pub fn new(identity: &'a Identity, action: Action) -> Self {
        Self {
            identity,
            action,
            draft: None,
            changes: None,
            boat: None,
        }
    }

    pub fn append(identity: &'a Identity, draft: &'a EntryDraft) -> Self {
        Self {
            draft: Some(draft),
            boat: Some(&draft.boat_id),
            ..Self::new(identity, Action::AppendEntry)
        }
    }

    pub fn update(identity: &'a Identity, boat: &'a BoatId, changes: &'a EntryChanges) -> Self {
        Self {
            changes: Some(changes),
            boat: Some(boat),
            ..Self::new(identity, Action::UpdateEntry)
        }
    }

    pub fn on_boat(mut self, boat: &'a BoatId) -> Self {
        self.boat = Some(boat);
        self
    }
}

// ---------------------------------------------------------------------------
// StageDecision
// ---------------------------------------------------------------------------

/// The outcome of a single gate stage evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageDecision {
    /// The stage passed; proceed to the next stage.
    Pass,
    /// The stage failed; the request is rejected.
    Fail { reason: String },
}

impl StageDecision {
    pub fn fail(reason: impl Into<String>) -> Self {
        Self::Fail {
            reason: reason.into(),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

// ---------------------------------------------------------------------------
// StageResult
// ---------------------------------------------------------------------------

/// Recorded result from a completed stage evaluation.
#[derive(Clone, Debug)]
pub struct StageResult {
    pub stage_name: String,
    pub passed: bool,
    /// Populated on failure.
    pub reason: Option<String>,
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// GateContext
// ---------------------------------------------------------------------------

/// Tournament state every stage can consult.
pub struct GateContext<'a> {
    pub tournament: &'a Tournament,
    pub rosters: &'a [BoatRoster],
    /// Results from stages that have already run in this evaluation.
    pub previous_stages: Vec<StageResult>,
}

impl<'a> GateContext<'a> {
    pub fn new(tournament: &'a Tournament, rosters: &'a [BoatRoster]) -> Self {
        Self {
            tournament,
            rosters,
            previous_stages: Vec::new(),
        }
    }

    pub fn roster(&self, boat: &BoatId) -> Option<&'a BoatRoster> {
        self.rosters.iter().find(|r| &r.boat_id == boat)
    }
}

// ---------------------------------------------------------------------------
// GateStage trait
// ---------------------------------------------------------------------------

/// A single evaluation stage in the gate pipeline.
///
/// Stages are evaluated in order and stored as `Box<dyn GateStage>`.
pub trait GateStage: Send + Sync {
    /// Short name of this stage (e.g., "capability", "validation").
    fn name(&self) -> &str;

    fn evaluate(
        &self,
        request: &GateRequest<'_>,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError>;
}
