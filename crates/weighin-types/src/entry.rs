use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::division::{Category, Metric};
use crate::error::TypeError;
use crate::identity::{AnglerId, BoatId, EntryId, TournamentId};

/// 1-based index of a day within a multi-day tournament.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct TournamentDay(u16);

impl TournamentDay {
    pub const FIRST: TournamentDay = TournamentDay(1);

    pub fn new(day: u16) -> Result<Self, TypeError> {
        if day == 0 {
            return Err(TypeError::InvalidDay(day));
        }
        Ok(Self(day))
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for TournamentDay {
    type Error = TypeError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TournamentDay> for u16 {
    fn from(day: TournamentDay) -> Self {
        day.0
    }
}

impl fmt::Debug for TournamentDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Day({})", self.0)
    }
}

impl fmt::Display for TournamentDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catch as submitted at the scale, before the ledger assigns it an id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub boat_id: BoatId,
    pub angler_id: AnglerId,
    pub day: TournamentDay,
    pub category: Category,
    /// Display-only species name, e.g. "mangrove snapper".
    pub species: String,
    /// Pounds.
    pub weight: Option<f64>,
    /// Inches.
    pub length: Option<f64>,
}

impl EntryDraft {
    pub fn new(
        boat_id: BoatId,
        angler_id: AnglerId,
        day: TournamentDay,
        category: Category,
    ) -> Self {
        Self {
            boat_id,
            angler_id,
            day,
            category,
            species: category.label().to_string(),
            weight: None,
            length: None,
        }
    }

    pub fn species(mut self, species: impl Into<String>) -> Self {
        self.species = species.into();
        self
    }

    pub fn weight(mut self, pounds: f64) -> Self {
        self.weight = Some(pounds);
        self
    }

    pub fn length(mut self, inches: f64) -> Self {
        self.length = Some(inches);
        self
    }
}

/// One recorded fish submission.
///
/// An entry with neither weight nor length is valid; it simply scores zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FishEntry {
    pub id: EntryId,
    pub tournament_id: TournamentId,
    pub boat_id: BoatId,
    pub day: TournamentDay,
    pub angler_id: AnglerId,
    pub category: Category,
    pub species: String,
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub created_at: DateTime<Utc>,
    /// Starts at 1 and increases on every applied edit.
    #[serde(default = "first_revision")]
    pub revision: u32,
}

fn first_revision() -> u32 {
    1
}

impl FishEntry {
    /// Materialize a draft with a fresh id and the current time.
    pub fn from_draft(tournament_id: TournamentId, draft: EntryDraft) -> Self {
        Self {
            id: EntryId::new(),
            tournament_id,
            boat_id: draft.boat_id,
            day: draft.day,
            angler_id: draft.angler_id,
            category: draft.category,
            species: draft.species,
            weight: draft.weight,
            length: draft.length,
            created_at: Utc::now(),
            revision: first_revision(),
        }
    }

    /// The measurement a rule with the given metric reads.
    pub fn measurement(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Weight => self.weight,
            Metric::Length => self.length,
        }
    }

    pub fn has_measurement(&self) -> bool {
        self.weight.is_some() || self.length.is_some()
    }

    /// Apply an edit in place and bump the revision. Callers are responsible
    /// for checking catch limits before changing the category.
    pub fn apply(&mut self, changes: &EntryChanges) {
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(species) = &changes.species {
            self.species = species.clone();
        }
        if let Some(weight) = changes.weight {
            self.weight = weight;
        }
        if let Some(length) = changes.length {
            self.length = length;
        }
        if let Some(angler) = &changes.angler_id {
            self.angler_id = angler.clone();
        }
        self.revision = self.revision.saturating_add(1);
    }
}

/// Partial edit of an existing entry. `None` leaves a field unchanged; for
/// measurements, `Some(None)` clears the value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryChanges {
    pub category: Option<Category>,
    pub species: Option<String>,
    pub weight: Option<Option<f64>>,
    pub length: Option<Option<f64>>,
    pub angler_id: Option<AnglerId>,
    /// When set, the edit only applies if the entry is still at this revision.
    pub expected_revision: Option<u32>,
}

impl EntryChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    pub fn weight(mut self, pounds: Option<f64>) -> Self {
        self.weight = Some(pounds);
        self
    }

    pub fn length(mut self, inches: Option<f64>) -> Self {
        self.length = Some(inches);
        self
    }

    pub fn angler(mut self, angler_id: AnglerId) -> Self {
        self.angler_id = Some(angler_id);
        self
    }

    pub fn expect_revision(mut self, revision: u32) -> Self {
        self.expected_revision = Some(revision);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.species.is_none()
            && self.weight.is_none()
            && self.length.is_none()
            && self.angler_id.is_none()
    }
}
