use serde::{Deserialize, Serialize};

use crate::division::Division;
use crate::entry::TournamentDay;
use crate::error::TypeError;
use crate::identity::TournamentId;

/// The tournament metadata the weigh-in engine needs. Everything else about a
/// tournament (fees, dates, venue) belongs to the administration collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub division: Division,
    /// Number of fishing days; 1 for a single-day event.
    pub days: u16,
}

impl Tournament {
    pub fn new(
        id: TournamentId,
        name: impl Into<String>,
        division: Division,
        days: u16,
    ) -> Result<Self, TypeError> {
        TournamentDay::new(days)?;
        Ok(Self {
            id,
            name: name.into(),
            division,
            days,
        })
    }

    /// Returns `true` if `day` falls within the event.
    pub fn has_day(&self, day: TournamentDay) -> bool {
        day.get() <= self.days
    }

    /// All days of the event in order.
    pub fn days(&self) -> impl Iterator<Item = TournamentDay> {
        (1..=self.days).filter_map(|d| TournamentDay::new(d).ok())
    }
}
