use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use weighin_types::{AnglerId, BoatId};

/// How boats or anglers with equal totals are ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep ledger order: first boat to weigh in ranks first.
    #[default]
    Insertion,
    /// Whoever recorded their most recent catch earlier ranks first.
    EarliestLastCatch,
}

impl TieBreak {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insertion => "insertion",
            Self::EarliestLastCatch => "earliest_last_catch",
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "insertion" => Ok(Self::Insertion),
            "earliest_last_catch" => Ok(Self::EarliestLastCatch),
            other => Err(format!("unknown tie-break policy: {other}")),
        }
    }
}

/// One row of the boat board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoatStanding {
    pub boat_id: BoatId,
    /// Points over every day of the event.
    pub total_points: u64,
    /// Points on the selected day only.
    pub daily_points: u64,
    pub entry_count: usize,
    pub last_catch: Option<DateTime<Utc>>,
}

/// One row of the angler board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnglerStanding {
    pub angler_id: AnglerId,
    pub boat_id: BoatId,
    pub name: String,
    /// Guests are ranked alongside members and flagged here.
    pub is_member: bool,
    pub total_points: u64,
    pub daily_points: u64,
    pub entry_count: usize,
    pub last_catch: Option<DateTime<Utc>>,
}

/// Shared view used when ordering rows.
pub(crate) trait Ranked {
    fn total(&self) -> u64;
    fn last_catch(&self) -> Option<DateTime<Utc>>;
}

impl Ranked for BoatStanding {
    fn total(&self) -> u64 {
        self.total_points
    }
    fn last_catch(&self) -> Option<DateTime<Utc>> {
        self.last_catch
    }
}

impl Ranked for AnglerStanding {
    fn total(&self) -> u64 {
        self.total_points
    }
    fn last_catch(&self) -> Option<DateTime<Utc>> {
        self.last_catch
    }
}

/// Stable sort, descending by total, then by the tie-break.
pub(crate) fn rank<T: Ranked>(rows: &mut [T], tie_break: TieBreak) {
    match tie_break {
        TieBreak::Insertion => rows.sort_by(|a, b| b.total().cmp(&a.total())),
        TieBreak::EarliestLastCatch => rows.sort_by(|a, b| {
            b.total().cmp(&a.total()).then_with(|| {
                // Rows without any catch sort after rows with one.
                match (a.last_catch(), b.last_catch()) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                }
            })
        }),
    }
}
