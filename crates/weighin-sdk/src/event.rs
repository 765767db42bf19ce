use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use weighin_roster::BoatRoster;
use weighin_types::Tournament;

use crate::error::{SdkError, SdkResult};

/// Tournament details plus registered boats, as kept in `event.toml`.
///
/// ```toml
/// [tournament]
/// id = "summer-slam-2026"
/// name = "Summer Slam"
/// division = "offshore"
/// days = 2
///
/// [[boat]]
/// boat_id = "reel-deal"
/// name = "Reel Deal"
///
/// [boat.captain]
/// angler_id = "casey"
/// name = "Casey"
/// club_member_ref = "club-0042"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventFile {
    pub tournament: Tournament,
    #[serde(default, rename = "boat", skip_serializing_if = "Vec::is_empty")]
    pub rosters: Vec<BoatRoster>,
}

impl EventFile {
    pub fn new(tournament: Tournament) -> Self {
        Self {
            tournament,
            rosters: Vec::new(),
        }
    }

    /// Parse and check every roster against the tournament's division.
    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        let mut event: Self = toml::from_str(text)?;
        for roster in &mut event.rosters {
            roster.resolve_memberships();
        }
        event.validate()?;
        Ok(event)
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> SdkResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| SdkError::io(path, e))?;
        let event = Self::from_toml_str(&text)?;
        debug!(
            path = %path.display(),
            tournament = %event.tournament.id,
            boats = event.rosters.len(),
            "loaded event file"
        );
        Ok(event)
    }

    pub fn save(&self, path: &Path) -> SdkResult<()> {
        fs::write(path, self.to_toml_string()?).map_err(|e| SdkError::io(path, e))
    }

    fn validate(&self) -> SdkResult<()> {
        if self.tournament.days == 0 {
            return Err(SdkError::Config("tournament must last at least one day".into()));
        }
        let mut seen = HashSet::new();
        for roster in &self.rosters {
            if !seen.insert(&roster.boat_id) {
                return Err(SdkError::DuplicateBoat(roster.boat_id.clone()));
            }
            roster.validate(self.tournament.division)?;
        }
        Ok(())
    }
}
