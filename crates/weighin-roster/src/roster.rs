use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use weighin_types::{AnglerId, BoatId, Division};

use crate::error::{RosterError, RosterResult};
use crate::member::CrewMember;
use crate::ziptie::{self, ZipTieColor};

/// Crew allowed besides the captain.
pub const MAX_CREW: usize = 5;

/// A boat entrant: one captain plus up to [`MAX_CREW`] crew, in roster order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoatRoster {
    pub boat_id: BoatId,
    pub name: String,
    captain: CrewMember,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    crew: Vec<CrewMember>,
}

impl BoatRoster {
    /// Create a roster with its captain. On offshore boats the captain is
    /// given the reserved zip-tie color; on nearshore boats colors are cleared.
    pub fn new(
        boat_id: BoatId,
        name: impl Into<String>,
        mut captain: CrewMember,
        division: Division,
    ) -> RosterResult<Self> {
        captain.resolve_membership();
        captain.zip_tie = if division.uses_zip_ties() {
            Some(ziptie::assign(true, &[])?)
        } else {
            None
        };
        Ok(Self {
            boat_id,
            name: name.into(),
            captain,
            crew: Vec::new(),
        })
    }

    pub fn captain(&self) -> &CrewMember {
        &self.captain
    }

    pub fn crew(&self) -> &[CrewMember] {
        &self.crew
    }

    /// Captain first, then crew in roster order.
    pub fn members(&self) -> impl Iterator<Item = &CrewMember> {
        std::iter::once(&self.captain).chain(self.crew.iter())
    }

    pub fn member(&self, angler_id: &AnglerId) -> Option<&CrewMember> {
        self.members().find(|m| &m.angler_id == angler_id)
    }

    pub fn contains(&self, angler_id: &AnglerId) -> bool {
        self.member(angler_id).is_some()
    }

    pub fn len(&self) -> usize {
        1 + self.crew.len()
    }

    /// Rosters always contain a captain.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Colors currently held aboard.
    pub fn zip_ties(&self) -> Vec<ZipTieColor> {
        self.members().filter_map(|m| m.zip_tie).collect()
    }

    /// Attach a crew member. On offshore boats the member keeps a prior
    /// color from registration when it is a free crew color; otherwise the
    /// next priority color is assigned.
    pub fn attach(&mut self, mut member: CrewMember, division: Division) -> RosterResult<&CrewMember> {
        if self.contains(&member.angler_id) {
            return Err(RosterError::DuplicateAngler {
                boat: self.boat_id.clone(),
                angler: member.angler_id,
            });
        }
        if self.crew.len() >= MAX_CREW {
            return Err(RosterError::RosterFull {
                boat: self.boat_id.clone(),
                max: MAX_CREW,
            });
        }

        member.resolve_membership();
        member.zip_tie = if division.uses_zip_ties() {
            let taken = self.zip_ties();
            match member.zip_tie {
                Some(prior) if !prior.is_reserved() && !taken.contains(&prior) => Some(prior),
                prior => {
                    let color = ziptie::assign(false, &taken)?;
                    if prior.is_some() {
                        debug!(boat = %self.boat_id, angler = %member.angler_id, ?prior, %color, "prior zip-tie unavailable, reassigned");
                    }
                    Some(color)
                }
            }
        } else {
            None
        };

        info!(
            boat = %self.boat_id,
            angler = %member.angler_id,
            member = member.is_member,
            zip_tie = ?member.zip_tie,
            "crew attached"
        );
        self.crew.push(member);
        Ok(&self.crew[self.crew.len() - 1])
    }

    /// Remove a crew member, freeing their color.
    pub fn detach(&mut self, angler_id: &AnglerId) -> RosterResult<CrewMember> {
        if &self.captain.angler_id == angler_id {
            return Err(RosterError::CaptainRequired(self.boat_id.clone()));
        }
        let index = self
            .crew
            .iter()
            .position(|m| &m.angler_id == angler_id)
            .ok_or_else(|| RosterError::UnknownAngler {
                boat: self.boat_id.clone(),
                angler: angler_id.clone(),
            })?;
        Ok(self.crew.remove(index))
    }

    /// Rebuild every assignment from scratch: captain first, then crew in
    /// roster order. Nearshore boats lose all colors.
    pub fn reassign_zip_ties(&mut self, division: Division) -> RosterResult<()> {
        if !division.uses_zip_ties() {
            self.captain.zip_tie = None;
            for member in &mut self.crew {
                member.zip_tie = None;
            }
            return Ok(());
        }

        let mut taken = vec![ziptie::assign(true, &[])?];
        self.captain.zip_tie = Some(taken[0]);
        for member in &mut self.crew {
            let color = ziptie::assign(false, &taken)?;
            member.zip_tie = Some(color);
            taken.push(color);
        }
        info!(boat = %self.boat_id, assigned = taken.len(), "zip-ties reassigned");
        Ok(())
    }

    /// Recompute `is_member` for the captain and every crew member from
    /// their club references. Rosters loaded from files or built by callers
    /// carry whatever flag they were given until this runs.
    pub fn resolve_memberships(&mut self) {
        self.captain.resolve_membership();
        for member in &mut self.crew {
            member.resolve_membership();
        }
    }

    /// Check the roster invariants. Used on rosters deserialized from outside.
    pub fn validate(&self, division: Division) -> RosterResult<()> {
        let fail = |reason: String| RosterError::Inconsistent {
            boat: self.boat_id.clone(),
            reason,
        };

        if self.crew.len() > MAX_CREW {
            return Err(fail(format!("{} crew exceeds limit of {MAX_CREW}", self.crew.len())));
        }

        let mut anglers = HashSet::new();
        for member in self.members() {
            if !anglers.insert(&member.angler_id) {
                return Err(fail(format!("angler {} listed twice", member.angler_id)));
            }
        }

        if !division.uses_zip_ties() {
            return Ok(());
        }

        if self.captain.zip_tie != Some(ZipTieColor::RESERVED) {
            return Err(fail("captain does not hold the reserved color".into()));
        }
        let mut colors = HashSet::new();
        colors.insert(ZipTieColor::RESERVED);
        for member in &self.crew {
            match member.zip_tie {
                None => return Err(fail(format!("angler {} has no zip-tie", member.angler_id))),
                Some(color) if !colors.insert(color) => {
                    return Err(fail(format!("color {color} is used twice")));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
