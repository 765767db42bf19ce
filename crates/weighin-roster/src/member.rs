use serde::{Deserialize, Serialize};
use weighin_types::AnglerId;

use crate::ziptie::ZipTieColor;

/// One person aboard a boat, as supplied by registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub angler_id: AnglerId,
    pub name: String,
    /// Club membership record this angler registered under, if any.
    #[serde(default)]
    pub club_member_ref: Option<String>,
    /// Resolved from `club_member_ref` when the member joins a roster.
    #[serde(default)]
    pub is_member: bool,
    /// Offshore only. May arrive pre-filled from registration.
    #[serde(default)]
    pub zip_tie: Option<ZipTieColor>,
}

impl CrewMember {
    /// A guest angler with no club membership.
    pub fn guest(angler_id: AnglerId, name: impl Into<String>) -> Self {
        Self {
            angler_id,
            name: name.into(),
            club_member_ref: None,
            is_member: false,
            zip_tie: None,
        }
    }

    /// A club member.
    pub fn member(angler_id: AnglerId, name: impl Into<String>, member_ref: impl Into<String>) -> Self {
        Self {
            club_member_ref: Some(member_ref.into()),
            is_member: true,
            ..Self::guest(angler_id, name)
        }
    }

    pub fn with_zip_tie(mut self, color: ZipTieColor) -> Self {
        self.zip_tie = Some(color);
        self
    }

    pub(crate) fn resolve_membership(&mut self) {
        self.is_member = self
            .club_member_ref
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> AnglerId {
        AnglerId::new(s).unwrap()
    }

    #[test]
    fn guest_and_member_constructors() {
        assert!(!CrewMember::guest(id("g"), "Guest").is_member);
        let m = CrewMember::member(id("m"), "Member", "club-0042");
        assert!(m.is_member);
        assert_eq!(m.club_member_ref.as_deref(), Some("club-0042"));
    }

    #[test]
    fn blank_member_ref_resolves_to_guest() {
        let mut m = CrewMember::member(id("m"), "Member", "  ");
        m.resolve_membership();
        assert!(!m.is_member);
    }

    #[test]
    fn stale_flag_is_overwritten_on_resolution() {
        let mut m = CrewMember::guest(id("x"), "X");
        m.is_member = true;
        m.resolve_membership();
        assert!(!m.is_member);
    }
}
