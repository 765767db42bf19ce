//! Boat rosters for the weigh-in engine.
//!
//! A roster is supplied by the registration collaborator: one captain and up
//! to [`MAX_CREW`] crew. The engine reads it to attribute catches to anglers
//! and writes back exactly one thing, the zip-tie color each angler carries on
//! offshore boats.
//!
//! # Zip-tie invariants
//!
//! 1. The captain always holds [`ZipTieColor::RESERVED`].
//! 2. The reserved color is never given to crew.
//! 3. Colors are pairwise distinct within a boat.

pub mod error;
pub mod member;
pub mod roster;
pub mod ziptie;

pub use error::{RosterError, RosterResult, ZipTieError};
pub use member::CrewMember;
pub use roster::{BoatRoster, MAX_CREW};
pub use ziptie::{assign, ZipTieColor};
