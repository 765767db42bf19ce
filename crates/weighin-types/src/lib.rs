//! Foundation types for the weigh-in engine.
//!
//! This crate provides the identity, classification, and record types used
//! throughout the weigh-in system. Every other weigh-in crate depends on
//! `weighin-types`.
//!
//! # Key Types
//!
//! - [`BoatId`], [`AnglerId`], [`TournamentId`]: externally supplied identities
//! - [`EntryId`]: UUID v7 catch entry identifier
//! - [`Division`] / [`Category`]: closed, division-scoped fish buckets
//! - [`FishEntry`]: one recorded catch
//! - [`LedgerSnapshot`]: the serialized per-tournament ledger

pub mod division;
pub mod entry;
pub mod error;
pub mod identity;
pub mod snapshot;
pub mod tournament;

pub use division::{Category, Division, Metric};
pub use entry::{EntryChanges, EntryDraft, FishEntry, TournamentDay};
pub use error::TypeError;
pub use identity::{AnglerId, BoatId, EntryId, TournamentId};
pub use snapshot::{BoatLog, LedgerSnapshot};
pub use tournament::Tournament;
