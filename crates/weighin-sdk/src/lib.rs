//! High-level SDK for the tournament weigh-in.
//!
//! Provides a unified API over the ledger, rosters, scoring matrix and
//! standings. This is the main entry point for the scale console and any
//! other application embedding the weigh-in engine.

pub mod config;
pub mod console;
pub mod error;
pub mod event;

pub use config::{OperatorConfig, WeighInConfig, CONFIG_FILE};
pub use console::WeighIn;
pub use error::{SdkError, SdkResult};
pub use event::EventFile;

// Re-export key types
pub use weighin_gate::{GateConfig, Identity};
pub use weighin_leaderboard::{AnglerStanding, BoatStanding, SeasonStandings, TieBreak};
pub use weighin_ledger::{LedgerChange, LedgerError, CATCH_LIMIT};
pub use weighin_roster::{BoatRoster, CrewMember, ZipTieColor};
pub use weighin_scoring::{ScoreOutcome, ScoringMatrix};
pub use weighin_types::{
    AnglerId, BoatId, Category, Division, EntryChanges, EntryDraft, EntryId, FishEntry,
    Tournament, TournamentDay, TournamentId,
};
