//! Rankings derived from a ledger snapshot and the scoring matrix.
//!
//! Standings are never stored. Every call rescores the entries it is given,
//! so a board is only as stale as the snapshot passed in.
//!
//! - [`boat_standings`] / [`angler_standings`] -- one tournament, one day selected
//! - [`StandingsBuilder`] -- the same, with a configurable [`TieBreak`]
//! - [`SeasonStandings`] -- club-wide member totals across tournaments, kept
//!   current as a [`LedgerObserver`](weighin_ledger::LedgerObserver)

pub mod builder;
pub mod season;
pub mod standings;

pub use builder::{angler_standings, boat_standings, StandingsBuilder};
pub use season::{SeasonStandings, SeasonTotal};
pub use standings::{AnglerStanding, BoatStanding, TieBreak};
