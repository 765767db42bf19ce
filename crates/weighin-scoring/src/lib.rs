//! Scoring for the weigh-in engine.
//!
//! A [`ScoringMatrix`] maps `(division, category)` to a [`RuleSet`]: the
//! metric to read (weight or length) and a descending list of breakpoints.
//! The matrix is authored elsewhere and consumed read-only; it is validated
//! once at load time so that every rule refers to a category that actually
//! exists in its division.
//!
//! [`score`] converts a single [`FishEntry`](weighin_types::FishEntry) into
//! points. It never fails: entries without a matching rule or without the
//! required measurement score zero, so one bad entry cannot break the
//! leaderboard for the rest of the fleet.

pub mod error;
pub mod matrix;
pub mod scorer;

pub use error::{MatrixError, MatrixResult};
pub use matrix::{Breakpoint, MatrixConfig, RuleSet, ScoringMatrix, ScoringRule};
pub use scorer::{score, score_detailed, ScoreOutcome};
