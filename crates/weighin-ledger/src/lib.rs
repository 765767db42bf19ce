//! The weigh-in ledger: every fish recorded for one tournament.
//!
//! [`WeighInLedger`] owns the in-memory [`LedgerSnapshot`], enforces the
//! per-boat, per-day, per-category [`CATCH_LIMIT`], saves through a
//! [`SnapshotStore`](weighin_store::SnapshotStore) after each mutation, and
//! publishes every change through its [`ChangeNotifier`].
//!
//! Mutations take `&mut self`. There is one writer per ledger; callers that
//! share a ledger across threads wrap it themselves.
//!
//! [`LedgerSnapshot`]: weighin_types::LedgerSnapshot

pub mod error;
pub mod ledger;
pub mod limits;
pub mod notifier;

pub use error::{LedgerError, LedgerResult};
pub use ledger::WeighInLedger;
pub use limits::CATCH_LIMIT;
pub use notifier::{ChangeKind, ChangeNotifier, ChangeStream, LedgerChange, LedgerObserver};
