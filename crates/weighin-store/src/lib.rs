//! Durable keyed storage for weigh-in ledgers.
//!
//! One record per tournament, holding the serialized
//! [`LedgerSnapshot`](weighin_types::LedgerSnapshot). Ledgers load their
//! record on open and save after every mutation.
//!
//! # Storage Backends
//!
//! All backends implement the [`SnapshotStore`] trait:
//!
//! - [`InMemorySnapshotStore`] -- `HashMap`-based store for tests and embedding
//! - [`FileSnapshotStore`] -- one JSON file per tournament in a directory
//!
//! # Design Rules
//!
//! 1. A write replaces the whole record (last write wins).
//! 2. An empty snapshot never replaces a stored non-empty one; see
//!    [`SnapshotStore::persist`].
//! 3. File writes go to a temporary file first and are renamed into place.
//! 4. Backends never interpret entries beyond the empty check.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileSnapshotStore;
pub use memory::InMemorySnapshotStore;
pub use traits::{PersistOutcome, SnapshotStore};
