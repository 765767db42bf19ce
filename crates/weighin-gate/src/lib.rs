//! Request gate for the weigh-in engine.
//!
//! Every ledger or roster mutation passes through the gate before it reaches
//! the ledger. The gate runs a pipeline of stages (capability, validation)
//! and produces an accept/reject decision with a per-stage trail.
//!
//! # Quick Start
//!
//! ```rust
//! use weighin_gate::{GateRequest, Identity, WeighInGate};
//! use weighin_types::{AnglerId, BoatId, Category, Division, EntryDraft, Tournament, TournamentDay, TournamentId};
//!
//! let gate = WeighInGate::default();
//! let tournament = Tournament::new(TournamentId::new("open").unwrap(), "Open", Division::Offshore, 1).unwrap();
//! let draft = EntryDraft::new(
//!     BoatId::new("reel-deal").unwrap(),
//!     AnglerId::new("cap").unwrap(),
//!     TournamentDay::FIRST,
//!     Category::Wahoo,
//! );
//! let viewer = Identity::viewer("dock-screen");
//! let err = gate.authorize(&GateRequest::append(&viewer, &draft), &tournament, &[]).unwrap_err();
//! assert!(err.is_capability_denied());
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod identity;
pub mod stage;
pub mod stages;

pub use config::GateConfig;
pub use error::GateError;
pub use gate::{Decision, GateResult, WeighInGate};
pub use identity::{Capability, Identity};
pub use stage::{Action, GateContext, GateRequest, GateStage, StageDecision, StageResult};
pub use stages::capability::CapabilityStage;
pub use stages::validation::ValidationStage;
