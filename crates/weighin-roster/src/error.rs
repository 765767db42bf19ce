use weighin_types::{AnglerId, BoatId};

/// Zip-tie allocation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ZipTieError {
    /// Every non-reserved color is already taken on this boat.
    #[error("no zip-tie colors left ({taken} already assigned)")]
    Exhausted { taken: usize },
}

/// Errors from roster edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("boat {boat} already carries the maximum of {max} crew")]
    RosterFull { boat: BoatId, max: usize },

    #[error("angler {angler} is already on boat {boat}")]
    DuplicateAngler { boat: BoatId, angler: AnglerId },

    #[error("angler {angler} is not on boat {boat}")]
    UnknownAngler { boat: BoatId, angler: AnglerId },

    #[error("the captain of boat {0} cannot be detached")]
    CaptainRequired(BoatId),

    #[error("roster of boat {boat} is inconsistent: {reason}")]
    Inconsistent { boat: BoatId, reason: String },

    #[error(transparent)]
    ZipTie(#[from] ZipTieError),
}

/// Result alias for roster operations.
pub type RosterResult<T> = Result<T, RosterError>;
