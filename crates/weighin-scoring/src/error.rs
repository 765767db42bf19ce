use std::path::PathBuf;

use weighin_types::{Category, Division};

/// Errors raised while loading or validating a scoring matrix.
#[derive(Debug, thiserror::Error)]
pub enum MatrixError {
    /// The rule names a category that does not exist in its division.
    #[error("category {category} is not part of the {division} division")]
    CategoryOutsideDivision {
        division: Division,
        category: Category,
    },

    /// Two rules target the same division and category.
    #[error("duplicate rule for {division}/{category}")]
    DuplicateRule {
        division: Division,
        category: Category,
    },

    /// A rule has no breakpoints at all.
    #[error("rule {division}/{category} has no breakpoints")]
    EmptyRule {
        division: Division,
        category: Category,
    },

    /// A threshold is negative, NaN, or infinite.
    #[error("rule {division}/{category} has invalid threshold {threshold}")]
    InvalidThreshold {
        division: Division,
        category: Category,
        threshold: f64,
    },

    /// Two breakpoints share a threshold.
    #[error("rule {division}/{category} repeats threshold {threshold}")]
    DuplicateThreshold {
        division: Division,
        category: Category,
        threshold: f64,
    },

    /// The configuration text could not be parsed.
    #[error("failed to parse scoring matrix: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("failed to read scoring matrix {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for matrix operations.
pub type MatrixResult<T> = Result<T, MatrixError>;
