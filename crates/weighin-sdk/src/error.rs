use std::path::PathBuf;

use thiserror::Error;
use weighin_types::BoatId;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    TomlDecode(#[from] toml::de::Error),

    #[error("cannot encode TOML: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error("boat not registered: {0}")]
    UnknownBoat(BoatId),

    #[error("boat already registered: {0}")]
    DuplicateBoat(BoatId),

    #[error("{0}")]
    Gate(#[from] weighin_gate::GateError),

    #[error("ledger error: {0}")]
    Ledger(#[from] weighin_ledger::LedgerError),

    #[error("store error: {0}")]
    Store(#[from] weighin_store::StoreError),

    #[error("scoring matrix error: {0}")]
    Matrix(#[from] weighin_scoring::MatrixError),

    #[error("roster error: {0}")]
    Roster(#[from] weighin_roster::RosterError),

    #[error("invalid value: {0}")]
    Types(#[from] weighin_types::TypeError),
}

impl SdkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
