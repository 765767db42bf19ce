use std::fmt;

/// Errors that can occur during gate evaluation.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// A stage rejected the request.
    #[error("rejected by {stage}: {reason}")]
    Rejected { stage: String, reason: String },

    /// A request is missing what its action needs.
    #[error("malformed request: {0}")]
    Malformed(String),

    /// A stage returned an unexpected error.
    #[error("stage error in '{stage}': {message}")]
    StageError { stage: String, message: String },
}

impl GateError {
    /// Create a stage error with a name and message.
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StageError {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if the caller lacked the capability for the action.
    pub fn is_capability_denied(&self) -> bool {
        matches!(self, Self::Rejected { stage, .. } if stage == "capability")
    }
}

impl PartialEq for GateError {
    fn eq(&self, other: &Self) -> bool {
        // Compare by display representation for test convenience.
        fmt::format(format_args!("{self}")) == fmt::format(format_args!("{other}"))
    }
}

impl Eq for GateError {}
