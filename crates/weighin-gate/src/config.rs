use serde::{Deserialize, Serialize};

/// Configuration for the weigh-in gate pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// When `true`, catches are only accepted for registered boats from
    /// anglers on that boat's roster.
    pub require_roster: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            require_roster: true,
        }
    }
}
