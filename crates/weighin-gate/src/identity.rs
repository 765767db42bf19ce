use std::fmt;

use serde::{Deserialize, Serialize};

/// A permission an operator may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Tournament director or administrator: may change the ledger and rosters.
    Editor,
    /// May read boards and counts.
    Viewer,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Editor => f.write_str("editor"),
            Self::Viewer => f.write_str("viewer"),
        }
    }
}

/// Who is making a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

impl Identity {
    pub fn new(name: impl Into<String>, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            name: name.into(),
            capabilities: capabilities.into_iter().collect(),
        }
    }

    pub fn editor(name: impl Into<String>) -> Self {
        Self::new(name, [Capability::Editor, Capability::Viewer])
    }

    pub fn viewer(name: impl Into<String>) -> Self {
        Self::new(name, [Capability::Viewer])
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn can_edit(&self) -> bool {
        self.has(Capability::Editor)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
