use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ZipTieError;

/// Fairness-tagging color worn on fish tagged by one angler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZipTieColor {
    White,
    Red,
    Blue,
    Green,
    Yellow,
    Orange,
    Purple,
}

impl ZipTieColor {
    /// Held by the captain and nobody else.
    pub const RESERVED: ZipTieColor = ZipTieColor::White;

    /// Crew colors in the order they are handed out.
    pub const PRIORITY: [ZipTieColor; 6] = [
        ZipTieColor::Red,
        ZipTieColor::Blue,
        ZipTieColor::Green,
        ZipTieColor::Yellow,
        ZipTieColor::Orange,
        ZipTieColor::Purple,
    ];

    pub fn is_reserved(self) -> bool {
        self == Self::RESERVED
    }
}

impl fmt::Display for ZipTieColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::White => "white",
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Purple => "purple",
        };
        f.write_str(s)
    }
}

/// Pick the color for an angler joining a boat.
///
/// The captain always gets [`ZipTieColor::RESERVED`], whatever `existing`
/// holds. Crew get the first priority color not already in `existing`.
pub fn assign(is_captain: bool, existing: &[ZipTieColor]) -> Result<ZipTieColor, ZipTieError> {
    if is_captain {
        return Ok(ZipTieColor::RESERVED);
    }
    ZipTieColor::PRIORITY
        .iter()
        .copied()
        .find(|color| !existing.contains(color))
        .ok_or(ZipTieError::Exhausted {
            taken: existing.len(),
        })
}
