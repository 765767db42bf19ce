use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Competition track of a tournament.
///
/// The division decides which fish categories exist and whether crew are
/// issued zip-tie colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Division {
    /// Inshore track, scored by length.
    Nearshore,
    /// Bluewater track, scored by weight.
    Offshore,
}

impl Division {
    pub const ALL: [Division; 2] = [Division::Nearshore, Division::Offshore];

    /// The closed set of categories that exist in this division, in display order.
    pub fn categories(self) -> &'static [Category] {
        match self {
            Self::Nearshore => &[
                Category::Redfish,
                Category::Trout,
                Category::Flounder,
                Category::Snook,
                Category::Sheepshead,
                Category::Snapper,
                Category::Mackerel,
            ],
            Self::Offshore => &[
                Category::KingMackerel,
                Category::Dolphin,
                Category::Wahoo,
                Category::Tuna,
                Category::Cobia,
                Category::Grouper,
                Category::Amberjack,
                Category::Snapper,
                Category::Mackerel,
            ],
        }
    }

    /// Returns `true` if `category` is a valid bucket in this division.
    pub fn allows(self, category: Category) -> bool {
        self.categories().contains(&category)
    }

    /// The measurement this division is customarily scored by.
    pub fn primary_metric(self) -> Metric {
        match self {
            Self::Nearshore => Metric::Length,
            Self::Offshore => Metric::Weight,
        }
    }

    /// Offshore boats tag fish with per-angler zip-tie colors.
    pub fn uses_zip_ties(self) -> bool {
        matches!(self, Self::Offshore)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nearshore => "nearshore",
            Self::Offshore => "offshore",
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Division {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearshore" => Ok(Self::Nearshore),
            "offshore" => Ok(Self::Offshore),
            other => Err(TypeError::UnknownDivision(other.to_string())),
        }
    }
}

/// Fish-type bucket subject to the daily catch limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Redfish,
    Trout,
    Flounder,
    Snook,
    Sheepshead,
    Snapper,
    Mackerel,
    KingMackerel,
    Dolphin,
    Wahoo,
    Tuna,
    Cobia,
    Grouper,
    Amberjack,
}

impl Category {
    pub const ALL: [Category; 14] = [
        Category::Redfish,
        Category::Trout,
        Category::Flounder,
        Category::Snook,
        Category::Sheepshead,
        Category::Snapper,
        Category::Mackerel,
        Category::KingMackerel,
        Category::Dolphin,
        Category::Wahoo,
        Category::Tuna,
        Category::Cobia,
        Category::Grouper,
        Category::Amberjack,
    ];

    /// Canonical snake_case name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Redfish => "redfish",
            Self::Trout => "trout",
            Self::Flounder => "flounder",
            Self::Snook => "snook",
            Self::Sheepshead => "sheepshead",
            Self::Snapper => "snapper",
            Self::Mackerel => "mackerel",
            Self::KingMackerel => "king_mackerel",
            Self::Dolphin => "dolphin",
            Self::Wahoo => "wahoo",
            Self::Tuna => "tuna",
            Self::Cobia => "cobia",
            Self::Grouper => "grouper",
            Self::Amberjack => "amberjack",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Redfish => "Redfish",
            Self::Trout => "Speckled Trout",
            Self::Flounder => "Flounder",
            Self::Snook => "Snook",
            Self::Sheepshead => "Sheepshead",
            Self::Snapper => "Snapper",
            Self::Mackerel => "Spanish Mackerel",
            Self::KingMackerel => "King Mackerel",
            Self::Dolphin => "Dolphin",
            Self::Wahoo => "Wahoo",
            Self::Tuna => "Tuna",
            Self::Cobia => "Cobia",
            Self::Grouper => "Grouper",
            Self::Amberjack => "Amberjack",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TypeError;

    /// Accepts the canonical name case-insensitively, with `-` or ` ` in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| TypeError::UnknownCategory(s.trim().to_string()))
    }
}

/// The measurement a scoring rule reads from an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Pounds.
    Weight,
    /// Inches.
    Length,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weight => f.write_str("weight"),
            Self::Length => f.write_str("length"),
        }
    }
}

impl FromStr for Metric {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weight" => Ok(Self::Weight),
            "length" => Ok(Self::Length),
            other => Err(TypeError::UnknownMetric(other.to_string())),
        }
    }
}
