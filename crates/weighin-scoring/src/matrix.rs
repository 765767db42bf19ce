use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use weighin_types::{Category, Division, Metric};

use crate::error::{MatrixError, MatrixResult};

/// A single step of a rule: a measurement at or above `threshold` earns `points`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub threshold: f64,
    pub points: u32,
}

impl Breakpoint {
    pub fn new(threshold: f64, points: u32) -> Self {
        Self { threshold, points }
    }
}

/// One authored row of the scoring matrix, as it appears in configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub division: Division,
    pub category: Category,
    pub metric: Metric,
    pub breakpoints: Vec<Breakpoint>,
}

/// On-disk shape of the scoring matrix.
///
/// ```toml
/// [[rule]]
/// division = "offshore"
/// category = "dolphin"
/// metric = "weight"
/// breakpoints = [
///     { threshold = 30.0, points = 100 },
///     { threshold = 15.0, points = 50 },
/// ]
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MatrixConfig {
    #[serde(default, rename = "rule")]
    pub rules: Vec<ScoringRule>,
}

/// A validated rule: the metric plus breakpoints sorted descending by threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleSet {
    metric: Metric,
    breakpoints: Vec<Breakpoint>,
}

impl RuleSet {
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Breakpoints, highest threshold first.
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// Points for the first threshold the measurement meets or exceeds, or
    /// `None` when it is below every threshold.
    pub fn points_for(&self, measurement: f64) -> Option<u32> {
        self.breakpoints
            .iter()
            .find(|bp| measurement >= bp.threshold)
            .map(|bp| bp.points)
    }
}

/// The read-only `(division, category) -> rule` table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoringMatrix {
    rules: BTreeMap<(Division, Category), RuleSet>,
}

impl ScoringMatrix {
    /// Validate authored rules and build the lookup table.
    ///
    /// Breakpoints may be authored in any order; they are stored descending.
    pub fn from_rules(rules: impl IntoIterator<Item = ScoringRule>) -> MatrixResult<Self> {
        let mut table = BTreeMap::new();

        for rule in rules {
            let ScoringRule {
                division,
                category,
                metric,
                mut breakpoints,
            } = rule;

            if !division.allows(category) {
                return Err(MatrixError::CategoryOutsideDivision { division, category });
            }
            if breakpoints.is_empty() {
                return Err(MatrixError::EmptyRule { division, category });
            }
            if let Some(bad) = breakpoints
                .iter()
                .find(|bp| !bp.threshold.is_finite() || bp.threshold < 0.0)
            {
                return Err(MatrixError::InvalidThreshold {
                    division,
                    category,
                    threshold: bad.threshold,
                });
            }

            breakpoints.sort_by(|a, b| b.threshold.total_cmp(&a.threshold));
            if let Some(pair) = breakpoints
                .windows(2)
                .find(|pair| pair[0].threshold == pair[1].threshold)
            {
                return Err(MatrixError::DuplicateThreshold {
                    division,
                    category,
                    threshold: pair[0].threshold,
                });
            }

            if table.contains_key(&(division, category)) {
                return Err(MatrixError::DuplicateRule { division, category });
            }
            debug!(%division, %category, %metric, steps = breakpoints.len(), "scoring rule loaded");
            table.insert((division, category), RuleSet { metric, breakpoints });
        }

        Ok(Self { rules: table })
    }

    /// Parse and validate a TOML matrix.
    pub fn from_toml_str(text: &str) -> MatrixResult<Self> {
        let config: MatrixConfig = toml::from_str(text)?;
        Self::from_rules(config.rules)
    }

    /// Read, parse, and validate a TOML matrix file.
    pub fn load(path: &Path) -> MatrixResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| MatrixError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let matrix = Self::from_toml_str(&text)?;
        info!(path = %path.display(), rules = matrix.len(), "scoring matrix loaded");
        Ok(matrix)
    }

    /// The rule for a division and category, if one was authored.
    pub fn rule(&self, division: Division, category: Category) -> Option<&RuleSet> {
        self.rules.get(&(division, category))
    }

    /// Categories of the division that have no rule and therefore always score zero.
    pub fn unscored_categories(&self, division: Division) -> Vec<Category> {
        division
            .categories()
            .iter()
            .copied()
            .filter(|c| self.rule(division, *c).is_none())
            .collect()
    }

    /// All rules of a division.
    pub fn rules_for(&self, division: Division) -> impl Iterator<Item = (Category, &RuleSet)> {
        self.rules
            .iter()
            .filter(move |((d, _), _)| *d == division)
            .map(|((_, c), rule)| (*c, rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
