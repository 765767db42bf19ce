use tracing::warn;
use weighin_types::{Division, FishEntry, Metric};

use crate::matrix::ScoringMatrix;

/// How an entry's score was reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreOutcome {
    /// A breakpoint matched.
    Scored(u32),
    /// No rule exists for the entry's division and category.
    UnknownCategory,
    /// The rule's metric was not recorded on the entry.
    MissingMeasurement(Metric),
    /// The measurement is below every threshold.
    BelowThreshold,
}

impl ScoreOutcome {
    /// Points earned; zero for every non-`Scored` outcome.
    pub fn points(self) -> u32 {
        match self {
            Self::Scored(points) => points,
            _ => 0,
        }
    }
}

/// Score an entry and report why it earned what it did.
pub fn score_detailed(entry: &FishEntry, division: Division, matrix: &ScoringMatrix) -> ScoreOutcome {
    let Some(rule) = matrix.rule(division, entry.category) else {
        return ScoreOutcome::UnknownCategory;
    };
    let Some(measurement) = entry.measurement(rule.metric()) else {
        return ScoreOutcome::MissingMeasurement(rule.metric());
    };
    match rule.points_for(measurement) {
        Some(points) => ScoreOutcome::Scored(points),
        None => ScoreOutcome::BelowThreshold,
    }
}

/// Points for a single entry. Never fails; unknown categories are logged and
/// score zero.
pub fn score(entry: &FishEntry, division: Division, matrix: &ScoringMatrix) -> u32 {
    let outcome = score_detailed(entry, division, matrix);
    if outcome == ScoreOutcome::UnknownCategory {
        warn!(
            entry = %entry.id,
            boat = %entry.boat_id,
            %division,
            category = %entry.category,
            "no scoring rule for category, scoring zero"
        );
    }
    outcome.points()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{Breakpoint, ScoringRule};
    use proptest::prelude::*;
    use weighin_types::{
        AnglerId, BoatId, Category, EntryDraft, TournamentDay, TournamentId,
    };

    fn matrix() -> ScoringMatrix {
        ScoringMatrix::from_rules([
            ScoringRule {
                division: Division::Offshore,
                category: Category::KingMackerel,
                metric: Metric::Weight,
                breakpoints: vec![
                    Breakpoint::new(40.0, 100),
                    Breakpoint::new(25.0, 60),
                    Breakpoint::new(10.0, 20),
                ],
            },
            ScoringRule {
                division: Division::Nearshore,
                category: Category::Redfish,
                metric: Metric::Length,
                breakpoints: vec![Breakpoint::new(27.0, 30), Breakpoint::new(18.0, 10)],
            },
        ])
        .unwrap()
    }

    fn entry(category: Category, weight: Option<f64>, length: Option<f64>) -> FishEntry {
        let mut draft = EntryDraft::new(
            BoatId::new("boat").unwrap(),
            AnglerId::new("angler").unwrap(),
            TournamentDay::FIRST,
            category,
        );
        draft.weight = weight;
        draft.length = length;
        FishEntry::from_draft(TournamentId::new("t").unwrap(), draft)
    }

    #[test]
    fn first_matching_breakpoint_wins() {
        let m = matrix();
        assert_eq!(score(&entry(Category::KingMackerel, Some(41.2), None), Division::Offshore, &m), 100);
        assert_eq!(score(&entry(Category::KingMackerel, Some(25.0), None), Division::Offshore, &m), 60);
        assert_eq!(score(&entry(Category::KingMackerel, Some(12.0), None), Division::Offshore, &m), 20);
    }

    #[test]
    fn below_every_threshold_scores_zero() {
        let outcome =
            score_detailed(&entry(Category::KingMackerel, Some(3.0), None), Division::Offshore, &matrix());
        assert_eq!(outcome, ScoreOutcome::BelowThreshold);
        assert_eq!(outcome.points(), 0);
    }

    #[test]
    fn missing_measurement_scores_zero() {
        // Length recorded, but the rule reads weight.
        let outcome =
            score_detailed(&entry(Category::KingMackerel, None, Some(50.0)), Division::Offshore, &matrix());
        assert_eq!(outcome, ScoreOutcome::MissingMeasurement(Metric::Weight));
        assert_eq!(outcome.points(), 0);
    }

    #[test]
    fn unknown_category_scores_zero() {
        let m = matrix();
        let outcome = score_detailed(&entry(Category::Wahoo, Some(80.0), None), Division::Offshore, &m);
        assert_eq!(outcome, ScoreOutcome::UnknownCategory);
        assert_eq!(score(&entry(Category::Wahoo, Some(80.0), None), Division::Offshore, &m), 0);
    }

    #[test]
    fn division_selects_the_rule() {
        let m = matrix();
        let red = entry(Category::Redfish, None, Some(28.0));
        assert_eq!(score(&red, Division::Nearshore, &m), 30);
        assert_eq!(score(&red, Division::Offshore, &m), 0);
    }

    #[test]
    fn empty_matrix_scores_everything_zero() {
        let empty = ScoringMatrix::default();
        assert_eq!(score(&entry(Category::Redfish, None, Some(40.0)), Division::Nearshore, &empty), 0);
    }

    proptest! {
        #[test]
        fn score_never_exceeds_best_breakpoint(
            weight in prop::option::of(-50.0f64..500.0),
            length in prop::option::of(-50.0f64..100.0),
            offshore in any::<bool>(),
        ) {
            let division = if offshore { Division::Offshore } else { Division::Nearshore };
            let category = if offshore { Category::KingMackerel } else { Category::Redfish };
            let points = score(&entry(category, weight, length), division, &matrix());
            prop_assert!(points <= 100);
        }

        #[test]
        fn score_is_monotonic_in_measurement(a in 0.0f64..80.0, b in 0.0f64..80.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let m = matrix();
            let low = score(&entry(Category::KingMackerel, Some(lo), None), Division::Offshore, &m);
            let high = score(&entry(Category::KingMackerel, Some(hi), None), Division::Offshore, &m);
            prop_assert!(low <= high);
        }
    }
}
