use weighin_types::{AnglerId, BoatId, Category, TournamentDay};

use crate::error::GateError;
use crate::stage::{Action, GateContext, GateRequest, GateStage, StageDecision};

/// Structural validation stage.
///
/// Checks catch drafts and edits against the tournament: the day exists,
/// the category belongs to the division, measurements are finite and
/// non-negative, and (when rosters are required) the angler sails on the boat.
pub struct ValidationStage {
    pub require_roster: bool,
}

impl ValidationStage {
    fn check_day(day: TournamentDay, context: &GateContext<'_>) -> Option<String> {
        (!context.tournament.has_day(day)).then(|| {
            format!(
                "day {day} is outside the {}-day event",
                context.tournament.days
            )
        })
    }

    fn check_category(category: Category, context: &GateContext<'_>) -> Option<String> {
        let division = context.tournament.division;
        (!division.allows(category))
            .then(|| format!("category {category} is not part of the {division} division"))
    }

    fn check_measurement(label: &str, value: Option<f64>) -> Option<String> {
        match value {
            Some(v) if !v.is_finite() || v < 0.0 => {
                Some(format!("{label} must be a non-negative number, got {v}"))
            }
            _ => None,
        }
    }

    fn check_angler(
        &self,
        boat: &BoatId,
        angler: &AnglerId,
        context: &GateContext<'_>,
    ) -> Option<String> {
        if !self.require_roster {
            return None;
        }
        match context.roster(boat) {
            None => Some(format!("boat {boat} is not registered")),
            Some(roster) if !roster.contains(angler) => {
                Some(format!("angler {angler} is not on the roster of boat {boat}"))
            }
            Some(_) => None,
        }
    }
}

impl GateStage for ValidationStage {
    fn name(&self) -> &str {
        "validation"
    }

    fn evaluate(
        &self,
        request: &GateRequest<'_>,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        let failure = match request.action {
            Action::AppendEntry => {
                let draft = request
                    .draft
                    .ok_or_else(|| GateError::Malformed("append request carries no draft".into()))?;
                Self::check_day(draft.day, context)
                    .or_else(|| Self::check_category(draft.category, context))
                    .or_else(|| Self::check_measurement("weight", draft.weight))
                    .or_else(|| Self::check_measurement("length", draft.length))
                    .or_else(|| self.check_angler(&draft.boat_id, &draft.angler_id, context))
            }
            Action::UpdateEntry => {
                let changes = request.changes.ok_or_else(|| {
                    GateError::Malformed("update request carries no changes".into())
                })?;
                let category = changes
                    .category
                    .and_then(|c| Self::check_category(c, context));
                let angler = match (&changes.angler_id, request.boat) {
                    (Some(angler), Some(boat)) => self.check_angler(boat, angler, context),
                    (Some(_), None) => {
                        return Err(GateError::Malformed(
                            "angler change requires the entry's boat".into(),
                        ))
                    }
                    (None, _) => None,
                };
                category
                    .or_else(|| Self::check_measurement("weight", changes.weight.flatten()))
                    .or_else(|| Self::check_measurement("length", changes.length.flatten()))
                    .or(angler)
            }
            Action::AssignZipTie => {
                if !context.tournament.division.uses_zip_ties() {
                    Some(format!(
                        "{} division does not use zip-ties",
                        context.tournament.division
                    ))
                } else {
                    request
                        .boat
                        .filter(|boat| context.roster(boat).is_none())
                        .map(|boat| format!("boat {boat} is not registered"))
                }
            }
            Action::RemoveEntry | Action::EditRoster | Action::Read => None,
        };

        Ok(failure.map_or(StageDecision::Pass, StageDecision::fail))
    }
}
