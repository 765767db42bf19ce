use crate::error::GateError;
use crate::stage::{GateContext, GateRequest, GateStage, StageDecision};

/// Capability verification stage.
///
/// Mutating actions require the editor capability. Reads are open to any
/// caller.
pub struct CapabilityStage;

impl GateStage for CapabilityStage {
    fn name(&self) -> &str {
        "capability"
    }

    fn evaluate(
        &self,
        request: &GateRequest<'_>,
        _context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        if !request.action.is_mutation() || request.identity.can_edit() {
            return Ok(StageDecision::Pass);
        }
        Ok(StageDecision::fail(format!(
            "{} lacks the editor capability required for {}",
            request.identity, request.action
        )))
    }
}
