use std::time::{Duration, Instant};

use tracing::{debug, info};
use weighin_roster::BoatRoster;
use weighin_types::Tournament;

use crate::config::GateConfig;
use crate::error::GateError;
use crate::stage::{GateContext, GateRequest, GateStage, StageDecision, StageResult};
use crate::stages::{CapabilityStage, ValidationStage};

// ---------------------------------------------------------------------------
// GateResult
// ---------------------------------------------------------------------------

/// The final decision of a gate evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Rejected { stage: String, reason: String },
}

/// The outcome of running a request through the full gate pipeline.
#[derive(Clone, Debug)]
pub struct GateResult {
    pub decision: Decision,
    /// Per-stage results in evaluation order.
    pub stage_results: Vec<StageResult>,
    pub elapsed: Duration,
}

impl GateResult {
    pub fn is_accepted(&self) -> bool {
        self.decision == Decision::Accepted
    }

    /// Turn a rejection into [`GateError::Rejected`].
    pub fn into_result(self) -> Result<Self, GateError> {
        match &self.decision {
            Decision::Accepted => Ok(self),
            Decision::Rejected { stage, reason } => Err(GateError::Rejected {
                stage: stage.clone(),
                reason: reason.clone(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// WeighInGate
// ---------------------------------------------------------------------------

/// Pipeline of stages every ledger or roster request passes through.
pub struct WeighInGate {
    stages: Vec<Box<dyn GateStage>>,
    config: GateConfig,
}

impl WeighInGate {
    /// Create a gate whose pipeline holds only the capability stage.
    /// Every pipeline starts with it.
    pub fn new(config: GateConfig) -> Self {
        Self {
            stages: vec![Box::new(CapabilityStage)],
            config,
        }
    }

    /// Create a gate with the default stage pipeline:
    /// Capability -> Validation
    pub fn with_default_stages(config: GateConfig) -> Self {
        let require_roster = config.require_roster;
        let mut gate = Self::new(config);
        gate.add_stage(Box::new(ValidationStage { require_roster }));
        gate
    }

    /// Append a stage after the ones already present.
    pub fn add_stage(&mut self, stage: Box<dyn GateStage>) {
        self.stages.push(stage);
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Evaluate a request through the full pipeline.
    ///
    /// The pipeline is **fail-fast**: the first stage that fails stops
    /// evaluation and produces a `Rejected` decision.
    pub fn evaluate(
        &self,
        request: &GateRequest<'_>,
        context: &mut GateContext<'_>,
    ) -> Result<GateResult, GateError> {
        let pipeline_start = Instant::now();
        let mut stage_results = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let stage_start = Instant::now();
            let decision = stage.evaluate(request, context)?;

            let result = StageResult {
                stage_name: stage.name().to_string(),
                passed: decision.is_pass(),
                reason: match &decision {
                    StageDecision::Pass => None,
                    StageDecision::Fail { reason } => Some(reason.clone()),
                },
                elapsed: stage_start.elapsed(),
            };
            stage_results.push(result.clone());
            context.previous_stages.push(result);

            if let StageDecision::Fail { reason } = decision {
                info!(
                    identity = %request.identity,
                    action = %request.action,
                    stage = stage.name(),
                    %reason,
                    "request rejected"
                );
                return Ok(GateResult {
                    decision: Decision::Rejected {
                        stage: stage.name().to_string(),
                        reason,
                    },
                    stage_results,
                    elapsed: pipeline_start.elapsed(),
                });
            }
        }

        debug!(
            identity = %request.identity,
            action = %request.action,
            stages = stage_results.len(),
            "request accepted"
        );
        Ok(GateResult {
            decision: Decision::Accepted,
            stage_results,
            elapsed: pipeline_start.elapsed(),
        })
    }

    /// Evaluate with a fresh context and fail on rejection.
    pub fn authorize(
        &self,
        request: &GateRequest<'_>,
        tournament: &Tournament,
        rosters: &[BoatRoster],
    ) -> Result<GateResult, GateError> {
        let mut context = GateContext::new(tournament, rosters);
        self.evaluate(request, &mut context)?.into_result()
    }
}

impl Default for WeighInGate {
    fn default() -> Self {
        Self::with_default_stages(GateConfig::default())
    }
}
