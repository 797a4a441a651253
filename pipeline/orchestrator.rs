use std::fmt;
use std::sync::Arc;

use serde_json::json;
use shared_logging::LogLevel;

use crate::{
    capability::{CapabilityRegistry, PipelineError},
    chain::AdapterChain,
    config::PipelineConfig,
    lifecycle::{LifecycleFlag, LifecycleResetGuard},
    request::{PlanRequestOptions, PlanningProblem},
    scene::{RobotModel, SceneSnapshot},
    solution::PlanSolution,
    telemetry::PipelineTelemetry,
    validation::validate_solution,
};

/// Topic receiving raw problems when request publication is enabled.
pub const MOTION_PLAN_REQUEST_TOPIC: &str = "pipeline.motion_plan_request";

/// Topic receiving the final solution of every displayed plan.
pub const DISPLAY_PATH_TOPIC: &str = "pipeline.display_planned_path";

/// Topic receiving violation evidence found by the validation stage.
pub const DISPLAY_CONTACTS_TOPIC: &str = "pipeline.display_contacts";

/// Builder assembling a [`PlanningPipeline`] from configuration.
pub struct PlanningPipelineBuilder {
    robot: Arc<RobotModel>,
    config: PipelineConfig,
    registry: CapabilityRegistry,
    telemetry: Option<PipelineTelemetry>,
}

impl PlanningPipelineBuilder {
    /// Creates a builder over a robot model and configuration.
    #[must_use]
    pub fn new(robot: Arc<RobotModel>, config: PipelineConfig) -> Self {
        Self {
            robot,
            config,
            registry: CapabilityRegistry::production_default(),
            telemetry: None,
        }
    }

    /// Overrides the capability registry.
    #[must_use]
    pub fn registry(mut self, registry: CapabilityRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Attaches telemetry sinks.
    #[must_use]
    pub fn telemetry(mut self, telemetry: PipelineTelemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Resolves capabilities and finalizes the pipeline.
    ///
    /// An unresolved solver identifier is fatal. An unresolved adapter
    /// identifier is logged and skipped, shortening the effective chain.
    pub fn build(self) -> Result<PlanningPipeline, PipelineError> {
        let solver = self
            .registry
            .resolve_solver(&self.config.solver)
            .ok_or_else(|| PipelineError::UnknownSolver(self.config.solver.clone()))?;
        let mut adapters = Vec::with_capacity(self.config.adapters.len());
        for name in &self.config.adapters {
            match self.registry.resolve_adapter(name) {
                Some(adapter) => adapters.push(adapter),
                None => {
                    tracing::warn!("skipping unresolved adapter capability '{name}'");
                    if let Some(tel) = &self.telemetry {
                        let _ = tel.log(
                            LogLevel::Warn,
                            "pipeline.adapter.unresolved",
                            json!({ "adapter": name }),
                        );
                    }
                }
            }
        }
        Ok(PlanningPipeline {
            robot: self.robot,
            chain: AdapterChain::new(solver, adapters),
            lifecycle: LifecycleFlag::new(),
            telemetry: self.telemetry,
        })
    }
}

/// Single entry point running request → chain → validation → result.
///
/// One pipeline instance serves one call at a time (single-flight); the
/// instance's configuration is immutable after construction, so accessors
/// are safe from any thread.
pub struct PlanningPipeline {
    robot: Arc<RobotModel>,
    chain: AdapterChain,
    lifecycle: LifecycleFlag,
    telemetry: Option<PipelineTelemetry>,
}

impl fmt::Debug for PlanningPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanningPipeline")
            .field("robot", &self.robot.name)
            .field("chain", &self.chain)
            .field("active", &self.is_active())
            .finish()
    }
}

impl PlanningPipeline {
    /// Creates a builder with the production capability registry.
    #[must_use]
    pub fn builder(robot: Arc<RobotModel>, config: PipelineConfig) -> PlanningPipelineBuilder {
        PlanningPipelineBuilder::new(robot, config)
    }

    /// Solves one planning problem, blocking the calling thread.
    ///
    /// Returns the success flag together with the final solution. Every
    /// exit path, including a panicking capability, restores the lifecycle
    /// to idle before returning.
    #[must_use]
    pub fn generate_plan(
        &self,
        scene: &SceneSnapshot,
        problem: PlanningProblem,
        options: &PlanRequestOptions,
    ) -> (bool, PlanSolution) {
        if !self.lifecycle.try_begin() {
            return (
                false,
                PlanSolution::busy("pipeline is already solving a request"),
            );
        }
        let _guard = LifecycleResetGuard::new(self.lifecycle.clone());
        let cancel = self.lifecycle.cancellation_token();
        let group = problem.group.clone();

        if options.publish_received_request {
            self.event(
                MOTION_PLAN_REQUEST_TOPIC,
                json!({
                    "problem_id": problem.id,
                    "correlation_id": problem.correlation_id,
                    "group": problem.group,
                    "start_state": problem.start_state,
                    "goal": problem.goal.target,
                }),
            );
        }
        self.log(
            LogLevel::Info,
            "pipeline.request.accepted",
            json!({
                "problem_id": problem.id,
                "group": problem.group,
                "solver": self.chain.solver_name(),
            }),
        );

        let mut solution = self.chain.solve(scene, problem, &cancel);

        if options.check_solution_paths {
            let outcome = validate_solution(scene, &group, solution);
            solution = outcome.solution;
            if !outcome.contacts.is_empty() {
                self.log(
                    LogLevel::Warn,
                    "pipeline.validation.contacts",
                    json!({ "contacts": outcome.contacts.len() }),
                );
                self.event(
                    DISPLAY_CONTACTS_TOPIC,
                    serde_json::to_value(&outcome.contacts).unwrap_or_default(),
                );
            }
        }

        if options.display_computed_motion_plans {
            self.event(
                DISPLAY_PATH_TOPIC,
                json!({
                    "status": solution.status.label(),
                    "waypoints": solution.trajectory.len(),
                    "trajectory": serde_json::to_value(&solution.trajectory).unwrap_or_default(),
                }),
            );
        }

        self.log(
            LogLevel::Info,
            "pipeline.request.finished",
            json!({
                "status": solution.status.label(),
                "waypoints": solution.trajectory.len(),
                "planning_time": solution.planning_time,
            }),
        );
        (solution.is_success(), solution)
    }

    /// Requests cooperative termination of the in-flight call.
    ///
    /// Advisory: capabilities observe the request only by polling their
    /// cancellation token. No-op when no call is running.
    pub fn terminate(&self) {
        if self.lifecycle.request_termination() {
            self.log(LogLevel::Info, "pipeline.terminate.requested", json!({}));
        }
    }

    /// Identifier of the backing solver capability.
    #[must_use]
    pub fn solver_name(&self) -> &str {
        self.chain.solver_name()
    }

    /// Identifiers of the successfully resolved adapters, outermost first.
    #[must_use]
    pub fn adapter_names(&self) -> &[String] {
        self.chain.adapter_names()
    }

    /// Robot model this pipeline plans for.
    #[must_use]
    pub const fn robot_model(&self) -> &Arc<RobotModel> {
        &self.robot
    }

    /// Whether a `generate_plan` call is currently in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lifecycle.is_engaged()
    }

    fn log(&self, level: LogLevel, message: &str, fields: serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(level, message, fields);
        }
    }

    fn event(&self, topic: &str, payload: serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.event(topic, payload);
        }
    }
}
