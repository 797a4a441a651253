use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::{
    adapters::{ClampStartStateAdapter, TimeParameterizationAdapter},
    lifecycle::CancellationToken,
    request::PlanningProblem,
    scene::SceneSnapshot,
    solution::PlanSolution,
    solvers::LinearInterpolationSolver,
};

/// Pluggable motion solver, the innermost stage of every chain.
///
/// Solvers are opaque and potentially long-running. A cooperating solver
/// polls `cancel` and returns a terminated solution when a request is
/// observed; nothing forces it to.
pub trait MotionSolver: Send + Sync {
    /// Identifier the registry resolves this solver under.
    fn name(&self) -> &str;

    /// Computes a trajectory for the problem against the scene.
    fn solve(
        &self,
        scene: &SceneSnapshot,
        problem: &PlanningProblem,
        cancel: &CancellationToken,
    ) -> PlanSolution;
}

/// Continuation representing everything inside an adapter.
pub trait PlanStage: Send + Sync {
    /// Runs the remaining chain on the (possibly rewritten) problem.
    fn invoke(
        &self,
        scene: &SceneSnapshot,
        problem: PlanningProblem,
        cancel: &CancellationToken,
    ) -> PlanSolution;
}

/// Pluggable middleware wrapping an inner stage.
///
/// An adapter may rewrite the problem before invoking `inner`, decline to
/// invoke `inner` at all and synthesize a failure, or rewrite the solution
/// `inner` returned. It must not replace a non-success inner solution with a
/// success unless it supplies a trajectory justifying the upgrade.
pub trait RequestAdapter: Send + Sync {
    /// Identifier the registry resolves this adapter under.
    fn name(&self) -> &str;

    /// Pre/post-processes around the inner stage.
    fn adapt(
        &self,
        scene: &SceneSnapshot,
        problem: PlanningProblem,
        inner: &dyn PlanStage,
        cancel: &CancellationToken,
    ) -> PlanSolution;
}

/// Errors surfaced while assembling a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configured solver identifier resolved to nothing.
    #[error("unknown solver capability '{0}'")]
    UnknownSolver(String),
    /// The configuration itself is unusable.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}

/// Registry resolving capability identifiers to instances.
///
/// Plays the role of a plugin loader: construction-time resolution only,
/// no dynamic discovery.
#[derive(Default, Clone)]
pub struct CapabilityRegistry {
    solvers: IndexMap<String, Arc<dyn MotionSolver>>,
    adapters: IndexMap<String, Arc<dyn RequestAdapter>>,
}

impl CapabilityRegistry {
    /// Builds a registry seeded with the built-in capabilities.
    #[must_use]
    pub fn production_default() -> Self {
        let mut registry = Self::default();
        registry.register_solver(Arc::new(LinearInterpolationSolver::default()));
        registry.register_adapter(Arc::new(ClampStartStateAdapter::default()));
        registry.register_adapter(Arc::new(TimeParameterizationAdapter::default()));
        registry
    }

    /// Registers a solver under its declared name.
    pub fn register_solver(&mut self, solver: Arc<dyn MotionSolver>) {
        self.solvers.insert(solver.name().to_string(), solver);
    }

    /// Registers an adapter under its declared name.
    pub fn register_adapter(&mut self, adapter: Arc<dyn RequestAdapter>) {
        self.adapters.insert(adapter.name().to_string(), adapter);
    }

    /// Resolves a solver identifier.
    #[must_use]
    pub fn resolve_solver(&self, name: &str) -> Option<Arc<dyn MotionSolver>> {
        self.solvers.get(name).cloned()
    }

    /// Resolves an adapter identifier.
    #[must_use]
    pub fn resolve_adapter(&self, name: &str) -> Option<Arc<dyn RequestAdapter>> {
        self.adapters.get(name).cloned()
    }
}
