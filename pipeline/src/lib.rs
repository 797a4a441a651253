#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Kinema motion-planning pipeline orchestration library.

/// Planning request primitives and per-call options.
#[path = "../request.rs"]
pub mod request;

/// Trajectories, statuses, and violation evidence.
#[path = "../solution.rs"]
pub mod solution;

/// Robot model and read-only scene snapshot.
#[path = "../scene.rs"]
pub mod scene;

/// Solver/adapter capability interfaces and the registry.
#[path = "../capability.rs"]
pub mod capability;

/// Built-in motion solvers.
#[path = "../solvers.rs"]
pub mod solvers;

/// Built-in request adapters.
#[path = "../adapters.rs"]
pub mod adapters;

/// Onion-ordered adapter chain composition.
#[path = "../chain.rs"]
pub mod chain;

/// Post-solve path validation and trimming.
#[path = "../validation.rs"]
pub mod validation;

/// Lifecycle state machine and cooperative cancellation.
#[path = "../lifecycle.rs"]
pub mod lifecycle;

/// Declarative pipeline configuration.
#[path = "../config.rs"]
pub mod config;

/// Telemetry sinks bridging the synchronous pipeline to the event bus.
#[path = "../telemetry.rs"]
pub mod telemetry;

/// High-level pipeline orchestrator.
#[path = "../orchestrator.rs"]
pub mod orchestrator;

/// Prelude exports for consumers that drive the pipeline.
pub mod prelude {
    pub use crate::capability::{
        CapabilityRegistry, MotionSolver, PipelineError, PlanStage, RequestAdapter,
    };
    pub use crate::chain::AdapterChain;
    pub use crate::config::PipelineConfig;
    pub use crate::lifecycle::{CancellationToken, LifecycleFlag, LifecycleState};
    pub use crate::orchestrator::{PlanningPipeline, PlanningPipelineBuilder};
    pub use crate::request::{GoalConstraint, PlanRequestOptions, PlanningProblem};
    pub use crate::scene::{RobotModel, SceneSnapshot};
    pub use crate::solution::{ContactEvidence, JointTrajectory, PlanSolution, PlanStatus};
    pub use crate::telemetry::{PipelineTelemetry, PipelineTelemetryBuilder};
    pub use crate::validation::validate_solution;
}
