use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Strongly typed identifier for every planning request.
pub type ProblemId = Uuid;

/// Constraint on the terminal state of a trajectory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalConstraint {
    /// Target joint positions in group order.
    pub target: Vec<f64>,
    /// Per-joint tolerance accepted around the target.
    pub tolerance: f64,
}

impl GoalConstraint {
    /// Creates an exact-target constraint with a small default tolerance.
    #[must_use]
    pub fn at(target: Vec<f64>) -> Self {
        Self {
            target,
            tolerance: 1e-3,
        }
    }

    /// Whether a state satisfies the constraint.
    #[must_use]
    pub fn accepts(&self, positions: &[f64]) -> bool {
        positions.len() == self.target.len()
            && positions
                .iter()
                .zip(self.target.iter())
                .all(|(p, t)| (p - t).abs() <= self.tolerance)
    }
}

/// Canonical representation of one planning request.
///
/// Exclusively owned by a single in-flight call; adapters receive it by
/// value and may rewrite it before invoking their continuation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningProblem {
    /// Unique identifier.
    pub id: ProblemId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Joint group the request targets.
    pub group: String,
    /// Start joint positions in group order.
    pub start_state: Vec<f64>,
    /// Goal constraint.
    pub goal: GoalConstraint,
    /// Solving budget in seconds.
    pub allowed_planning_time: f64,
    /// Opaque options bag interpreted by solver and adapters.
    pub solver_options: IndexMap<String, serde_json::Value>,
    /// Correlation identifier for cross-system tracking.
    pub correlation_id: String,
}

impl PlanningProblem {
    /// Creates a builder seeded with defaults.
    #[must_use]
    pub fn builder(
        group: impl Into<String>,
        start_state: Vec<f64>,
        goal: GoalConstraint,
    ) -> PlanningProblemBuilder {
        PlanningProblemBuilder {
            problem: Self {
                id: ProblemId::new_v4(),
                created_at: Utc::now(),
                group: group.into(),
                start_state,
                goal,
                allowed_planning_time: 5.0,
                solver_options: IndexMap::new(),
                correlation_id: Self::generate_correlation_id(),
            },
        }
    }

    /// Reads a numeric option from the options bag.
    #[must_use]
    pub fn option_f64(&self, key: &str) -> Option<f64> {
        self.solver_options.get(key).and_then(serde_json::Value::as_f64)
    }

    fn generate_correlation_id() -> String {
        thread_rng()
            .sample_iter(Alphanumeric)
            .take(16)
            .map(char::from)
            .collect()
    }
}

/// Builder used to construct requests fluently.
#[derive(Debug)]
pub struct PlanningProblemBuilder {
    problem: PlanningProblem,
}

impl PlanningProblemBuilder {
    /// Overrides the planning-time budget.
    #[must_use]
    pub fn allowed_planning_time(mut self, seconds: f64) -> Self {
        self.problem.allowed_planning_time = seconds;
        self
    }

    /// Adds a solver option.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.problem.solver_options.insert(key.into(), value);
        self
    }

    /// Supplies a correlation identifier.
    #[must_use]
    pub fn correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.problem.correlation_id = correlation_id.into();
        self
    }

    /// Consumes the builder returning the finalized problem.
    #[must_use]
    pub fn build(self) -> PlanningProblem {
        self.problem
    }
}

/// Per-call switches controlling side-channel publication and validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlanRequestOptions {
    /// Emit the raw problem to the request sink before processing.
    pub publish_received_request: bool,
    /// Run the validation stage over the chain's solution.
    pub check_solution_paths: bool,
    /// Emit the final solution to the display sink.
    pub display_computed_motion_plans: bool,
}

impl Default for PlanRequestOptions {
    fn default() -> Self {
        Self {
            publish_received_request: false,
            check_solution_paths: true,
            display_computed_motion_plans: true,
        }
    }
}
