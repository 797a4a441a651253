use serde::{Deserialize, Serialize};

/// Terminal status of a planning attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlanStatus {
    /// A complete, admissible trajectory was produced.
    Success,
    /// The solver or an adapter could not produce a trajectory.
    Failure,
    /// A cooperative termination request was observed mid-solve.
    Terminated,
    /// Validation trimmed the trajectory at the first inadmissible waypoint.
    InvalidTail,
    /// The pipeline rejected the call because another one was in flight.
    Busy,
}

impl PlanStatus {
    /// Whether the status represents a fully usable plan.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns a short human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Terminated => "terminated",
            Self::InvalidTail => "invalid_tail",
            Self::Busy => "busy",
        }
    }
}

/// Single configuration-space state along a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointWaypoint {
    /// Joint positions in group order.
    pub positions: Vec<f64>,
    /// Seconds from trajectory start.
    pub time_from_start: f64,
}

impl JointWaypoint {
    /// Creates an untimed waypoint.
    #[must_use]
    pub const fn new(positions: Vec<f64>) -> Self {
        Self {
            positions,
            time_from_start: 0.0,
        }
    }
}

/// Ordered sequence of waypoints for one joint group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointTrajectory {
    /// Names of the joints each waypoint spans.
    pub joint_names: Vec<String>,
    /// Ordered waypoints.
    pub points: Vec<JointWaypoint>,
}

impl JointTrajectory {
    /// Creates a trajectory over the named joints.
    #[must_use]
    pub const fn new(joint_names: Vec<String>, points: Vec<JointWaypoint>) -> Self {
        Self {
            joint_names,
            points,
        }
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the trajectory holds no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Keeps only the first `len` waypoints.
    pub fn truncate(&mut self, len: usize) {
        self.points.truncate(len);
    }
}

/// Evidence recorded when a waypoint violates scene admissibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactEvidence {
    /// Index of the violating waypoint in the original trajectory.
    pub waypoint_index: usize,
    /// Description of the violated condition.
    pub detail: String,
}

/// Planning response handed back through the chain and to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSolution {
    /// Computed trajectory; empty unless the status carries waypoints.
    pub trajectory: JointTrajectory,
    /// Terminal status.
    pub status: PlanStatus,
    /// Diagnostic message; non-empty on every non-success status.
    pub message: String,
    /// Violation evidence recorded by the validation stage.
    pub contacts: Vec<ContactEvidence>,
    /// Wall-clock seconds spent inside the chain.
    pub planning_time: f64,
}

impl PlanSolution {
    /// Creates a successful solution around a trajectory.
    #[must_use]
    pub fn found(trajectory: JointTrajectory) -> Self {
        Self {
            trajectory,
            status: PlanStatus::Success,
            message: String::new(),
            contacts: Vec::new(),
            planning_time: 0.0,
        }
    }

    /// Creates a failure with an empty trajectory.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::empty(PlanStatus::Failure, message)
    }

    /// Creates a solution reporting an observed termination request.
    #[must_use]
    pub fn terminated(message: impl Into<String>) -> Self {
        Self::empty(PlanStatus::Terminated, message)
    }

    /// Creates a busy rejection.
    #[must_use]
    pub fn busy(message: impl Into<String>) -> Self {
        Self::empty(PlanStatus::Busy, message)
    }

    fn empty(status: PlanStatus, message: impl Into<String>) -> Self {
        Self {
            trajectory: JointTrajectory::default(),
            status,
            message: message.into(),
            contacts: Vec::new(),
            planning_time: 0.0,
        }
    }

    /// Whether the solution carries a fully usable plan.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_success_constructors_leave_trajectory_empty() {
        for solution in [
            PlanSolution::failure("no path"),
            PlanSolution::terminated("aborted"),
            PlanSolution::busy("in flight"),
        ] {
            assert!(solution.trajectory.is_empty());
            assert!(!solution.message.is_empty());
            assert!(!solution.is_success());
        }
    }

    #[test]
    fn found_solution_is_success() {
        let trajectory = JointTrajectory::new(
            vec!["j0".into()],
            vec![JointWaypoint::new(vec![0.0]), JointWaypoint::new(vec![1.0])],
        );
        let solution = PlanSolution::found(trajectory);
        assert!(solution.is_success());
        assert_eq!(solution.trajectory.len(), 2);
        assert_eq!(solution.status.label(), "success");
    }
}
