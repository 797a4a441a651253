use crate::{
    capability::{PlanStage, RequestAdapter},
    lifecycle::CancellationToken,
    request::PlanningProblem,
    scene::SceneSnapshot,
    solution::PlanSolution,
};

/// Clamps the start state into joint limits before solving.
///
/// A start state within `margin` of its limits is silently clamped; one
/// farther out is rejected without invoking the rest of the chain.
#[derive(Debug, Clone)]
pub struct ClampStartStateAdapter {
    name: String,
    margin: f64,
}

impl ClampStartStateAdapter {
    /// Creates the adapter with an explicit clamping margin.
    #[must_use]
    pub fn with_margin(margin: f64) -> Self {
        Self {
            name: "clamp_start_state".into(),
            margin,
        }
    }
}

impl Default for ClampStartStateAdapter {
    fn default() -> Self {
        Self::with_margin(0.1)
    }
}

impl RequestAdapter for ClampStartStateAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn adapt(
        &self,
        scene: &SceneSnapshot,
        mut problem: PlanningProblem,
        inner: &dyn PlanStage,
        cancel: &CancellationToken,
    ) -> PlanSolution {
        // Unknown groups fall through; the solver owns that diagnostic.
        if let Some(group) = scene.robot().group(&problem.group) {
            for (idx, (position, limits)) in problem
                .start_state
                .iter_mut()
                .zip(group.limits.iter())
                .enumerate()
            {
                let overshoot = (limits.lower - *position).max(*position - limits.upper);
                if overshoot > self.margin {
                    return PlanSolution::failure(format!(
                        "start state joint '{}' at {position} exceeds limits by {overshoot:.3}, \
                         beyond the {:.3} clamping margin",
                        group.joint_names[idx], self.margin
                    ));
                }
                *position = limits.clamp(*position);
            }
        }
        inner.invoke(scene, problem, cancel)
    }
}

/// Re-times successful trajectories with a constant-velocity profile.
///
/// Waypoint k is stamped at the time the slowest joint needs to reach it
/// from waypoint k-1 at the nominal joint velocity.
#[derive(Debug, Clone)]
pub struct TimeParameterizationAdapter {
    name: String,
    nominal_velocity: f64,
}

impl TimeParameterizationAdapter {
    /// Creates the adapter with an explicit nominal joint velocity (rad/s).
    #[must_use]
    pub fn with_velocity(nominal_velocity: f64) -> Self {
        Self {
            name: "time_parameterization".into(),
            nominal_velocity: nominal_velocity.max(f64::EPSILON),
        }
    }
}

impl Default for TimeParameterizationAdapter {
    fn default() -> Self {
        Self::with_velocity(1.0)
    }
}

impl RequestAdapter for TimeParameterizationAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn adapt(
        &self,
        scene: &SceneSnapshot,
        problem: PlanningProblem,
        inner: &dyn PlanStage,
        cancel: &CancellationToken,
    ) -> PlanSolution {
        let mut solution = inner.invoke(scene, problem, cancel);
        if !solution.is_success() {
            return solution;
        }
        let mut elapsed = 0.0;
        let mut previous: Option<Vec<f64>> = None;
        for point in &mut solution.trajectory.points {
            if let Some(prev) = &previous {
                let largest_delta = point
                    .positions
                    .iter()
                    .zip(prev.iter())
                    .map(|(a, b)| (a - b).abs())
                    .fold(0.0_f64, f64::max);
                elapsed += largest_delta / self.nominal_velocity;
            }
            point.time_from_start = elapsed;
            previous = Some(point.positions.clone());
        }
        solution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::GoalConstraint;
    use crate::scene::{JointLimits, RobotModel};
    use crate::solution::{JointTrajectory, JointWaypoint};
    use std::sync::Arc;

    struct EchoStage;

    impl PlanStage for EchoStage {
        fn invoke(
            &self,
            _scene: &SceneSnapshot,
            problem: PlanningProblem,
            _cancel: &CancellationToken,
        ) -> PlanSolution {
            PlanSolution::found(JointTrajectory::new(
                vec!["j0".into()],
                vec![JointWaypoint::new(problem.start_state)],
            ))
        }
    }

    fn scene() -> SceneSnapshot {
        SceneSnapshot::unobstructed(Arc::new(RobotModel::single_group(
            "gantry",
            "arm",
            vec!["j0".into()],
            vec![JointLimits::symmetric(1.0)],
        )))
    }

    #[test]
    fn clamps_start_state_within_margin() {
        let problem =
            PlanningProblem::builder("arm", vec![1.05], GoalConstraint::at(vec![0.0])).build();
        let adapter = ClampStartStateAdapter::default();
        let solution = adapter.adapt(&scene(), problem, &EchoStage, &CancellationToken::inert());
        assert!(solution.is_success());
        assert_eq!(solution.trajectory.points[0].positions, vec![1.0]);
    }

    #[test]
    fn rejects_start_state_beyond_margin() {
        let problem =
            PlanningProblem::builder("arm", vec![1.5], GoalConstraint::at(vec![0.0])).build();
        let adapter = ClampStartStateAdapter::default();
        let solution = adapter.adapt(&scene(), problem, &EchoStage, &CancellationToken::inert());
        assert!(!solution.is_success());
        assert!(solution.message.contains("j0"));
    }

    struct TwoPointStage;

    impl PlanStage for TwoPointStage {
        fn invoke(
            &self,
            _scene: &SceneSnapshot,
            _problem: PlanningProblem,
            _cancel: &CancellationToken,
        ) -> PlanSolution {
            PlanSolution::found(JointTrajectory::new(
                vec!["j0".into()],
                vec![
                    JointWaypoint::new(vec![0.0]),
                    JointWaypoint::new(vec![0.5]),
                    JointWaypoint::new(vec![1.0]),
                ],
            ))
        }
    }

    #[test]
    fn retimes_success_with_monotonic_stamps() {
        let problem =
            PlanningProblem::builder("arm", vec![0.0], GoalConstraint::at(vec![1.0])).build();
        let adapter = TimeParameterizationAdapter::with_velocity(0.5);
        let solution =
            adapter.adapt(&scene(), problem, &TwoPointStage, &CancellationToken::inert());
        let stamps: Vec<f64> = solution
            .trajectory
            .points
            .iter()
            .map(|p| p.time_from_start)
            .collect();
        assert_eq!(stamps, vec![0.0, 1.0, 2.0]);
    }

    struct FailingStage;

    impl PlanStage for FailingStage {
        fn invoke(
            &self,
            _scene: &SceneSnapshot,
            _problem: PlanningProblem,
            _cancel: &CancellationToken,
        ) -> PlanSolution {
            PlanSolution::failure("no path")
        }
    }

    #[test]
    fn retiming_passes_failures_through() {
        let problem =
            PlanningProblem::builder("arm", vec![0.0], GoalConstraint::at(vec![1.0])).build();
        let adapter = TimeParameterizationAdapter::default();
        let solution =
            adapter.adapt(&scene(), problem, &FailingStage, &CancellationToken::inert());
        assert!(!solution.is_success());
        assert_eq!(solution.message, "no path");
    }
}
