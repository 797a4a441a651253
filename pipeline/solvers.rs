use crate::{
    capability::MotionSolver,
    lifecycle::CancellationToken,
    request::PlanningProblem,
    scene::SceneSnapshot,
    solution::{JointTrajectory, JointWaypoint, PlanSolution},
};

/// Default number of interpolation segments between start and goal.
const DEFAULT_SEGMENTS: usize = 16;

/// Straight-line joint-space solver.
///
/// Interpolates between start and goal without avoiding obstacles; the
/// validation stage is responsible for catching colliding waypoints.
/// Waypoints are produced untimed, re-timing belongs to an adapter.
#[derive(Debug, Clone)]
pub struct LinearInterpolationSolver {
    name: String,
}

impl Default for LinearInterpolationSolver {
    fn default() -> Self {
        Self {
            name: "linear_interpolation".into(),
        }
    }
}

impl MotionSolver for LinearInterpolationSolver {
    fn name(&self) -> &str {
        &self.name
    }

    fn solve(
        &self,
        scene: &SceneSnapshot,
        problem: &PlanningProblem,
        cancel: &CancellationToken,
    ) -> PlanSolution {
        let Some(group) = scene.robot().group(&problem.group) else {
            return PlanSolution::failure(format!(
                "robot model has no joint group '{}'",
                problem.group
            ));
        };
        let dimension = group.dimension();
        if problem.start_state.len() != dimension || problem.goal.target.len() != dimension {
            return PlanSolution::failure(format!(
                "start/goal dimension does not match group '{}' ({dimension} joints)",
                problem.group
            ));
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let segments = problem
            .option_f64("segments")
            .map_or(DEFAULT_SEGMENTS, |v| (v.max(1.0)) as usize);

        let mut points = Vec::with_capacity(segments + 1);
        for step in 0..=segments {
            if cancel.is_cancelled() {
                return PlanSolution::terminated("interpolation stopped by termination request");
            }
            #[allow(clippy::cast_precision_loss)]
            let fraction = step as f64 / segments as f64;
            let positions = problem
                .start_state
                .iter()
                .zip(problem.goal.target.iter())
                .map(|(s, g)| s + (g - s) * fraction)
                .collect();
            points.push(JointWaypoint::new(positions));
        }

        PlanSolution::found(JointTrajectory::new(group.joint_names.clone(), points))
    }
}
