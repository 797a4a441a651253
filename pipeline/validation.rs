use crate::{
    scene::SceneSnapshot,
    solution::{ContactEvidence, PlanSolution, PlanStatus},
};

/// Result of one validation pass.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    /// The (possibly trimmed) solution.
    pub solution: PlanSolution,
    /// Evidence for every violation found, for the contacts sink.
    pub contacts: Vec<ContactEvidence>,
}

/// Verifies every waypoint of a successful solution against the scene.
///
/// On the first inadmissible waypoint at index `i` the trajectory is
/// truncated to the admissible prefix of length `i`, the status becomes
/// [`PlanStatus::InvalidTail`], and evidence referencing `i` is recorded.
/// Non-success solutions and fully admissible trajectories pass through
/// untouched. Pure function of (solution, scene); the scene is never
/// mutated.
#[must_use]
pub fn validate_solution(
    scene: &SceneSnapshot,
    group: &str,
    mut solution: PlanSolution,
) -> ValidationOutcome {
    if !solution.is_success() {
        return ValidationOutcome {
            solution,
            contacts: Vec::new(),
        };
    }
    let violation = solution
        .trajectory
        .points
        .iter()
        .enumerate()
        .find_map(|(index, point)| {
            scene
                .check_state(group, &point.positions)
                .map(|detail| ContactEvidence {
                    waypoint_index: index,
                    detail,
                })
        });
    let Some(evidence) = violation else {
        return ValidationOutcome {
            solution,
            contacts: Vec::new(),
        };
    };
    solution.trajectory.truncate(evidence.waypoint_index);
    solution.status = PlanStatus::InvalidTail;
    solution.message = format!(
        "trajectory trimmed at waypoint {}: {}",
        evidence.waypoint_index, evidence.detail
    );
    solution.contacts = vec![evidence.clone()];
    ValidationOutcome {
        solution,
        contacts: vec![evidence],
    }
}
