use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Position limits for a single joint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JointLimits {
    /// Lower bound (inclusive).
    pub lower: f64,
    /// Upper bound (inclusive).
    pub upper: f64,
}

impl JointLimits {
    /// Creates symmetric limits around zero.
    #[must_use]
    pub const fn symmetric(half_range: f64) -> Self {
        Self {
            lower: -half_range,
            upper: half_range,
        }
    }

    /// Whether a position sits inside the limits.
    #[must_use]
    pub fn contains(&self, position: f64) -> bool {
        (self.lower..=self.upper).contains(&position)
    }

    /// Clamps a position into the limits.
    #[must_use]
    pub fn clamp(&self, position: f64) -> f64 {
        position.clamp(self.lower, self.upper)
    }
}

/// Named set of joints planned together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointGroup {
    /// Joint names in planning order.
    pub joint_names: Vec<String>,
    /// Per-joint limits, parallel to `joint_names`.
    pub limits: Vec<JointLimits>,
}

impl JointGroup {
    /// Number of joints in the group.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.joint_names.len()
    }
}

/// Kinematic model the pipeline plans for. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotModel {
    /// Model name.
    pub name: String,
    /// Joint groups keyed by identifier.
    pub groups: IndexMap<String, JointGroup>,
}

impl RobotModel {
    /// Creates a model with a single group, the common case in tests.
    #[must_use]
    pub fn single_group(
        name: impl Into<String>,
        group: impl Into<String>,
        joint_names: Vec<String>,
        limits: Vec<JointLimits>,
    ) -> Self {
        let mut groups = IndexMap::new();
        groups.insert(
            group.into(),
            JointGroup {
                joint_names,
                limits,
            },
        );
        Self {
            name: name.into(),
            groups,
        }
    }

    /// Looks up a joint group by identifier.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&JointGroup> {
        self.groups.get(name)
    }
}

/// Axis-aligned forbidden region in configuration space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionRegion {
    /// Operator supplied label reported in violation evidence.
    pub label: String,
    /// Per-joint lower corner.
    pub min: Vec<f64>,
    /// Per-joint upper corner.
    pub max: Vec<f64>,
}

impl CollisionRegion {
    /// Whether the region contains a state. Dimension mismatches never match.
    #[must_use]
    pub fn contains(&self, positions: &[f64]) -> bool {
        positions.len() == self.min.len()
            && positions.len() == self.max.len()
            && positions
                .iter()
                .zip(self.min.iter().zip(self.max.iter()))
                .all(|(p, (lo, hi))| (*lo..=*hi).contains(p))
    }
}

/// Read-only snapshot of the world shared with solver and validation.
///
/// Ownership stays with the caller; the pipeline never mutates a snapshot,
/// so one snapshot may back any number of concurrent pipelines.
#[derive(Debug, Clone)]
pub struct SceneSnapshot {
    robot: Arc<RobotModel>,
    regions: Vec<CollisionRegion>,
}

impl SceneSnapshot {
    /// Creates a snapshot over a robot model and forbidden regions.
    #[must_use]
    pub const fn new(robot: Arc<RobotModel>, regions: Vec<CollisionRegion>) -> Self {
        Self { robot, regions }
    }

    /// Creates an obstacle-free snapshot.
    #[must_use]
    pub const fn unobstructed(robot: Arc<RobotModel>) -> Self {
        Self::new(robot, Vec::new())
    }

    /// Robot model this snapshot was taken for.
    #[must_use]
    pub const fn robot(&self) -> &Arc<RobotModel> {
        &self.robot
    }

    /// Forbidden regions in the snapshot.
    #[must_use]
    pub fn regions(&self) -> &[CollisionRegion] {
        &self.regions
    }

    /// Checks one state for admissibility against limits and regions.
    ///
    /// Returns a description of the first violated condition, or `None` when
    /// the state is admissible.
    #[must_use]
    pub fn check_state(&self, group: &str, positions: &[f64]) -> Option<String> {
        let Some(group_model) = self.robot.group(group) else {
            return Some(format!("unknown joint group '{group}'"));
        };
        if positions.len() != group_model.dimension() {
            return Some(format!(
                "state has {} joints, group '{}' expects {}",
                positions.len(),
                group,
                group_model.dimension()
            ));
        }
        for (idx, (position, limits)) in
            positions.iter().zip(group_model.limits.iter()).enumerate()
        {
            if !limits.contains(*position) {
                return Some(format!(
                    "joint '{}' at {position} outside limits [{}, {}]",
                    group_model.joint_names[idx], limits.lower, limits.upper
                ));
            }
        }
        self.regions
            .iter()
            .find(|region| region.contains(positions))
            .map(|region| format!("state inside collision region '{}'", region.label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_joint_scene(regions: Vec<CollisionRegion>) -> SceneSnapshot {
        let robot = RobotModel::single_group(
            "gantry",
            "arm",
            vec!["j0".into(), "j1".into()],
            vec![JointLimits::symmetric(1.0), JointLimits::symmetric(1.0)],
        );
        SceneSnapshot::new(Arc::new(robot), regions)
    }

    #[test]
    fn admissible_state_passes() {
        let scene = two_joint_scene(Vec::new());
        assert!(scene.check_state("arm", &[0.5, -0.5]).is_none());
    }

    #[test]
    fn limit_violation_names_the_joint() {
        let scene = two_joint_scene(Vec::new());
        let detail = scene.check_state("arm", &[0.0, 2.0]).unwrap();
        assert!(detail.contains("j1"));
    }

    #[test]
    fn region_violation_names_the_region() {
        let scene = two_joint_scene(vec![CollisionRegion {
            label: "pillar".into(),
            min: vec![0.2, 0.2],
            max: vec![0.6, 0.6],
        }]);
        let detail = scene.check_state("arm", &[0.4, 0.4]).unwrap();
        assert!(detail.contains("pillar"));
    }

    #[test]
    fn unknown_group_and_dimension_mismatch_are_violations() {
        let scene = two_joint_scene(Vec::new());
        assert!(scene.check_state("leg", &[0.0, 0.0]).is_some());
        assert!(scene.check_state("arm", &[0.0]).is_some());
    }
}
