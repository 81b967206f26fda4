/*!
Joints between bodies and the ordered constraint collection.

A [`Constraint`] links a child body (`bone_a`) to a parent body (`bone_b`). Frames
are expressed in each bone's own space. The joint is named after the child bone;
[`ConstraintGraph`] never holds two constraints with the same joint name.
*/

use serde::{Deserialize, Serialize};

use crate::{
    constants::{HINGE_TWIST_LIMIT_DEG, SKEL_JOINT_SWING_LIMIT_DEG, SKEL_JOINT_TWIST_LIMIT_DEG},
    error::AssetError,
    types::Transform,
};

/// Degree of freedom state for one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Motion {
    Free,
    #[default]
    Limited,
    Locked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AngularAxis {
    Swing1,
    Swing2,
    Twist,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintPreset {
    /// Linear locked, angular limited.
    SkelJoint,
    /// Rotation about the twist axis only.
    Hinge,
    /// Translation along X only.
    Prismatic,
    /// Linear locked, angular free.
    BallAndSocket,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearLimits {
    pub x: Motion,
    pub y: Motion,
    pub z: Motion,
    /// Distance allowed along limited axes.
    pub limit: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngularLimits {
    pub swing1: Motion,
    pub swing2: Motion,
    pub twist: Motion,
    pub swing1_limit_deg: f32,
    pub swing2_limit_deg: f32,
    pub twist_limit_deg: f32,
}

impl AngularLimits {
    pub fn motion(&self, axis: AngularAxis) -> Motion {
        match axis {
            AngularAxis::Swing1 => self.swing1,
            AngularAxis::Swing2 => self.swing2,
            AngularAxis::Twist => self.twist,
        }
    }

    pub fn set_motion(&mut self, axis: AngularAxis, motion: Motion) {
        match axis {
            AngularAxis::Swing1 => self.swing1 = motion,
            AngularAxis::Swing2 => self.swing2 = motion,
            AngularAxis::Twist => self.twist = motion,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveParams {
    pub position_enabled: bool,
    pub velocity_enabled: bool,
    pub spring: f32,
    pub damping: f32,
    /// Zero means unlimited.
    pub force_limit: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintProfile {
    pub linear: LinearLimits,
    pub angular: AngularLimits,
    pub linear_drive: DriveParams,
    pub angular_drive: DriveParams,
    /// Disable collision between the two constrained bodies in simulation.
    pub disable_collision: bool,
    pub linear_breakable: bool,
    pub linear_break_threshold: f32,
    pub angular_breakable: bool,
    pub angular_break_threshold: f32,
}

impl Default for ConstraintProfile {
    fn default() -> Self {
        let mut profile = Self {
            linear: LinearLimits {
                x: Motion::Locked,
                y: Motion::Locked,
                z: Motion::Locked,
                limit: 0.0,
            },
            angular: AngularLimits {
                swing1: Motion::Limited,
                swing2: Motion::Limited,
                twist: Motion::Limited,
                swing1_limit_deg: 0.0,
                swing2_limit_deg: 0.0,
                twist_limit_deg: 0.0,
            },
            linear_drive: DriveParams::default(),
            angular_drive: DriveParams::default(),
            disable_collision: true,
            linear_breakable: false,
            linear_break_threshold: 300.0,
            angular_breakable: false,
            angular_break_threshold: 500.0,
        };
        profile.apply_preset(ConstraintPreset::SkelJoint, true);
        profile
    }
}

impl ConstraintProfile {
    /// Sets the motions of a preset. Limit angles are only written when
    /// `overwrite_limits` is set.
    pub fn apply_preset(&mut self, preset: ConstraintPreset, overwrite_limits: bool) {
        use Motion::{Free, Limited, Locked};

        let (linear, angular) = match preset {
            ConstraintPreset::SkelJoint => ([Locked; 3], [Limited; 3]),
            ConstraintPreset::Hinge => ([Locked; 3], [Locked, Locked, Free]),
            ConstraintPreset::Prismatic => ([Free, Locked, Locked], [Locked; 3]),
            ConstraintPreset::BallAndSocket => ([Locked; 3], [Free; 3]),
        };
        [self.linear.x, self.linear.y, self.linear.z] = linear;
        [self.angular.swing1, self.angular.swing2, self.angular.twist] = angular;

        if overwrite_limits {
            match preset {
                ConstraintPreset::SkelJoint => {
                    self.angular.swing1_limit_deg = SKEL_JOINT_SWING_LIMIT_DEG;
                    self.angular.swing2_limit_deg = SKEL_JOINT_SWING_LIMIT_DEG;
                    self.angular.twist_limit_deg = SKEL_JOINT_TWIST_LIMIT_DEG;
                }
                ConstraintPreset::Hinge => {
                    self.angular.twist_limit_deg = HINGE_TWIST_LIMIT_DEG;
                }
                ConstraintPreset::Prismatic | ConstraintPreset::BallAndSocket => {}
            }
        }
    }

    /// Moves the single limited angular axis along swing1 → swing2 → twist → swing1.
    /// The other two axes are locked.
    pub fn cycle_active_angular(&mut self) {
        let a = &self.angular;
        let next = if a.swing1 == Motion::Limited {
            AngularAxis::Swing2
        } else if a.swing2 == Motion::Limited {
            AngularAxis::Twist
        } else {
            AngularAxis::Swing1
        };
        for axis in [AngularAxis::Swing1, AngularAxis::Swing2, AngularAxis::Twist] {
            let motion = if axis == next {
                Motion::Limited
            } else {
                Motion::Locked
            };
            self.angular.set_motion(axis, motion);
        }
    }

    /// Limited becomes locked; anything else becomes limited.
    pub fn toggle_angular(&mut self, axis: AngularAxis) {
        let motion = match self.angular.motion(axis) {
            Motion::Limited => Motion::Locked,
            Motion::Free | Motion::Locked => Motion::Limited,
        };
        self.angular.set_motion(axis, motion);
    }

    pub fn set_angular_motions(&mut self, motion: Motion) {
        self.angular.swing1 = motion;
        self.angular.swing2 = motion;
        self.angular.twist = motion;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub joint_name: String,
    /// Child bone.
    pub bone_a: String,
    /// Parent bone.
    pub bone_b: String,
    /// Joint frame in `bone_a` space.
    pub frame_a: Transform,
    /// Joint frame in `bone_b` space.
    pub frame_b: Transform,
    pub profile: ConstraintProfile,
}

impl Constraint {
    pub fn new(joint_name: &str, child_bone: &str, parent_bone: &str) -> Self {
        Self {
            joint_name: joint_name.to_string(),
            bone_a: child_bone.to_string(),
            bone_b: parent_bone.to_string(),
            frame_a: Transform::identity(),
            frame_b: Transform::identity(),
            profile: ConstraintProfile::default(),
        }
    }

    pub fn touches(&self, bone_name: &str) -> bool {
        self.bone_a == bone_name || self.bone_b == bone_name
    }

    /// The bone at the other end from `bone_name`, if the constraint touches it.
    pub fn other_bone(&self, bone_name: &str) -> Option<&str> {
        if self.bone_a == bone_name {
            Some(&self.bone_b)
        } else if self.bone_b == bone_name {
            Some(&self.bone_a)
        } else {
            None
        }
    }

    /// Copies limits, drives and frame orientations. Name, bones and frame
    /// positions stay.
    pub fn copy_params_from(&mut self, other: &Constraint) {
        self.profile = other.profile.clone();
        self.frame_a.rotation = other.frame_a.rotation;
        self.frame_b.rotation = other.frame_b.rotation;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintGraph {
    constraints: Vec<Constraint>,
}

impl ConstraintGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn get(&self, index: usize) -> Option<&Constraint> {
        self.constraints.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Constraint> {
        self.constraints.get_mut(index)
    }

    pub fn find_constraint_index(&self, joint_name: &str) -> Option<usize> {
        self.constraints.iter().position(|c| c.joint_name == joint_name)
    }

    /// Appends a skeletal-joint constraint, or returns the index of the existing joint
    /// with that name (left untouched).
    pub fn create_constraint(&mut self, joint_name: &str, child_bone: &str, parent_bone: &str) -> usize {
        if let Some(existing) = self.find_constraint_index(joint_name) {
            return existing;
        }
        self.constraints.push(Constraint::new(joint_name, child_bone, parent_bone));
        self.constraints.len() - 1
    }

    /// Appends a copy of `template`, unless a joint with its name already exists.
    pub fn create_constraint_from(&mut self, template: &Constraint) -> usize {
        if let Some(existing) = self.find_constraint_index(&template.joint_name) {
            return existing;
        }
        self.constraints.push(template.clone());
        self.constraints.len() - 1
    }

    pub fn destroy_constraint(&mut self, index: usize) -> Result<Constraint, AssetError> {
        if index >= self.constraints.len() {
            return Err(AssetError::InvalidConstraintIndex {
                index,
                count: self.constraints.len(),
            });
        }
        Ok(self.constraints.remove(index))
    }

    /// Indices of constraints with `bone_name` at either end, ascending.
    pub fn constraints_touching(&self, bone_name: &str) -> Vec<usize> {
        self.constraints
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.touches(bone_name).then_some(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Quat, Vec3};

    #[test]
    fn default_profile_is_skeletal_joint() {
        let p = ConstraintProfile::default();
        assert_eq!(p.linear.x, Motion::Locked);
        assert_eq!(p.linear.z, Motion::Locked);
        assert_eq!(p.angular.swing1, Motion::Limited);
        assert_eq!(p.angular.twist, Motion::Limited);
        assert_eq!(p.angular.swing1_limit_deg, 45.0);
        assert_eq!(p.angular.swing2_limit_deg, 45.0);
        assert_eq!(p.angular.twist_limit_deg, 15.0);
    }

    #[test]
    fn presets_without_overwrite_keep_limits() {
        let mut p = ConstraintProfile::default();
        p.angular.twist_limit_deg = 70.0;
        p.apply_preset(ConstraintPreset::Hinge, false);
        assert_eq!(p.angular.twist, Motion::Free);
        assert_eq!(p.angular.swing1, Motion::Locked);
        assert_eq!(p.angular.twist_limit_deg, 70.0);

        p.apply_preset(ConstraintPreset::Hinge, true);
        assert_eq!(p.angular.twist_limit_deg, HINGE_TWIST_LIMIT_DEG);

        p.apply_preset(ConstraintPreset::Prismatic, true);
        assert_eq!(p.linear.x, Motion::Free);
        assert_eq!(p.linear.y, Motion::Locked);
        assert_eq!(p.angular.twist, Motion::Locked);

        p.apply_preset(ConstraintPreset::BallAndSocket, false);
        assert_eq!(p.angular.swing2, Motion::Free);
        assert_eq!(p.linear.x, Motion::Locked);
    }

    #[test]
    fn cycling_walks_the_three_axes() {
        let mut p = ConstraintProfile::default();
        // All three limited: swing1 counts as the active one.
        p.cycle_active_angular();
        assert_eq!(
            (p.angular.swing1, p.angular.swing2, p.angular.twist),
            (Motion::Locked, Motion::Limited, Motion::Locked)
        );
        p.cycle_active_angular();
        assert_eq!(p.angular.twist, Motion::Limited);
        assert_eq!(p.angular.swing2, Motion::Locked);
        p.cycle_active_angular();
        assert_eq!(p.angular.swing1, Motion::Limited);
        assert_eq!(p.angular.twist, Motion::Locked);

        p.apply_preset(ConstraintPreset::BallAndSocket, false);
        p.cycle_active_angular();
        assert_eq!(p.angular.swing1, Motion::Limited);
    }

    #[test]
    fn toggle_flips_between_limited_and_locked() {
        let mut p = ConstraintProfile::default();
        p.toggle_angular(AngularAxis::Twist);
        assert_eq!(p.angular.twist, Motion::Locked);
        p.toggle_angular(AngularAxis::Twist);
        assert_eq!(p.angular.twist, Motion::Limited);

        p.angular.swing2 = Motion::Free;
        p.toggle_angular(AngularAxis::Swing2);
        assert_eq!(p.angular.swing2, Motion::Limited);
    }

    #[test]
    fn copy_params_keeps_identity_and_positions() {
        let mut src = Constraint::new("lowerarm_l", "lowerarm_l", "upperarm_l");
        src.profile.angular.swing1_limit_deg = 80.0;
        src.frame_b = Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_axis_angle(&Vec3::x_axis(), 0.5),
        );

        let mut dst = Constraint::new("lowerarm_r", "lowerarm_r", "upperarm_r");
        dst.frame_b.translation = Vec3::new(-1.0, 2.0, 3.0);
        dst.copy_params_from(&src);

        assert_eq!(dst.joint_name, "lowerarm_r");
        assert_eq!(dst.bone_b, "upperarm_r");
        assert_eq!(dst.profile.angular.swing1_limit_deg, 80.0);
        assert_eq!(dst.frame_b.rotation, src.frame_b.rotation);
        assert_eq!(dst.frame_b.translation, Vec3::new(-1.0, 2.0, 3.0));
    }

    #[test]
    fn graph_is_idempotent_by_joint_name() {
        let mut g = ConstraintGraph::new();
        let a = g.create_constraint("spine_01", "spine_01", "pelvis");
        let b = g.create_constraint("spine_02", "spine_02", "spine_01");
        assert_eq!(g.create_constraint("spine_01", "spine_01", "somewhere_else"), a);
        assert_eq!(g.get(a).unwrap().bone_b, "pelvis");

        let mut template = g.get(b).unwrap().clone();
        assert_eq!(g.create_constraint_from(&template), b);
        template.joint_name = "neck".into();
        assert_eq!(g.create_constraint_from(&template), 2);
        assert_eq!(g.len(), 3);
    }

    #[test]
    fn touching_and_destroy() {
        let mut g = ConstraintGraph::new();
        g.create_constraint("spine_01", "spine_01", "pelvis");
        g.create_constraint("spine_02", "spine_02", "spine_01");
        g.create_constraint("thigh_l", "thigh_l", "pelvis");

        assert_eq!(g.constraints_touching("spine_01"), vec![0, 1]);
        assert_eq!(g.constraints_touching("pelvis"), vec![0, 2]);
        assert_eq!(g.get(1).unwrap().other_bone("spine_01"), Some("spine_02"));
        assert_eq!(g.get(1).unwrap().other_bone("pelvis"), None);

        g.destroy_constraint(0).unwrap();
        assert_eq!(g.find_constraint_index("thigh_l"), Some(1));
        assert!(matches!(
            g.destroy_constraint(7),
            Err(AssetError::InvalidConstraintIndex { index: 7, count: 2 })
        ));
    }
}
