/*!
Bodies and the ordered body collection.

A [`Body`] is identified by the bone it is attached to; its position in
[`BodyGraph`] is only an index and shifts when an earlier body is destroyed.
Lookups by name go through a lazily built name→index map that is discarded on
every structural change and rebuilt on the next query.
*/

use std::{cell::OnceCell, collections::HashMap};

use serde::{Deserialize, Serialize};

use crate::{error::AssetError, shapes::AggregateGeom, skeleton::SkeletonView};

/// How the body participates in simulation. Ordered so that `max` picks the most
/// simulated of two bodies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PhysicsType {
    /// Follow the owner's setting.
    #[default]
    Default,
    Kinematic,
    Simulated,
}

/// Which collision channels the body takes part in. Ordered so that `min` picks the
/// more restrictive of two settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CollisionEnabled {
    NoCollision,
    QueryOnly,
    PhysicsOnly,
    #[default]
    QueryAndPhysics,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    bone_name: String,
    pub geom: AggregateGeom,
    pub physics_type: PhysicsType,
    pub collision_enabled: CollisionEnabled,
    pub phys_material: Option<String>,
    /// Whether the body contributes to the owner's bounds.
    pub consider_for_bounds: bool,
}

impl Body {
    pub fn new(bone_name: impl Into<String>) -> Self {
        Self {
            bone_name: bone_name.into(),
            geom: AggregateGeom::default(),
            physics_type: PhysicsType::default(),
            collision_enabled: CollisionEnabled::default(),
            phys_material: None,
            consider_for_bounds: true,
        }
    }

    /// The bone this body is attached to. Fixed for the life of the body.
    pub fn bone_name(&self) -> &str {
        &self.bone_name
    }

    /// Copies everything but the bone name.
    pub fn copy_properties_from(&mut self, other: &Body) {
        self.geom = other.geom.clone();
        self.physics_type = other.physics_type;
        self.collision_enabled = other.collision_enabled;
        self.phys_material = other.phys_material.clone();
        self.consider_for_bounds = other.consider_for_bounds;
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BodyGraph {
    bodies: Vec<Body>,
    #[serde(skip)]
    name_cache: OnceCell<HashMap<String, usize>>,
}

impl PartialEq for BodyGraph {
    fn eq(&self, other: &Self) -> bool {
        self.bodies == other.bodies
    }
}

impl BodyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn get(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    /// Mutable access to one body's shapes and settings. The name cache is dropped since the
    /// whole value can still be replaced.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Body> {
        self.name_cache.take();
        self.bodies.get_mut(index)
    }

    fn name_index(&self) -> &HashMap<String, usize> {
        self.name_cache.get_or_init(|| {
            self.bodies
                .iter()
                .enumerate()
                .map(|(i, b)| (b.bone_name.clone(), i))
                .collect()
        })
    }

    pub fn find_body_index(&self, bone_name: &str) -> Option<usize> {
        self.name_index().get(bone_name).copied()
    }

    /// Appends a default body for `bone_name`, or returns the existing one's index.
    pub fn create_body(&mut self, bone_name: &str) -> usize {
        if let Some(existing) = self.find_body_index(bone_name) {
            return existing;
        }
        self.bodies.push(Body::new(bone_name));
        self.name_cache.take();
        self.bodies.len() - 1
    }

    /// Removes one body. Constraints and exclusion pairs are left to the caller.
    pub fn destroy_body(&mut self, index: usize) -> Result<Body, AssetError> {
        if index >= self.bodies.len() {
            return Err(AssetError::InvalidBodyIndex {
                index,
                count: self.bodies.len(),
            });
        }
        self.name_cache.take();
        Ok(self.bodies.remove(index))
    }

    /// Bodies attached to bones at or below `bone_name`, by body index.
    ///
    /// Pure hierarchy reachability; intermediate bodies do not stop the walk.
    pub fn bodies_below(
        &self,
        skeleton: &dyn SkeletonView,
        bone_name: &str,
        include_self: bool,
    ) -> Vec<usize> {
        let Some(base) = skeleton.find_bone_index(bone_name) else {
            return Vec::new();
        };
        self.bodies
            .iter()
            .enumerate()
            .filter_map(|(i, body)| {
                let bone = skeleton.find_bone_index(&body.bone_name)?;
                let below = if bone == base {
                    include_self
                } else {
                    skeleton.is_descendant_of(bone, base)
                };
                below.then_some(i)
            })
            .collect()
    }

    /// The topmost body in every chain hanging below `bone_name` (self excluded).
    ///
    /// A body qualifies when no bone strictly between it and `bone_name` has a body.
    pub fn nearest_bodies_below(&self, skeleton: &dyn SkeletonView, bone_name: &str) -> Vec<usize> {
        let Some(base) = skeleton.find_bone_index(bone_name) else {
            return Vec::new();
        };
        self.bodies_below(skeleton, bone_name, false)
            .into_iter()
            .filter(|&i| {
                let Some(bone) = skeleton.find_bone_index(&self.bodies[i].bone_name) else {
                    return false;
                };
                let mut cursor = skeleton.parent_index(bone);
                while let Some(between) = cursor {
                    if between == base {
                        return true;
                    }
                    if self.find_body_index(skeleton.bone_name(between)).is_some() {
                        return false;
                    }
                    cursor = skeleton.parent_index(between);
                }
                false
            })
            .collect()
    }

    /// The body on `bone` or on its closest ancestor that has one.
    pub fn controlling_body(&self, skeleton: &dyn SkeletonView, bone: usize) -> Option<usize> {
        let mut cursor = (bone < skeleton.bone_count()).then_some(bone);
        while let Some(b) = cursor {
            if let Some(index) = self.find_body_index(skeleton.bone_name(b)) {
                return Some(index);
            }
            cursor = skeleton.parent_index(b);
        }
        None
    }

    /// The controlling body of `bone`'s parent bone.
    pub fn parent_body(&self, skeleton: &dyn SkeletonView, bone: usize) -> Option<usize> {
        skeleton
            .parent_index(bone)
            .and_then(|parent| self.controlling_body(skeleton, parent))
    }

    /// Indices of bodies that contribute to the owner's bounds.
    pub fn bounds_bodies(&self) -> Vec<usize> {
        self.bodies
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.consider_for_bounds.then_some(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{skeleton::RefSkeleton, types::Vec3};

    // pelvis
    // └─ spine_01
    //    └─ spine_02
    //       ├─ clavicle_l ── upperarm_l
    //       └─ clavicle_r ── upperarm_r
    fn torso() -> RefSkeleton {
        RefSkeleton::new()
            .with_bone("pelvis", None, Vec3::zeros())
            .and_then(|s| s.with_bone("spine_01", Some("pelvis"), Vec3::new(0.0, 0.0, 10.0)))
            .and_then(|s| s.with_bone("spine_02", Some("spine_01"), Vec3::new(0.0, 0.0, 10.0)))
            .and_then(|s| s.with_bone("clavicle_l", Some("spine_02"), Vec3::new(5.0, 0.0, 5.0)))
            .and_then(|s| s.with_bone("upperarm_l", Some("clavicle_l"), Vec3::new(10.0, 0.0, 0.0)))
            .and_then(|s| s.with_bone("clavicle_r", Some("spine_02"), Vec3::new(-5.0, 0.0, 5.0)))
            .and_then(|s| s.with_bone("upperarm_r", Some("clavicle_r"), Vec3::new(-10.0, 0.0, 0.0)))
            .unwrap()
    }

    fn graph(names: &[&str]) -> BodyGraph {
        let mut g = BodyGraph::new();
        for name in names {
            g.create_body(name);
        }
        g
    }

    #[test]
    fn create_is_idempotent_per_bone() {
        let mut g = BodyGraph::new();
        let a = g.create_body("pelvis");
        let b = g.create_body("spine_01");
        assert_eq!(g.create_body("pelvis"), a);
        assert_eq!(g.len(), 2);
        assert_eq!(g.find_body_index("spine_01"), Some(b));
        assert!(g.find_body_index("head").is_none());
    }

    #[test]
    fn destroy_shifts_later_indices_and_refreshes_lookup() {
        let mut g = graph(&["pelvis", "spine_01", "spine_02"]);
        assert_eq!(g.find_body_index("spine_02"), Some(2));

        let removed = g.destroy_body(1).unwrap();
        assert_eq!(removed.bone_name(), "spine_01");
        assert_eq!(g.find_body_index("spine_02"), Some(1));
        assert!(g.find_body_index("spine_01").is_none());

        assert_eq!(
            g.destroy_body(5),
            Err(AssetError::InvalidBodyIndex { index: 5, count: 2 })
        );
    }

    #[test]
    fn settings_edits_keep_the_bone() {
        let mut g = graph(&["pelvis", "spine_01"]);
        assert_eq!(g.find_body_index("pelvis"), Some(0));
        let body = g.get_mut(0).unwrap();
        body.physics_type = PhysicsType::Simulated;
        body.geom = AggregateGeom::unit_box(2.0);
        assert_eq!(g.get(0).unwrap().bone_name(), "pelvis");
        assert_eq!(g.find_body_index("pelvis"), Some(0));
        assert_eq!(g.find_body_index("spine_01"), Some(1));
    }

    #[test]
    fn bodies_below_walks_the_hierarchy() {
        let skel = torso();
        let g = graph(&["pelvis", "spine_02", "upperarm_l", "clavicle_r"]);
        assert_eq!(g.bodies_below(&skel, "spine_01", false), vec![1, 2, 3]);
        assert_eq!(g.bodies_below(&skel, "spine_02", true), vec![1, 2, 3]);
        assert_eq!(g.bodies_below(&skel, "spine_02", false), vec![2, 3]);
        assert!(g.bodies_below(&skel, "missing", true).is_empty());
    }

    #[test]
    fn nearest_bodies_stop_at_first_body_in_each_chain() {
        let skel = torso();
        let g = graph(&["pelvis", "spine_02", "upperarm_l", "clavicle_r", "upperarm_r"]);
        assert_eq!(g.nearest_bodies_below(&skel, "pelvis"), vec![1]);
        // upperarm_l is reached through clavicle_l, which has no body.
        assert_eq!(g.nearest_bodies_below(&skel, "spine_02"), vec![2, 3]);
        assert!(g.nearest_bodies_below(&skel, "upperarm_r").is_empty());
    }

    #[test]
    fn controlling_and_parent_body() {
        let skel = torso();
        let g = graph(&["pelvis", "spine_02"]);
        let clav = skel.find_bone_index("clavicle_l").unwrap();
        let spine2 = skel.find_bone_index("spine_02").unwrap();
        let spine1 = skel.find_bone_index("spine_01").unwrap();

        assert_eq!(g.controlling_body(&skel, clav), Some(1));
        assert_eq!(g.controlling_body(&skel, spine2), Some(1));
        assert_eq!(g.parent_body(&skel, spine2), Some(0));
        assert_eq!(g.controlling_body(&skel, spine1), Some(0));
        assert_eq!(g.parent_body(&skel, 0), None);
        assert_eq!(g.controlling_body(&skel, 99), None);
    }

    #[test]
    fn bounds_bodies_skip_opted_out() {
        let mut g = graph(&["pelvis", "spine_01", "spine_02"]);
        g.get_mut(1).unwrap().consider_for_bounds = false;
        assert_eq!(g.bounds_bodies(), vec![0, 2]);
    }

    #[test]
    fn merged_settings_follow_enum_order() {
        assert_eq!(PhysicsType::Kinematic.max(PhysicsType::Simulated), PhysicsType::Simulated);
        assert_eq!(PhysicsType::Default.max(PhysicsType::Kinematic), PhysicsType::Kinematic);
        assert_eq!(
            CollisionEnabled::QueryAndPhysics.min(CollisionEnabled::QueryOnly),
            CollisionEnabled::QueryOnly
        );
    }

    #[test]
    fn copy_properties_keeps_bone_name() {
        let mut src = Body::new("hand_l");
        src.physics_type = PhysicsType::Kinematic;
        src.phys_material = Some("flesh".into());
        src.geom = AggregateGeom::unit_box(4.0);
        let mut dst = Body::new("hand_r");
        dst.copy_properties_from(&src);
        assert_eq!(dst.bone_name(), "hand_r");
        assert_eq!(dst.geom, src.geom);
        assert_eq!(dst.phys_material.as_deref(), Some("flesh"));
    }
}
