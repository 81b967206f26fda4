//! The editing session: a physics asset bound to the skeleton it was built for.
//!
//! [`GraphEditor`] is the only thing that mutates a [`PhysicsAsset`] through
//! multi-step edits. The operations themselves live in `crate::ops`, one file per
//! concern, each adding an `impl` block to this type.

use ragdoll_shared::{
    AssetError, Body, BoneVertTable, Constraint, ConvexDecomposer, PhysicsAsset, SkeletonView,
    Transform, VhacdDecomposer,
};

use crate::{naming::MirrorNaming, settings::CreateParams};

/// One item of an editor selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Selection {
    Body(usize),
    Constraint(usize),
}

pub struct GraphEditor<S: SkeletonView> {
    pub(crate) asset: PhysicsAsset,
    pub(crate) skeleton: S,
    pub(crate) vert_infos: BoneVertTable,
    pub(crate) decomposer: Box<dyn ConvexDecomposer>,
    pub params: CreateParams,
    pub mirror_naming: MirrorNaming,
    pub(crate) copied_body: Option<Body>,
    pub(crate) copied_constraint: Option<Constraint>,
}

impl<S: SkeletonView> GraphEditor<S> {
    /// Starts a session on an empty asset.
    pub fn new(skeleton: S, vert_infos: BoneVertTable) -> Self {
        Self::with_asset(PhysicsAsset::new(), skeleton, vert_infos)
    }

    /// Starts a session on an existing asset.
    pub fn with_asset(asset: PhysicsAsset, skeleton: S, vert_infos: BoneVertTable) -> Self {
        Self {
            asset,
            skeleton,
            vert_infos,
            decomposer: Box::new(VhacdDecomposer::default()),
            params: CreateParams::default(),
            mirror_naming: MirrorNaming::default(),
            copied_body: None,
            copied_constraint: None,
        }
    }

    pub fn with_params(mut self, params: CreateParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_decomposer(mut self, decomposer: Box<dyn ConvexDecomposer>) -> Self {
        self.decomposer = decomposer;
        self
    }

    pub fn asset(&self) -> &PhysicsAsset {
        &self.asset
    }

    pub fn into_asset(self) -> PhysicsAsset {
        self.asset
    }

    pub fn skeleton(&self) -> &S {
        &self.skeleton
    }

    pub fn vert_infos(&self) -> &BoneVertTable {
        &self.vert_infos
    }

    pub fn copied_body(&self) -> Option<&Body> {
        self.copied_body.as_ref()
    }

    pub fn copied_constraint(&self) -> Option<&Constraint> {
        self.copied_constraint.as_ref()
    }

    /// Skeleton index of the bone a body is attached to.
    pub(crate) fn bone_of_body(&self, body: usize) -> Result<usize, AssetError> {
        let name = self.asset.body_at(body)?.bone_name();
        self.skeleton
            .find_bone_index(name)
            .ok_or_else(|| AssetError::UnknownBone { name: name.to_string() })
    }

    pub(crate) fn body_name(&self, body: usize) -> Option<String> {
        self.asset.bodies().get(body).map(|b| b.bone_name().to_string())
    }

    /// Reference-pose joint frames for a child/parent bone pair: identity on the child,
    /// the child's pose in parent space on the parent.
    pub(crate) fn joint_frames(&self, child_bone: &str, parent_bone: &str) -> Option<(Transform, Transform)> {
        let child = self.skeleton.find_bone_index(child_bone)?;
        let parent = self.skeleton.find_bone_index(parent_bone)?;
        let child_tm = self.skeleton.component_space_transform(child);
        let parent_tm = self.skeleton.component_space_transform(parent);
        Some((Transform::identity(), child_tm.relative_to(&parent_tm)))
    }

    /// Points a constraint at a child/parent pair and resets its frames to the reference pose.
    pub(crate) fn init_constraint(&mut self, index: usize, child_bone: &str, parent_bone: &str) {
        let frames = self.joint_frames(child_bone, parent_bone);
        let Some(c) = self.asset.constraints_mut().get_mut(index) else {
            return;
        };
        c.bone_a = child_bone.to_string();
        c.bone_b = parent_bone.to_string();
        if let Some((frame_a, frame_b)) = frames {
            c.frame_a = frame_a;
            c.frame_b = frame_b;
        }
    }

    pub(crate) fn check_bodies(&self, indices: &[usize]) -> Result<(), AssetError> {
        for &i in indices {
            self.asset.body_at(i)?;
        }
        Ok(())
    }

    pub(crate) fn check_constraints(&self, indices: &[usize]) -> Result<(), AssetError> {
        for &i in indices {
            self.asset.constraint_at(i)?;
        }
        Ok(())
    }

    /// Structural invariants plus the hierarchy rule: every constraint's parent end
    /// is the body controlling the nearest ancestor of its child bone.
    pub fn validate(&self) -> Result<(), AssetError> {
        self.asset.check_consistency()?;
        for c in self.asset.constraints().constraints() {
            let Some(child) = self.skeleton.find_bone_index(&c.bone_a) else {
                continue;
            };
            let expected = self
                .asset
                .bodies()
                .parent_body(&self.skeleton, child)
                .and_then(|i| self.asset.bodies().get(i));
            match expected {
                Some(parent) if parent.bone_name() == c.bone_b => {}
                _ => {
                    return Err(AssetError::Inconsistent {
                        reason: format!(
                            "joint `{}` attaches `{}` to `{}`, not to its nearest ancestor body",
                            c.joint_name, c.bone_a, c.bone_b
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}
