//! Single-bone body creation.
//!
//! Used directly for "add body to bone" and by skeleton import. The new body
//! slots into the existing graph: descendant bodies that were jointed to
//! something above the new bone are re-jointed to it.

use ragdoll_shared::{
    AggregateGeom, AssetError, BoneVertInfo, FitRequest, SkeletonView, fit_primitive,
    unique_child_offset,
};

use crate::editor::GraphEditor;

impl<S: SkeletonView> GraphEditor<S> {
    /// Creates a fitted body on `bone`, or returns the existing body's index.
    ///
    /// Fitting runs before anything is touched, so a fit error leaves the asset as it was.
    pub fn make_body(&mut self, bone: usize) -> Result<usize, AssetError> {
        if bone >= self.skeleton.bone_count() {
            return Err(AssetError::UnknownBone {
                name: format!("#{bone}"),
            });
        }
        if let Some(existing) = self.asset.bodies().find_body_index(self.skeleton.bone_name(bone)) {
            return Ok(existing);
        }
        let geom = self.fit_bone(bone)?;
        Ok(self.insert_body_with_geom(bone, geom))
    }

    /// Fits the configured primitive to a bone's vertices.
    pub(crate) fn fit_bone(&self, bone: usize) -> Result<AggregateGeom, AssetError> {
        let none = BoneVertInfo::default();
        let verts = self
            .vert_infos
            .get(self.params.vert_weighting, bone)
            .unwrap_or(&none);
        let req = FitRequest {
            bone_name: self.skeleton.bone_name(bone),
            verts,
            child_offset: unique_child_offset(&self.skeleton, bone),
            kind: self.params.geom_kind,
            opts: self.params.fit_options(),
        };
        fit_primitive(&req, self.decomposer.as_ref())
    }

    /// Creates the body with the given geometry and wires it into the graph.
    ///
    /// 1. Descendant bodies directly below the new bone get a joint to it. A joint they
    ///    already had to a body above the new bone is re-pointed, and collision with that
    ///    old parent is re-enabled.
    /// 2. With `create_joints`, the new body is jointed to its parent body (joint named
    ///    after the bone) and collision between the two is disabled.
    pub(crate) fn insert_body_with_geom(&mut self, bone: usize, geom: AggregateGeom) -> usize {
        let name = self.skeleton.bone_name(bone).to_string();
        let index = self.asset.bodies_mut().create_body(&name);
        if let Some(body) = self.asset.bodies_mut().get_mut(index) {
            body.geom = geom;
        }

        self.adopt_bodies_below(bone, index);

        if self.params.create_joints {
            if let Some(parent) = self.asset.bodies().parent_body(&self.skeleton, bone) {
                if let Some(parent_name) = self.body_name(parent) {
                    self.joint_to_parent(&name, &parent_name);
                    self.asset.collision_mut().disable(index, parent);
                }
            }
        }
        log::debug!("created body {index} on bone `{name}`");
        index
    }

    fn adopt_bodies_below(&mut self, bone: usize, index: usize) {
        let name = self.skeleton.bone_name(bone).to_string();
        let children = self.asset.bodies().nearest_bodies_below(&self.skeleton, &name);

        for child in children {
            let Some(child_name) = self.body_name(child) else {
                continue;
            };
            match self.asset.constraints().find_constraint_index(&child_name) {
                None => self.joint_to_parent(&child_name, &name),
                Some(ci) => {
                    let Some(old_parent) = self.asset.constraints().get(ci).map(|c| c.bone_b.clone()) else {
                        continue;
                    };
                    let old_parent_bone = self.skeleton.find_bone_index(&old_parent);
                    if old_parent_bone.is_some_and(|p| self.skeleton.is_descendant_of(p, bone)) {
                        continue;
                    }
                    if let Some(old) = self.asset.bodies().find_body_index(&old_parent) {
                        self.asset.collision_mut().enable(old, child);
                    }
                    self.init_constraint(ci, &child_name, &name);
                }
            }
            self.asset.collision_mut().disable(child, index);
        }
    }

    /// Creates (or re-points) the joint named after `child` onto `parent`, with fresh
    /// frames and the configured angular motion.
    fn joint_to_parent(&mut self, child: &str, parent: &str) {
        let ci = self.asset.constraints_mut().create_constraint(child, child, parent);
        self.init_constraint(ci, child, parent);
        let motion = self.params.angular_motion;
        if let Some(c) = self.asset.constraints_mut().get_mut(ci) {
            c.profile.set_angular_motions(motion);
        }
    }
}
