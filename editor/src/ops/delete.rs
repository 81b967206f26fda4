//! Deleting bodies, shapes and constraints.
//!
//! Body deletion is planned against the graph as it is before anything is
//! removed, then applied in one pass. Children that hung off the deleted body
//! are re-jointed to its parent body, keeping their joint settings.

use ragdoll_shared::{AssetError, Constraint, ShapeRef, SkeletonView};

use crate::editor::GraphEditor;

impl<S: SkeletonView> GraphEditor<S> {
    /// Deletes a body and every constraint touching it, then re-joints each nearest
    /// body below it to its parent body.
    ///
    /// Each replacement joint is a copy of the child's original joint (limits, drives,
    /// breakability) with its parent end and frames re-targeted, and collision between
    /// the new pair disabled. Without a parent body, children are left unjointed.
    pub fn delete_body(&mut self, index: usize) -> Result<(), AssetError> {
        let bone_name = self.asset.body_at(index)?.bone_name().to_string();
        let touching = self.asset.constraints_touching(index);
        let reattach = self.plan_reattach(&bone_name, &touching);

        for &ci in touching.iter().rev() {
            self.asset.constraints_mut().destroy_constraint(ci)?;
        }
        self.asset.bodies_mut().destroy_body(index)?;
        self.asset.collision_mut().remap_on_delete(index);

        for template in &reattach {
            self.asset.constraints_mut().create_constraint_from(template);
            let child = self.asset.bodies().find_body_index(&template.bone_a);
            let parent = self.asset.bodies().find_body_index(&template.bone_b);
            if let (Some(child), Some(parent)) = (child, parent) {
                self.asset.collision_mut().disable(child, parent);
            }
        }

        log::info!(
            "deleted body `{bone_name}` ({} joints removed, {} re-attached)",
            touching.len(),
            reattach.len()
        );
        Ok(())
    }

    /// Replacement joints for the children of the body on `bone_name`.
    fn plan_reattach(&self, bone_name: &str, touching: &[usize]) -> Vec<Constraint> {
        let Some(bone) = self.skeleton.find_bone_index(bone_name) else {
            return Vec::new();
        };
        let Some(parent_name) = self
            .asset
            .bodies()
            .parent_body(&self.skeleton, bone)
            .and_then(|i| self.body_name(i))
        else {
            return Vec::new();
        };
        let nearest: Vec<String> = self
            .asset
            .bodies()
            .nearest_bodies_below(&self.skeleton, bone_name)
            .into_iter()
            .filter_map(|i| self.body_name(i))
            .collect();

        touching
            .iter()
            .filter_map(|&ci| self.asset.constraints().get(ci))
            .filter(|c| c.bone_b == bone_name && nearest.contains(&c.bone_a))
            .map(|c| {
                let mut template = c.clone();
                template.bone_b = parent_name.clone();
                if let Some((frame_a, frame_b)) = self.joint_frames(&c.bone_a, &parent_name) {
                    template.frame_a = frame_a;
                    template.frame_b = frame_b;
                }
                template
            })
            .collect()
    }

    /// Removes one shape from a body. A body left without shapes is deleted.
    pub fn delete_shape(&mut self, body: usize, shape: ShapeRef) -> Result<(), AssetError> {
        let b = self.asset.body_at(body)?;
        if shape.index >= b.geom.element_count_of(shape.kind) {
            return Err(AssetError::InvalidShapeIndex {
                body,
                index: shape.index,
            });
        }
        let now_empty = {
            let b = self.asset.body_at_mut(body)?;
            b.geom.remove(shape);
            b.geom.is_empty()
        };
        if now_empty {
            log::debug!("body {body} lost its last shape");
            self.delete_body(body)?;
        }
        Ok(())
    }

    pub fn delete_constraint(&mut self, index: usize) -> Result<(), AssetError> {
        self.asset.constraints_mut().destroy_constraint(index).map(|_| ())
    }

    /// Deletes several constraints, highest index first. Duplicates are ignored.
    pub fn delete_constraints(&mut self, indices: &[usize]) -> Result<(), AssetError> {
        self.check_constraints(indices)?;
        let mut sorted = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();
        for index in sorted {
            self.asset.constraints_mut().destroy_constraint(index)?;
        }
        Ok(())
    }
}
