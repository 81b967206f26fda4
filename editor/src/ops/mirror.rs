//! Left/right mirroring of bodies and their joints.
//!
//! The mirror bone is found by swapping the side suffix of the bone name. Bones
//! without a side suffix, or whose counterpart is not in the skeleton, are skipped.
//! Shapes are carried across with a half turn about the bone's Z axis, which maps
//! a bone's local frame onto its mirror in the usual symmetric rig convention.

use std::{collections::HashSet, f32::consts::PI};

use ragdoll_shared::{AssetError, Body, Constraint, Quat, SkeletonView, Vec3};

use crate::editor::{GraphEditor, Selection};

struct MirrorPlan {
    source: Body,
    source_joint: Option<Constraint>,
    mirror_bone: usize,
}

/// Half turn about Z: the rotation applied to mirrored shapes.
pub fn mirror_rotation() -> Quat {
    Quat::from_axis_angle(&Vec3::z_axis(), PI)
}

impl<S: SkeletonView> GraphEditor<S> {
    /// Mirrors the selected bodies (a selected constraint stands for its child body).
    ///
    /// Every item is resolved against the asset as it is before any mirror body is
    /// created. Mirror bodies are created without fitting when missing, then receive
    /// the source body's properties with the mirror rotation applied to its shapes.
    /// The mirror body's joint receives the source joint's settings.
    ///
    /// Returns the indices of the mirror bodies, in selection order.
    pub fn mirror_selection(&mut self, selection: &[Selection]) -> Result<Vec<usize>, AssetError> {
        let plans = self.plan_mirror(selection)?;
        let q = mirror_rotation();

        let mut mirrored = Vec::with_capacity(plans.len());
        for plan in plans {
            let mirror_name = self.skeleton.bone_name(plan.mirror_bone).to_string();
            let geom = plan.source.geom.rotated(&q);
            let index = match self.asset.bodies().find_body_index(&mirror_name) {
                Some(existing) => existing,
                None => self.insert_body_with_geom(plan.mirror_bone, geom.clone()),
            };
            let body = self.asset.body_at_mut(index)?;
            body.copy_properties_from(&plan.source);
            body.geom = geom;

            if let Some(source_joint) = &plan.source_joint {
                if let Some(ci) = self.asset.constraints().find_constraint_index(&mirror_name) {
                    self.asset.constraint_at_mut(ci)?.copy_params_from(source_joint);
                }
            }
            log::debug!("mirrored `{}` onto `{mirror_name}`", plan.source.bone_name());
            mirrored.push(index);
        }
        Ok(mirrored)
    }

    fn plan_mirror(&self, selection: &[Selection]) -> Result<Vec<MirrorPlan>, AssetError> {
        let mut seen = HashSet::new();
        let mut plans = Vec::new();

        for item in selection {
            let bone_name = match *item {
                Selection::Body(i) => self.asset.body_at(i)?.bone_name().to_string(),
                Selection::Constraint(i) => self.asset.constraint_at(i)?.bone_a.clone(),
            };
            if !seen.insert(bone_name.clone()) {
                continue;
            }
            let Some(source) = self.asset.bodies().find_body_index(&bone_name) else {
                log::debug!("mirror: no body on `{bone_name}`");
                continue;
            };
            let Some(mirror_name) = self.mirror_naming.mirror_name(&bone_name) else {
                log::debug!("mirror: `{bone_name}` has no side suffix");
                continue;
            };
            let Some(mirror_bone) = self.skeleton.find_bone_index(&mirror_name) else {
                log::debug!("mirror: bone `{mirror_name}` not in skeleton");
                continue;
            };
            let source_joint = self
                .asset
                .constraints()
                .find_constraint_index(&bone_name)
                .and_then(|ci| self.asset.constraints().get(ci))
                .cloned();
            plans.push(MirrorPlan {
                source: self.asset.body_at(source)?.clone(),
                source_joint,
                mirror_bone,
            });
        }
        Ok(plans)
    }
}
