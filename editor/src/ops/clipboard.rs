//! Copy/paste of body and joint settings between selections.

use ragdoll_shared::{AssetError, SkeletonView};

use crate::editor::GraphEditor;

impl<S: SkeletonView> GraphEditor<S> {
    pub fn copy_body(&mut self, index: usize) -> Result<(), AssetError> {
        self.copied_body = Some(self.asset.body_at(index)?.clone());
        Ok(())
    }

    /// Pastes the copied body's shapes and settings onto each target, keeping the
    /// targets' bones. The copied body itself is skipped. Returns the number of bodies
    /// changed (0 when nothing was copied).
    pub fn paste_body_properties(&mut self, targets: &[usize]) -> Result<usize, AssetError> {
        self.check_bodies(targets)?;
        let Some(source) = self.copied_body.clone() else {
            log::warn!("paste requested with no copied body");
            return Ok(0);
        };
        let mut changed = 0;
        for &i in targets {
            let body = self.asset.body_at_mut(i)?;
            if body.bone_name() == source.bone_name() {
                continue;
            }
            body.copy_properties_from(&source);
            changed += 1;
        }
        Ok(changed)
    }

    pub fn copy_constraint(&mut self, index: usize) -> Result<(), AssetError> {
        self.copied_constraint = Some(self.asset.constraint_at(index)?.clone());
        Ok(())
    }

    /// Pastes the copied joint's limits, drives and frame orientations onto each target.
    pub fn paste_constraint_properties(&mut self, targets: &[usize]) -> Result<usize, AssetError> {
        self.check_constraints(targets)?;
        let Some(source) = self.copied_constraint.clone() else {
            log::warn!("paste requested with no copied constraint");
            return Ok(0);
        };
        let mut changed = 0;
        for &i in targets {
            let c = self.asset.constraint_at_mut(i)?;
            if c.joint_name == source.joint_name {
                continue;
            }
            c.copy_params_from(&source);
            changed += 1;
        }
        Ok(changed)
    }
}
