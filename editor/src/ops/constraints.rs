use ragdoll_shared::{AngularAxis, AssetError, ConstraintPreset, SkeletonView};

use crate::editor::GraphEditor;

impl<S: SkeletonView> GraphEditor<S> {
    /// Moves the limited angular axis of each joint to the next one.
    pub fn cycle_constraint_active(&mut self, indices: &[usize]) -> Result<(), AssetError> {
        self.check_constraints(indices)?;
        for &i in indices {
            self.asset.constraint_at_mut(i)?.profile.cycle_active_angular();
        }
        Ok(())
    }

    pub fn toggle_constraint_axis(&mut self, indices: &[usize], axis: AngularAxis) -> Result<(), AssetError> {
        self.check_constraints(indices)?;
        for &i in indices {
            self.asset.constraint_at_mut(i)?.profile.toggle_angular(axis);
        }
        Ok(())
    }

    pub fn apply_constraint_preset(
        &mut self,
        indices: &[usize],
        preset: ConstraintPreset,
        overwrite_limits: bool,
    ) -> Result<(), AssetError> {
        self.check_constraints(indices)?;
        for &i in indices {
            self.asset
                .constraint_at_mut(i)?
                .profile
                .apply_preset(preset, overwrite_limits);
        }
        Ok(())
    }
}
