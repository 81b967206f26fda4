use ragdoll_shared::{AssetError, CollisionEnabled, SkeletonView};

use crate::editor::GraphEditor;

impl<S: SkeletonView> GraphEditor<S> {
    pub fn set_collision_between(&mut self, i: usize, j: usize, enabled: bool) -> Result<(), AssetError> {
        self.check_bodies(&[i, j])?;
        if enabled {
            self.asset.collision_mut().enable(i, j);
        } else {
            self.asset.collision_mut().disable(i, j);
        }
        Ok(())
    }

    /// Enables or disables collision between every pair of the given bodies.
    pub fn set_collision_between_selected(&mut self, bodies: &[usize], enabled: bool) -> Result<(), AssetError> {
        self.check_bodies(bodies)?;
        for (n, &i) in bodies.iter().enumerate() {
            for &j in &bodies[n + 1..] {
                if enabled {
                    self.asset.collision_mut().enable(i, j);
                } else {
                    self.asset.collision_mut().disable(i, j);
                }
            }
        }
        Ok(())
    }

    /// Bodies that do not collide with `selected`: those with collision turned off
    /// entirely, plus those paired with it in the exclusion table.
    pub fn no_collision_bodies(&self, selected: usize) -> Result<Vec<usize>, AssetError> {
        self.asset.body_at(selected)?;
        Ok(self
            .asset
            .bodies()
            .bodies()
            .iter()
            .enumerate()
            .filter(|&(i, body)| {
                i != selected
                    && (body.collision_enabled == CollisionEnabled::NoCollision
                        || self.asset.collision().is_disabled(selected, i))
            })
            .map(|(i, _)| i)
            .collect())
    }
}
