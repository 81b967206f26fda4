use ragdoll_shared::{AssetError, SkeletonView};

use crate::editor::GraphEditor;

impl<S: SkeletonView> GraphEditor<S> {
    /// Checks that `add` can be welded onto `base`: distinct valid bodies on known bones,
    /// one being the parent body of the other.
    pub fn can_weld(&self, base: usize, add: usize) -> Result<(), AssetError> {
        if base == add {
            return Err(AssetError::SameBody { index: base });
        }
        let base_bone = self.bone_of_body(base)?;
        let add_bone = self.bone_of_body(add)?;
        let bodies = self.asset.bodies();
        let adjacent = bodies.parent_body(&self.skeleton, add_bone) == Some(base)
            || bodies.parent_body(&self.skeleton, base_bone) == Some(add);
        if !adjacent {
            return Err(AssetError::NotAdjacent { base, add });
        }
        Ok(())
    }

    /// Merges two adjacent bodies and deletes the child one.
    ///
    /// The parent body always survives: when `base` is the child of `add`, the roles are
    /// swapped so the joints below both bodies keep pointing at an ancestor.
    ///
    /// - `add`'s shapes are re-expressed in `base`'s bone space and appended.
    /// - Physics type becomes the more simulated of the two, collision the more restrictive.
    /// - Exclusion pairs of `add` move to `base`.
    /// - The joint between the two is removed; `add`'s other joints are re-pointed to
    ///   `base` with their frames re-expressed.
    ///
    /// Returns the index of the merged body after `add` is removed.
    pub fn weld_bodies(&mut self, base: usize, add: usize) -> Result<usize, AssetError> {
        self.can_weld(base, add)?;
        let add_is_parent = self
            .asset
            .bodies()
            .parent_body(&self.skeleton, self.bone_of_body(base)?)
            == Some(add);
        let (base, add) = if add_is_parent { (add, base) } else { (base, add) };
        let base_bone = self.bone_of_body(base)?;
        let add_bone = self.bone_of_body(add)?;
        let base_name = self.skeleton.bone_name(base_bone).to_string();
        let add_name = self.skeleton.bone_name(add_bone).to_string();

        let rel = self
            .skeleton
            .component_space_transform(add_bone)
            .relative_to(&self.skeleton.component_space_transform(base_bone));
        let added = self.asset.body_at(add)?.clone();

        {
            let merged = self.asset.body_at_mut(base)?;
            merged.geom.append(added.geom.transformed(&rel));
            merged.physics_type = merged.physics_type.max(added.physics_type);
            merged.collision_enabled = merged.collision_enabled.min(added.collision_enabled);
        }
        self.asset.collision_mut().reassign(add, base);

        let touching = self.asset.constraints().constraints_touching(&add_name);
        for &ci in touching.iter().rev() {
            let joins_pair = self
                .asset
                .constraints()
                .get(ci)
                .and_then(|c| c.other_bone(&add_name))
                == Some(base_name.as_str());
            if joins_pair {
                self.asset.constraints_mut().destroy_constraint(ci)?;
                continue;
            }
            let Some(c) = self.asset.constraints_mut().get_mut(ci) else {
                continue;
            };
            if c.bone_a == add_name {
                c.bone_a = base_name.clone();
                c.frame_a = c.frame_a.then(&rel);
            } else {
                c.bone_b = base_name.clone();
                c.frame_b = c.frame_b.then(&rel);
            }
        }

        self.asset.bodies_mut().destroy_body(add)?;
        self.asset.collision_mut().remap_on_delete(add);

        log::info!("welded `{add_name}` into `{base_name}`");
        Ok(if add < base { base - 1 } else { base })
    }
}
