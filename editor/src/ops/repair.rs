//! Clean-up passes for assets that drifted out of sync with their skeleton.

use ragdoll_shared::{AggregateGeom, AssetError, DEFAULT_EMPTY_BOX_SIZE, SkeletonView};

use crate::editor::GraphEditor;

impl<S: SkeletonView> GraphEditor<S> {
    /// Deletes every body whose bone is missing from the skeleton. Returns how many went.
    pub fn remove_bodies_without_bones(&mut self) -> Result<usize, AssetError> {
        let mut removed = 0;
        for i in (0..self.asset.body_count()).rev() {
            let orphan = self
                .asset
                .bodies()
                .get(i)
                .is_some_and(|b| self.skeleton.find_bone_index(b.bone_name()).is_none());
            if orphan {
                log::warn!("removing body {i}: bone not in skeleton");
                self.delete_body(i)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Gives every shapeless body a default box. Returns how many were reset.
    pub fn reset_empty_bodies(&mut self) -> usize {
        let mut reset = 0;
        for i in 0..self.asset.body_count() {
            if let Ok(body) = self.asset.body_at_mut(i) {
                if body.geom.is_empty() {
                    body.geom = AggregateGeom::unit_box(DEFAULT_EMPTY_BOX_SIZE);
                    reset += 1;
                }
            }
        }
        reset
    }
}

#[cfg(test)]
mod tests {
    use crate::editor::GraphEditor;
    use ragdoll_shared::{AggregateGeom, BoneVertTable, RefSkeleton, Vec3};

    #[test]
    fn orphans_are_removed_and_empties_reset() {
        let skel = RefSkeleton::new()
            .with_bone("root", None, Vec3::zeros())
            .and_then(|s| s.with_bone("hand", Some("root"), Vec3::new(0.0, 0.0, 5.0)))
            .unwrap();
        let mut ed = GraphEditor::new(skel, BoneVertTable::default());
        ed.insert_body_with_geom(0, AggregateGeom::unit_box(1.0));
        ed.asset.bodies_mut().create_body("prop");
        ed.asset.bodies_mut().create_body("hand");
        ed.asset.collision_mut().disable(1, 2);

        assert_eq!(ed.remove_bodies_without_bones().unwrap(), 1);
        assert_eq!(ed.asset().body_count(), 2);
        assert!(ed.asset().collision().is_empty());

        assert_eq!(ed.reset_empty_bodies(), 1);
        let hand = ed.asset().body_at(1).unwrap();
        assert_eq!(hand.geom.boxes[0].half_extents, Vec3::repeat(7.5));
        assert!(ed.asset().check_consistency().is_ok());
    }
}
