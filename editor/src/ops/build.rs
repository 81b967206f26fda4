use ragdoll_shared::{AssetError, SkeletonView, bone_extent, root_to_leaf_order};

use crate::editor::GraphEditor;

impl<S: SkeletonView> GraphEditor<S> {
    /// Populates the asset from the skeleton: one fitted body per eligible bone, jointed
    /// to the nearest ancestor body.
    ///
    /// A bone is eligible when it is bigger than `min_bone_size`, or has vertices and
    /// `body_for_all` is set, or (with `walk_past_small`) a bone below it is eligible on
    /// those grounds. Bones are visited root to leaf; once the first body exists, bones
    /// outside its subtree are ignored.
    ///
    /// Bones whose fit fails for lack of usable vertices are skipped. Any other failure
    /// aborts the import and restores the asset as it was before the call.
    ///
    /// Returns the number of bodies created, or [`AssetError::EmptyAsset`] if none were.
    pub fn build_from_skeleton(&mut self) -> Result<usize, AssetError> {
        let bone_count = self.skeleton.bone_count();
        let infos = self.vert_infos.infos(self.params.vert_weighting);

        let big_enough: Vec<bool> = (0..bone_count)
            .map(|bone| {
                let Some(verts) = infos.get(bone) else {
                    return false;
                };
                (self.params.body_for_all && !verts.is_empty())
                    || bone_extent(verts) > self.params.min_bone_size
            })
            .collect();
        let eligible: Vec<bool> = (0..bone_count)
            .map(|bone| {
                big_enough[bone]
                    || (self.params.walk_past_small
                        && (0..bone_count)
                            .any(|d| big_enough[d] && self.skeleton.is_descendant_of(d, bone)))
            })
            .collect();

        let snapshot = self.asset.clone();
        let before = self.asset.body_count();
        let mut physics_root: Option<usize> = None;

        for bone in root_to_leaf_order(&self.skeleton) {
            if !eligible[bone] {
                continue;
            }
            if let Some(root) = physics_root {
                if bone != root && !self.skeleton.is_descendant_of(bone, root) {
                    continue;
                }
            }
            match self.make_body(bone) {
                Ok(_) => {
                    physics_root.get_or_insert(bone);
                }
                Err(
                    e @ (AssetError::NoVertices { .. } | AssetError::UnsupportedVertexInfluence { .. }),
                ) => {
                    log::info!("skipping bone `{}`: {e}", self.skeleton.bone_name(bone));
                }
                Err(e) => {
                    log::warn!("skeleton import aborted at bone `{}`: {e}", self.skeleton.bone_name(bone));
                    self.asset = snapshot;
                    return Err(e);
                }
            }
        }

        let created = self.asset.body_count() - before;
        if created == 0 {
            log::warn!("skeleton import created no bodies ({bone_count} bones)");
            return Err(AssetError::EmptyAsset);
        }
        log::info!(
            "skeleton import created {created} bodies and {} constraints",
            self.asset.constraint_count()
        );
        Ok(created)
    }
}
