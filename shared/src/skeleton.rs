/*!
Read-only view of the skeleton a physics asset is built for.

The editor never mutates the skeleton. It consumes:
- the bone hierarchy (names, parent indices),
- the reference pose, as bone-space transforms relative to the parent bone,
- per-bone vertex lists, classified by dominant weight or by any weight.

[`RefSkeleton`] and [`BoneVertTable`] are simple owned implementations used by
tests and by callers that assemble skeleton data themselves.

# Ordering
Implementations must list parents before children (`parent_index(i) < i`), which
is what imported reference skeletons guarantee. Algorithms that need a
root-to-leaf walk still order bones by [`SkeletonView::depth`] so they do not rely
on this beyond the walk itself.
*/

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::AssetError,
    types::{Transform, Vec3},
};

pub trait SkeletonView {
    fn bone_count(&self) -> usize;

    fn bone_name(&self, index: usize) -> &str;

    fn parent_index(&self, index: usize) -> Option<usize>;

    fn find_bone_index(&self, name: &str) -> Option<usize>;

    /// Reference-pose transform of the bone relative to its parent bone.
    fn bone_space_transform(&self, index: usize) -> Transform;

    /// True if `ancestor` is a strict ancestor of `index`.
    fn is_descendant_of(&self, index: usize, ancestor: usize) -> bool {
        let mut cursor = self.parent_index(index);
        while let Some(bone) = cursor {
            if bone == ancestor {
                return true;
            }
            cursor = self.parent_index(bone);
        }
        false
    }

    /// Reference-pose transform of the bone in component (skeleton root) space.
    fn component_space_transform(&self, index: usize) -> Transform {
        let mut tm = self.bone_space_transform(index);
        let mut cursor = self.parent_index(index);
        while let Some(bone) = cursor {
            tm = tm.then(&self.bone_space_transform(bone));
            cursor = self.parent_index(bone);
        }
        tm
    }

    /// Direct children of a bone, in bone order.
    fn children(&self, index: usize) -> Vec<usize> {
        (0..self.bone_count())
            .filter(|&i| self.parent_index(i) == Some(index))
            .collect()
    }

    /// Number of ancestors above the bone (0 for a root).
    fn depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut cursor = self.parent_index(index);
        while let Some(bone) = cursor {
            depth += 1;
            cursor = self.parent_index(bone);
        }
        depth
    }
}

impl<T: SkeletonView + ?Sized> SkeletonView for &T {
    fn bone_count(&self) -> usize {
        (**self).bone_count()
    }

    fn bone_name(&self, index: usize) -> &str {
        (**self).bone_name(index)
    }

    fn parent_index(&self, index: usize) -> Option<usize> {
        (**self).parent_index(index)
    }

    fn find_bone_index(&self, name: &str) -> Option<usize> {
        (**self).find_bone_index(name)
    }

    fn bone_space_transform(&self, index: usize) -> Transform {
        (**self).bone_space_transform(index)
    }
}

/// Bones ordered root-to-leaf (stable by depth, then by index).
pub fn root_to_leaf_order(skeleton: &dyn SkeletonView) -> Vec<usize> {
    let mut order: Vec<usize> = (0..skeleton.bone_count()).collect();
    order.sort_by_key(|&i| (skeleton.depth(i), i));
    order
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    pub parent: Option<usize>,
    /// Reference pose relative to the parent bone.
    pub local: Transform,
}

/// Owned reference skeleton.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RefSkeleton {
    bones: Vec<Bone>,
    #[serde(skip)]
    name_to_index: HashMap<String, usize>,
}

impl RefSkeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a bone. Parents must already exist and names must be unique.
    pub fn add_bone(
        &mut self,
        name: impl Into<String>,
        parent: Option<usize>,
        local: Transform,
    ) -> Result<usize, AssetError> {
        let name = name.into();
        if let Some(p) = parent {
            if p >= self.bones.len() {
                return Err(AssetError::UnknownBone {
                    name: format!("#{p}"),
                });
            }
        }
        if self.name_to_index.contains_key(&name) {
            return Err(AssetError::Inconsistent {
                reason: format!("duplicate bone name `{name}`"),
            });
        }

        let index = self.bones.len();
        self.name_to_index.insert(name.clone(), index);
        self.bones.push(Bone {
            name,
            parent,
            local,
        });
        Ok(index)
    }

    /// Builder-style variant of [`RefSkeleton::add_bone`] that places the bone at `offset`
    /// from its parent with no rotation.
    pub fn with_bone(mut self, name: &str, parent: Option<&str>, offset: Vec3) -> Result<Self, AssetError> {
        let parent = match parent {
            Some(p) => Some(self.find_bone_index(p).ok_or_else(|| AssetError::UnknownBone {
                name: p.to_string(),
            })?),
            None => None,
        };
        self.add_bone(name, parent, Transform::from_translation(offset))?;
        Ok(self)
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Rebuilds the name lookup, e.g. after deserialization.
    pub fn reindex(&mut self) {
        self.name_to_index = self
            .bones
            .iter()
            .enumerate()
            .map(|(i, b)| (b.name.clone(), i))
            .collect();
    }
}

impl SkeletonView for RefSkeleton {
    fn bone_count(&self) -> usize {
        self.bones.len()
    }

    fn bone_name(&self, index: usize) -> &str {
        &self.bones[index].name
    }

    fn parent_index(&self, index: usize) -> Option<usize> {
        self.bones.get(index).and_then(|b| b.parent)
    }

    fn find_bone_index(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    fn bone_space_transform(&self, index: usize) -> Transform {
        self.bones
            .get(index)
            .map(|b| b.local)
            .unwrap_or_default()
    }
}

/// Which skin weights count when assigning vertices to bones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VertexWeighting {
    /// A vertex belongs to the bone with its largest weight.
    #[default]
    DominantWeight,
    /// A vertex belongs to every bone with a non-zero weight.
    AnyWeight,
}

/// Vertices influenced by one bone, in that bone's space.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoneVertInfo {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Per-vertex flag: true if the vertex is weighted to more than one bone.
    pub soft: Vec<bool>,
    /// Triangles whose three vertices are rigidly bound to this bone (indices into `positions`).
    pub triangles: Vec<[u32; 3]>,
}

impl BoneVertInfo {
    /// Rigid vertices only, no normals or triangles.
    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        let soft = vec![false; positions.len()];
        Self {
            positions,
            soft,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn has_soft_vertices(&self) -> bool {
        self.soft.iter().any(|&s| s)
    }
}

/// Per-bone vertex lists for both weighting classifications, indexed by bone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoneVertTable {
    pub dominant_weight: Vec<BoneVertInfo>,
    pub any_weight: Vec<BoneVertInfo>,
}

impl BoneVertTable {
    /// Empty lists for `bone_count` bones.
    pub fn with_bone_count(bone_count: usize) -> Self {
        Self {
            dominant_weight: vec![BoneVertInfo::default(); bone_count],
            any_weight: vec![BoneVertInfo::default(); bone_count],
        }
    }

    /// Assigns the same vertex info to both classifications (rigid skin).
    pub fn set_rigid(&mut self, bone: usize, info: BoneVertInfo) {
        self.ensure_len(bone + 1);
        self.any_weight[bone] = info.clone();
        self.dominant_weight[bone] = info;
    }

    pub fn infos(&self, weighting: VertexWeighting) -> &[BoneVertInfo] {
        match weighting {
            VertexWeighting::DominantWeight => &self.dominant_weight,
            VertexWeighting::AnyWeight => &self.any_weight,
        }
    }

    /// Vertex info for a bone, if any was recorded.
    pub fn get(&self, weighting: VertexWeighting, bone: usize) -> Option<&BoneVertInfo> {
        self.infos(weighting).get(bone)
    }

    fn ensure_len(&mut self, len: usize) {
        if self.dominant_weight.len() < len {
            self.dominant_weight.resize(len, BoneVertInfo::default());
        }
        if self.any_weight.len() < len {
            self.any_weight.resize(len, BoneVertInfo::default());
        }
    }
}
