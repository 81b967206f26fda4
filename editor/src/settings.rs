//! Parameters for creating bodies and joints from a skeleton.

use ragdoll_shared::{
    DEFAULT_HULL_ACCURACY, DEFAULT_MAX_HULL_VERTS, DEFAULT_MIN_BONE_SIZE, DEFAULT_MIN_PRIM_SIZE,
    FitOptions, GeomKind, Motion, VertexWeighting,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateParams {
    /// Bones smaller than this (see `ragdoll_shared::bone_extent`) get no body on import.
    pub min_bone_size: f32,
    pub geom_kind: GeomKind,
    pub vert_weighting: VertexWeighting,
    /// Orient primitives down the bone toward its only child.
    pub align_down_bone: bool,
    pub create_joints: bool,
    /// Give small bones a body when something below them is big enough.
    pub walk_past_small: bool,
    /// Give every bone with vertices a body, whatever its size.
    pub body_for_all: bool,
    /// Applied to all three angular axes of newly created joints.
    pub angular_motion: Motion,
    pub hull_accuracy: f32,
    pub max_hull_verts: u32,
    pub min_prim_size: f32,
}

impl Default for CreateParams {
    fn default() -> Self {
        Self {
            min_bone_size: DEFAULT_MIN_BONE_SIZE,
            geom_kind: GeomKind::Capsule,
            vert_weighting: VertexWeighting::DominantWeight,
            align_down_bone: true,
            create_joints: true,
            walk_past_small: true,
            body_for_all: false,
            angular_motion: Motion::Limited,
            hull_accuracy: DEFAULT_HULL_ACCURACY,
            max_hull_verts: DEFAULT_MAX_HULL_VERTS,
            min_prim_size: DEFAULT_MIN_PRIM_SIZE,
        }
    }
}

impl CreateParams {
    #[inline]
    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            min_prim_size: self.min_prim_size,
            align_down_bone: self.align_down_bone,
            hull_accuracy: self.hull_accuracy,
            max_hull_verts: self.max_hull_verts,
        }
    }
}
