/*!
Primitive fitting: turn a bone's vertex cloud into a collision primitive.

Pipeline for one bone:
1. Choose an orientation frame. With `align_down_bone` the local +Z axis points at
   the bone's only child, or along the dominant principal axis of the vertex cloud
   when there is no single child. Without it the frame is the bone frame itself.
2. Project the vertices into that frame and take their bounding box.
3. Clamp each half-extent to `min_prim_size`, then size the requested primitive
   from the box, inflated by [`SHAPE_INFLATION`].

Fitting is a pure function of its inputs: the same vertices, offset, kind and
options always produce bit-identical output.
*/

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        DEFAULT_HULL_ACCURACY, DEFAULT_MAX_HULL_VERTS, DEFAULT_MIN_PRIM_SIZE, DEGENERATE_OFFSET,
        POWER_ITERATIONS, SHAPE_INFLATION,
    },
    decompose::{ConvexDecomposer, hull_points},
    error::AssetError,
    shapes::{AggregateGeom, BoxElem, CapsuleElem, ConvexElem, SphereElem},
    skeleton::{BoneVertInfo, SkeletonView},
    types::{Mat3, Quat, Vec3},
};

/// Primitive requested from the fitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeomKind {
    Box,
    Sphere,
    #[default]
    Capsule,
    SingleConvexHull,
    MultiConvexHull,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Lower bound on every fitted half-extent.
    pub min_prim_size: f32,
    pub align_down_bone: bool,
    /// Decomposition accuracy for [`GeomKind::MultiConvexHull`], in `[0, 1]`.
    pub hull_accuracy: f32,
    /// Vertex budget per decomposed hull.
    pub max_hull_verts: u32,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            min_prim_size: DEFAULT_MIN_PRIM_SIZE,
            align_down_bone: true,
            hull_accuracy: DEFAULT_HULL_ACCURACY,
            max_hull_verts: DEFAULT_MAX_HULL_VERTS,
        }
    }
}

/// Input bundle for [`fit_primitive`].
#[derive(Clone, Copy, Debug)]
pub struct FitRequest<'a> {
    /// Used for error reporting only.
    pub bone_name: &'a str,
    pub verts: &'a BoneVertInfo,
    /// Bone-space offset of the bone's only child, if it has exactly one.
    pub child_offset: Option<Vec3>,
    pub kind: GeomKind,
    pub opts: FitOptions,
}

/// Fits one primitive to a bone's vertices, in bone space.
///
/// Errors
/// - [`AssetError::NoVertices`] when `verts` is empty, for every kind.
/// - [`AssetError::UnsupportedVertexInfluence`] for multi-hull on soft-skinned vertices.
/// - [`AssetError::DecompositionFailed`] when the decomposer fails or returns nothing.
pub fn fit_primitive(
    req: &FitRequest<'_>,
    decomposer: &dyn ConvexDecomposer,
) -> Result<AggregateGeom, AssetError> {
    let positions = &req.verts.positions;
    if positions.is_empty() {
        return Err(AssetError::NoVertices {
            bone: req.bone_name.to_string(),
        });
    }

    let mut geom = AggregateGeom::default();
    match req.kind {
        GeomKind::Box | GeomKind::Sphere | GeomKind::Capsule => {
            let rotation = fit_frame(positions, req.child_offset, req.opts.align_down_bone);
            let (center, half) = oriented_extents(positions, &rotation, req.opts.min_prim_size);
            match req.kind {
                GeomKind::Box => geom.boxes.push(BoxElem {
                    center,
                    rotation,
                    half_extents: half * SHAPE_INFLATION,
                }),
                GeomKind::Sphere => geom.spheres.push(SphereElem {
                    center,
                    radius: half.max() * SHAPE_INFLATION,
                }),
                _ => geom.capsules.push(CapsuleElem {
                    center,
                    rotation,
                    radius: half.x.max(half.y) * SHAPE_INFLATION,
                    length: 2.0 * half.z * SHAPE_INFLATION,
                }),
            }
        }
        GeomKind::SingleConvexHull => {
            geom.convex_hulls.push(ConvexElem::new(hull_points(positions)));
        }
        GeomKind::MultiConvexHull => {
            if req.verts.has_soft_vertices() {
                return Err(AssetError::UnsupportedVertexInfluence {
                    bone: req.bone_name.to_string(),
                });
            }
            let hulls = decomposer.decompose(
                positions,
                &req.verts.triangles,
                req.opts.hull_accuracy,
                req.opts.max_hull_verts,
            )?;
            if hulls.is_empty() {
                return Err(AssetError::DecompositionFailed {
                    reason: format!("no hulls for bone `{}`", req.bone_name),
                });
            }
            geom.convex_hulls = hulls;
        }
    }
    Ok(geom)
}

/// Orientation of the fitted primitive in bone space.
pub fn fit_frame(positions: &[Vec3], child_offset: Option<Vec3>, align_down_bone: bool) -> Quat {
    if !align_down_bone {
        return Quat::identity();
    }
    let z_axis = match child_offset.filter(|o| o.norm() > DEGENERATE_OFFSET) {
        Some(offset) => offset.normalize(),
        None => dominant_eigenvector(&covariance_matrix(positions)),
    };
    let (x_axis, y_axis) = best_axis_vectors(&z_axis);
    let basis = Mat3::from_columns(&[x_axis, y_axis, z_axis]);
    Quat::from_rotation_matrix(&na::Rotation3::from_matrix_unchecked(basis))
}

/// Population covariance of the positions (mean-centered, divided by N).
pub fn covariance_matrix(positions: &[Vec3]) -> Mat3 {
    if positions.is_empty() {
        return Mat3::zeros();
    }
    let n = positions.len() as f32;
    let mean = positions.iter().fold(Vec3::zeros(), |acc, p| acc + p) / n;
    let mut cov = Mat3::zeros();
    for p in positions {
        let d = p - mean;
        cov += d * d.transpose();
    }
    cov / n
}

/// Power iteration from +Z for a fixed number of steps.
///
/// A step that maps the estimate to zero leaves it unchanged, so the result is
/// always unit length.
pub fn dominant_eigenvector(m: &Mat3) -> Vec3 {
    let mut estimate = Vec3::z();
    for _ in 0..POWER_ITERATIONS {
        let next = m * estimate;
        let len = next.norm();
        if len > 0.0 {
            estimate = next / len;
        }
    }
    estimate
}

/// Completes `z_axis` to an orthonormal right-handed basis `(x, y)`.
///
/// The seed axis is +X when `z_axis` is closest to the Z axis and +Z otherwise.
pub fn best_axis_vectors(z_axis: &Vec3) -> (Vec3, Vec3) {
    let (ax, ay, az) = (z_axis.x.abs(), z_axis.y.abs(), z_axis.z.abs());
    let seed = if az > ax && az > ay { Vec3::x() } else { Vec3::z() };
    let y_axis = (seed - z_axis * seed.dot(z_axis)).normalize();
    let x_axis = y_axis.cross(z_axis);
    (x_axis, y_axis)
}

/// Bounding box of `positions` in the frame `rotation`.
///
/// Returns the box center back in bone space and the clamped half-extents in the frame.
fn oriented_extents(positions: &[Vec3], rotation: &Quat, min_half: f32) -> (Vec3, Vec3) {
    let inv = rotation.inverse();
    let first = inv * positions[0];
    let (min, max) = positions[1..]
        .iter()
        .map(|p| inv * p)
        .fold((first, first), |(lo, hi), p| (lo.inf(&p), hi.sup(&p)));
    let center_local = (min + max) * 0.5;
    let half = ((max - min) * 0.5).map(|h| h.max(min_half));
    (rotation * center_local, half)
}

/// Size of a bone's vertex cloud: the length of its bone-space AABB half-extent.
/// Zero when the bone has no vertices.
pub fn bone_extent(verts: &BoneVertInfo) -> f32 {
    let mut iter = verts.positions.iter();
    let Some(first) = iter.next() else {
        return 0.0;
    };
    let (min, max) = iter.fold((*first, *first), |(lo, hi), p| (lo.inf(p), hi.sup(p)));
    ((max - min) * 0.5).norm()
}

/// Bone-space offset of the bone's child when it has exactly one.
pub fn unique_child_offset(skeleton: &dyn SkeletonView, bone: usize) -> Option<Vec3> {
    match skeleton.children(bone).as_slice() {
        [only] => Some(skeleton.bone_space_transform(*only).translation),
        _ => None,
    }
}
