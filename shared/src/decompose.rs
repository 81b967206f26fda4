//! Convex decomposition seam.
//!
//! Multi-hull fitting hands a bone's rigid triangles to a [`ConvexDecomposer`].
//! The default implementation runs parry's V-HACD (re-exported by rapier3d);
//! tests and callers with their own decomposer plug in through the trait.

use rapier3d::na::Point3;
use rapier3d::parry::transformation::{
    try_convex_hull,
    vhacd::{VHACD, VHACDParameters},
};

use crate::{error::AssetError, shapes::ConvexElem, types::Vec3};

pub trait ConvexDecomposer {
    /// Splits a triangle soup into convex hulls of at most `max_hull_verts` vertices each.
    ///
    /// `accuracy` is in `[0, 1]`; higher values produce tighter (and more) hulls.
    fn decompose(
        &self,
        vertices: &[Vec3],
        triangles: &[[u32; 3]],
        accuracy: f32,
        max_hull_verts: u32,
    ) -> Result<Vec<ConvexElem>, AssetError>;
}

/// V-HACD backed decomposer.
#[derive(Clone, Copy, Debug)]
pub struct VhacdDecomposer {
    /// Voxel grid resolution used by V-HACD.
    pub resolution: u32,
}

impl Default for VhacdDecomposer {
    fn default() -> Self {
        Self { resolution: 64 }
    }
}

impl VhacdDecomposer {
    /// Maps hull accuracy onto V-HACD's concavity threshold (lower = tighter).
    fn concavity_for(accuracy: f32) -> f32 {
        const LOOSE: f32 = 0.1;
        const TIGHT: f32 = 0.001;
        let t = accuracy.clamp(0.0, 1.0);
        LOOSE + (TIGHT - LOOSE) * t
    }
}

impl ConvexDecomposer for VhacdDecomposer {
    fn decompose(
        &self,
        vertices: &[Vec3],
        triangles: &[[u32; 3]],
        accuracy: f32,
        max_hull_verts: u32,
    ) -> Result<Vec<ConvexElem>, AssetError> {
        if vertices.is_empty() || triangles.is_empty() {
            return Err(AssetError::DecompositionFailed {
                reason: "no rigid triangles to decompose".into(),
            });
        }
        let count = vertices.len() as u32;
        if let Some(bad) = triangles.iter().flatten().find(|&&i| i >= count) {
            return Err(AssetError::DecompositionFailed {
                reason: format!("triangle index {bad} out of range ({count} vertices)"),
            });
        }

        let points: Vec<Point3<f32>> = vertices.iter().map(|v| Point3::new(v.x, v.y, v.z)).collect();
        let params = VHACDParameters {
            concavity: Self::concavity_for(accuracy),
            resolution: self.resolution,
            ..VHACDParameters::default()
        };

        let decomposition = VHACD::decompose(&params, &points, triangles, false);
        let hulls: Vec<ConvexElem> = decomposition
            .compute_convex_hulls(params.convex_hull_downsampling)
            .into_iter()
            .map(|(hull_points, _)| limit_hull_vertices(&hull_points, max_hull_verts))
            .filter(|elem| !elem.vertices.is_empty())
            .collect();

        if hulls.is_empty() {
            return Err(AssetError::DecompositionFailed {
                reason: "decomposer produced no hulls".into(),
            });
        }
        log::debug!("decomposed {} triangles into {} hulls", triangles.len(), hulls.len());
        Ok(hulls)
    }
}

/// Keeps at most `max_verts` hull points by evenly subsampling and re-hulling.
fn limit_hull_vertices(points: &[Point3<f32>], max_verts: u32) -> ConvexElem {
    // A tetrahedron is the smallest useful hull.
    let max_verts = (max_verts as usize).max(4);
    let reduced: Vec<Point3<f32>> = if points.len() <= max_verts {
        points.to_vec()
    } else {
        let step = points.len() as f32 / max_verts as f32;
        let subset: Vec<Point3<f32>> = (0..max_verts)
            .map(|i| points[((i as f32) * step) as usize])
            .collect();
        match try_convex_hull(&subset) {
            Ok((hull, _)) => hull,
            Err(_) => subset,
        }
    };
    ConvexElem::new(reduced.iter().map(|p| Vec3::new(p.x, p.y, p.z)).collect())
}

/// Reduces a vertex cloud to the points on its convex hull.
///
/// Degenerate clouds (coplanar, collinear, fewer than four points) are returned as-is.
pub fn hull_points(vertices: &[Vec3]) -> Vec<Vec3> {
    let points: Vec<Point3<f32>> = vertices.iter().map(|v| Point3::new(v.x, v.y, v.z)).collect();
    match try_convex_hull(&points) {
        Ok((hull, _)) if !hull.is_empty() => hull.iter().map(|p| Vec3::new(p.x, p.y, p.z)).collect(),
        _ => vertices.to_vec(),
    }
}
