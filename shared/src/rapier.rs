use rapier3d::prelude::*;

use crate::{
    body::{Body, CollisionEnabled},
    shapes::AggregateGeom,
    types::{Iso, Transform},
};

/// Build one compound Rapier shape from every element of a body's geometry.
///
/// Element poses become compound sub-shape poses, so the result lives in bone space.
/// Capsules are Z-aligned: Rapier's `half_height` is half of [`crate::shapes::CapsuleElem::length`].
/// Hulls whose vertices do not span a volume are skipped.
///
/// Returns `None` when no element survives.
pub fn shared_shape_from_geom(geom: &AggregateGeom) -> Option<SharedShape> {
    let mut parts: Vec<(Iso, SharedShape)> = Vec::with_capacity(geom.element_count());

    for s in &geom.spheres {
        parts.push((Transform::from_translation(s.center).iso(), SharedShape::ball(s.radius)));
    }
    for b in &geom.boxes {
        let he = b.half_extents;
        parts.push((b.transform().iso(), SharedShape::cuboid(he.x, he.y, he.z)));
    }
    for c in &geom.capsules {
        parts.push((c.transform().iso(), SharedShape::capsule_z(c.length * 0.5, c.radius)));
    }
    for (i, hull) in geom.convex_hulls.iter().enumerate() {
        let points: Vec<Point<Real>> = hull.vertices.iter().map(|v| Point::from(*v)).collect();
        match SharedShape::convex_hull(&points) {
            Some(shape) => parts.push((Iso::identity(), shape)),
            None => log::warn!("skipping degenerate convex hull {i} ({} vertices)", points.len()),
        }
    }

    if parts.is_empty() {
        return None;
    }
    Some(SharedShape::compound(parts))
}

/// Build a Rapier collider for a body, honoring its collision setting.
///
/// - `NoCollision` produces no collider.
/// - `QueryOnly` produces a sensor (scene queries, no contact response).
/// - `PhysicsOnly` and `QueryAndPhysics` produce a solid collider.
///
/// The collider's parent is expected to sit at the bone's pose, so the local
/// transform is identity.
pub fn collider_from_body(body: &Body) -> Option<Collider> {
    if body.collision_enabled == CollisionEnabled::NoCollision {
        log::debug!("body `{}` has collision disabled; no collider", body.bone_name());
        return None;
    }
    let shape = shared_shape_from_geom(&body.geom)?;
    Some(
        ColliderBuilder::new(shape)
            .sensor(body.collision_enabled == CollisionEnabled::QueryOnly)
            .build(),
    )
}
