/*!
Collision primitives attached to a body, expressed in the owning bone's space.

- Sphere:  center + radius (orientation-free).
- Box:     center, rotation and half-extents.
- Capsule: center, rotation, radius and `length`, the distance between the two
           cap centers along the local +Z axis.
- Convex:  a vertex cloud with a cached bounding box.

All re-expression (weld, mirror) goes through [`AggregateGeom::transformed`] or
[`AggregateGeom::rotated`] so every element kind is handled in one place.
*/

use serde::{Deserialize, Serialize};

use crate::types::{Quat, Transform, Vec3};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SphereElem {
    pub center: Vec3,
    pub radius: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxElem {
    pub center: Vec3,
    pub rotation: Quat,
    pub half_extents: Vec3,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapsuleElem {
    pub center: Vec3,
    pub rotation: Quat,
    pub radius: f32,
    pub length: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvexElem {
    pub vertices: Vec<Vec3>,
    /// Axis-aligned bounds of `vertices` as `(min, max)`; `None` when empty.
    pub bounds: Option<(Vec3, Vec3)>,
}

impl BoxElem {
    pub fn transform(&self) -> Transform {
        Transform::new(self.center, self.rotation)
    }

    pub fn set_transform(&mut self, tm: &Transform) {
        self.center = tm.translation;
        self.rotation = tm.rotation;
    }
}

impl CapsuleElem {
    pub fn transform(&self) -> Transform {
        Transform::new(self.center, self.rotation)
    }

    pub fn set_transform(&mut self, tm: &Transform) {
        self.center = tm.translation;
        self.rotation = tm.rotation;
    }
}

impl ConvexElem {
    pub fn new(vertices: Vec<Vec3>) -> Self {
        let mut elem = Self {
            vertices,
            bounds: None,
        };
        elem.update_bounds();
        elem
    }

    pub fn update_bounds(&mut self) {
        let mut iter = self.vertices.iter();
        self.bounds = iter.next().map(|first| {
            iter.fold((*first, *first), |(min, max), v| (min.inf(v), max.sup(v)))
        });
    }
}

/// Primitive kind, used to address one element of an [`AggregateGeom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Sphere,
    Box,
    Capsule,
    Convex,
}

/// Address of one element inside a body's geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeRef {
    pub kind: ShapeKind,
    pub index: usize,
}

/// All collision elements of one body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateGeom {
    pub spheres: Vec<SphereElem>,
    pub boxes: Vec<BoxElem>,
    pub capsules: Vec<CapsuleElem>,
    pub convex_hulls: Vec<ConvexElem>,
}

impl AggregateGeom {
    pub fn element_count(&self) -> usize {
        self.spheres.len() + self.boxes.len() + self.capsules.len() + self.convex_hulls.len()
    }

    pub fn element_count_of(&self, kind: ShapeKind) -> usize {
        match kind {
            ShapeKind::Sphere => self.spheres.len(),
            ShapeKind::Box => self.boxes.len(),
            ShapeKind::Capsule => self.capsules.len(),
            ShapeKind::Convex => self.convex_hulls.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.element_count() == 0
    }

    /// Moves every element of `other` into `self`, preserving order per kind.
    pub fn append(&mut self, mut other: AggregateGeom) {
        self.spheres.append(&mut other.spheres);
        self.boxes.append(&mut other.boxes);
        self.capsules.append(&mut other.capsules);
        self.convex_hulls.append(&mut other.convex_hulls);
    }

    /// Removes one element. Returns false if the address is out of range.
    pub fn remove(&mut self, shape: ShapeRef) -> bool {
        if shape.index >= self.element_count_of(shape.kind) {
            return false;
        }
        match shape.kind {
            ShapeKind::Sphere => {
                self.spheres.remove(shape.index);
            }
            ShapeKind::Box => {
                self.boxes.remove(shape.index);
            }
            ShapeKind::Capsule => {
                self.capsules.remove(shape.index);
            }
            ShapeKind::Convex => {
                self.convex_hulls.remove(shape.index);
            }
        }
        true
    }

    /// Re-expresses every element through `tm` (element space -> `tm`'s parent space).
    ///
    /// Convex hulls are transformed per vertex and get fresh bounds.
    pub fn transformed(&self, tm: &Transform) -> AggregateGeom {
        AggregateGeom {
            spheres: self
                .spheres
                .iter()
                .map(|s| SphereElem {
                    center: tm.transform_point(&s.center),
                    radius: s.radius,
                })
                .collect(),
            boxes: self
                .boxes
                .iter()
                .map(|b| {
                    let mut out = b.clone();
                    out.set_transform(&b.transform().then(tm));
                    out
                })
                .collect(),
            capsules: self
                .capsules
                .iter()
                .map(|c| {
                    let mut out = c.clone();
                    out.set_transform(&c.transform().then(tm));
                    out
                })
                .collect(),
            convex_hulls: self
                .convex_hulls
                .iter()
                .map(|h| ConvexElem::new(h.vertices.iter().map(|v| tm.transform_point(v)).collect()))
                .collect(),
        }
    }

    /// Pre-multiplies centers and orientations by `q` about the bone origin.
    /// Radii, half-extents and lengths are untouched.
    pub fn rotated(&self, q: &Quat) -> AggregateGeom {
        self.transformed(&Transform::new(Vec3::zeros(), *q))
    }

    /// A single box of side `size` centered on the bone.
    pub fn unit_box(size: f32) -> AggregateGeom {
        AggregateGeom {
            boxes: vec![BoxElem {
                center: Vec3::zeros(),
                rotation: Quat::identity(),
                half_extents: Vec3::repeat(size * 0.5),
            }],
            ..AggregateGeom::default()
        }
    }
}
