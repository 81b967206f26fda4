/*!
Core math aliases and the rigid [`Transform`] shared by every module.

This module intentionally contains no algorithms beyond transform composition.
Bone-space data (shape centers, constraint frames, vertex positions) is always
expressed with these types so the fitter, the graphs and the editor agree on
conventions:

- `a.then(b)` is "apply `a`, then `b`", i.e. the isometry product `b * a`.
- `x.relative_to(parent)` re-expresses `x` in `parent`'s space.
- Scale is never carried; reference-pose scale is stripped by the skeleton view.
*/

use nalgebra as na;
use serde::{Deserialize, Serialize};

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;
pub type Mat3 = na::Matrix3<f32>;

/// A rigid transform (isometry) expressed in some parent space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    #[inline]
    pub fn identity() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }

    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::identity(),
        }
    }

    /// Convert to nalgebra `Isometry3`.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(
            na::Translation3::new(self.translation.x, self.translation.y, self.translation.z),
            self.rotation,
        )
    }

    #[inline]
    pub fn from_iso(iso: &Iso) -> Self {
        Self {
            translation: iso.translation.vector,
            rotation: iso.rotation,
        }
    }

    /// Apply `self`, then `parent`.
    #[inline]
    pub fn then(&self, parent: &Transform) -> Transform {
        Self::from_iso(&(parent.iso() * self.iso()))
    }

    #[inline]
    pub fn inverse(&self) -> Transform {
        Self::from_iso(&self.iso().inverse())
    }

    /// Re-express `self` (given in a common space) in the space of `parent`.
    #[inline]
    pub fn relative_to(&self, parent: &Transform) -> Transform {
        Self::from_iso(&(parent.iso().inverse() * self.iso()))
    }

    #[inline]
    pub fn transform_point(&self, p: &Vec3) -> Vec3 {
        self.rotation * p + self.translation
    }

    #[inline]
    pub fn transform_vector(&self, v: &Vec3) -> Vec3 {
        self.rotation * v
    }

    /// Approximate equality on translation and rotation. `q` and `-q` are the same rotation.
    pub fn approx_eq(&self, other: &Transform, eps: f32) -> bool {
        (self.translation - other.translation).norm() <= eps
            && same_rotation(&self.rotation, &other.rotation, eps)
    }
}

/// Component-wise quaternion comparison that treats `q` and `-q` as equal.
#[inline]
pub fn same_rotation(a: &Quat, b: &Quat, eps: f32) -> bool {
    let diff = (a.coords - b.coords).norm();
    let sum = (a.coords + b.coords).norm();
    diff.min(sum) <= eps
}
