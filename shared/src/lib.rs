pub mod asset;
pub mod body;
pub mod constants;
pub mod constraint;
pub mod decompose;
pub mod error;
pub mod exclusion;
pub mod fitter;
pub mod rapier;
pub mod shapes;
pub mod skeleton;
pub mod types;

pub use asset::PhysicsAsset;
pub use body::{Body, BodyGraph, CollisionEnabled, PhysicsType};
pub use constants::{
    DEFAULT_EMPTY_BOX_SIZE, DEFAULT_HULL_ACCURACY, DEFAULT_MAX_HULL_VERTS, DEFAULT_MIN_BONE_SIZE,
    DEFAULT_MIN_PRIM_SIZE, SHAPE_INFLATION,
};
pub use constraint::{
    AngularAxis, Constraint, ConstraintGraph, ConstraintPreset, ConstraintProfile, Motion,
};
pub use decompose::{ConvexDecomposer, VhacdDecomposer};
pub use error::AssetError;
pub use exclusion::CollisionExclusionTable;
pub use fitter::{FitOptions, FitRequest, GeomKind, bone_extent, fit_primitive, unique_child_offset};
pub use rapier::{collider_from_body, shared_shape_from_geom};
pub use shapes::{AggregateGeom, BoxElem, CapsuleElem, ConvexElem, ShapeKind, ShapeRef, SphereElem};
pub use skeleton::{
    BoneVertInfo, BoneVertTable, RefSkeleton, SkeletonView, VertexWeighting, root_to_leaf_order,
};
pub use types::{Quat, Transform, Vec3};
