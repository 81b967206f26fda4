/*!
Tolerances and fitting constants shared by the fitter and the graph editor.

Notes
- Units follow the skeleton's reference pose (typically centimeters for imported rigs).
- Favor practical tolerances over machine epsilon; bone offsets below
  [`DEGENERATE_OFFSET`] cannot define an orientation.
*/

/// Scale applied to fitted primitive extents so the shape does not sit exactly on the
/// skin surface (avoids coplanar z-fighting in debug draws).
pub const SHAPE_INFLATION: f32 = 1.01;

/// Default minimum half-extent of a fitted primitive.
pub const DEFAULT_MIN_PRIM_SIZE: f32 = 0.5;

/// Fixed number of power-iteration steps used to approximate the dominant eigenvector.
pub const POWER_ITERATIONS: usize = 32;

/// Child offsets shorter than this cannot be used to orient a primitive down the bone.
pub const DEGENERATE_OFFSET: f32 = 1.0e-4;

/// Side length of the box given to bodies that have lost all of their shapes.
pub const DEFAULT_EMPTY_BOX_SIZE: f32 = 15.0;

/// Default minimum bone size (see `fitter::bone_extent`) for a bone to get a body on import.
pub const DEFAULT_MIN_BONE_SIZE: f32 = 5.0;

/// Default hull accuracy passed to the convex decomposer, in `[0, 1]`.
pub const DEFAULT_HULL_ACCURACY: f32 = 0.5;

/// Default vertex budget per decomposed hull.
pub const DEFAULT_MAX_HULL_VERTS: u32 = 16;

/// Skeletal joint preset limits (degrees).
pub const SKEL_JOINT_SWING_LIMIT_DEG: f32 = 45.0;
pub const SKEL_JOINT_TWIST_LIMIT_DEG: f32 = 15.0;

/// Hinge preset twist limit (degrees).
pub const HINGE_TWIST_LIMIT_DEG: f32 = 45.0;
