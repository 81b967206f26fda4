//! Error type for physics asset operations.
//!
//! Every fallible operation in the fitter, the graphs and the editor returns
//! `Result<T, AssetError>`. Nothing in the core panics on bad input; the editing
//! session decides whether to surface, retry or abandon.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AssetError {
    /// The bone has no (weighted) vertices to fit a primitive to.
    #[error("bone `{bone}` has no vertices to fit")]
    NoVertices { bone: String },

    /// A multi-hull decomposition was requested on soft-skinned vertices.
    #[error("bone `{bone}` has soft-skinned vertices; multi convex hulls need rigid vertices")]
    UnsupportedVertexInfluence { bone: String },

    /// Weld requested on bodies that are not parent/child of each other.
    #[error("bodies {base} and {add} are not adjacent in the bone hierarchy")]
    NotAdjacent { base: usize, add: usize },

    /// Skeleton import produced no bodies.
    #[error("skeleton import created no bodies")]
    EmptyAsset,

    /// The external convex decomposer failed.
    #[error("convex decomposition failed: {reason}")]
    DecompositionFailed { reason: String },

    #[error("body index {index} out of range (count={count})")]
    InvalidBodyIndex { index: usize, count: usize },

    #[error("constraint index {index} out of range (count={count})")]
    InvalidConstraintIndex { index: usize, count: usize },

    #[error("shape index {index} out of range for body {body}")]
    InvalidShapeIndex { body: usize, index: usize },

    #[error("bone `{name}` is not in the skeleton")]
    UnknownBone { name: String },

    #[error("body {index} cannot be combined with itself")]
    SameBody { index: usize },

    /// An invariant check failed.
    #[error("inconsistent physics asset: {reason}")]
    Inconsistent { reason: String },
}
