/*!
The physics asset: bodies, constraints and the collision exclusion table.

`PhysicsAsset` is a passive container. It answers queries. Mutable access to its
graphs is only compiled in with the `editing` feature, which the editor crate
turns on; the multi-step edits that keep the three parts in step live there.
*/

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    body::{Body, BodyGraph},
    constraint::{Constraint, ConstraintGraph},
    error::AssetError,
    exclusion::CollisionExclusionTable,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicsAsset {
    bodies: BodyGraph,
    constraints: ConstraintGraph,
    collision: CollisionExclusionTable,
}

impl PhysicsAsset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bodies(&self) -> &BodyGraph {
        &self.bodies
    }

    pub fn constraints(&self) -> &ConstraintGraph {
        &self.constraints
    }

    pub fn collision(&self) -> &CollisionExclusionTable {
        &self.collision
    }

    /// Structural access for multi-step edits. Callers are responsible for leaving the
    /// three parts consistent; see [`PhysicsAsset::check_consistency`].
    #[cfg(feature = "editing")]
    pub fn bodies_mut(&mut self) -> &mut BodyGraph {
        &mut self.bodies
    }

    #[cfg(feature = "editing")]
    pub fn constraints_mut(&mut self) -> &mut ConstraintGraph {
        &mut self.constraints
    }

    #[cfg(feature = "editing")]
    pub fn collision_mut(&mut self) -> &mut CollisionExclusionTable {
        &mut self.collision
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn body_at(&self, index: usize) -> Result<&Body, AssetError> {
        self.bodies.get(index).ok_or(AssetError::InvalidBodyIndex {
            index,
            count: self.bodies.len(),
        })
    }

    pub fn constraint_at(&self, index: usize) -> Result<&Constraint, AssetError> {
        self.constraints
            .get(index)
            .ok_or(AssetError::InvalidConstraintIndex {
                index,
                count: self.constraints.len(),
            })
    }

    #[cfg(feature = "editing")]
    pub fn body_at_mut(&mut self, index: usize) -> Result<&mut Body, AssetError> {
        let count = self.bodies.len();
        self.bodies
            .get_mut(index)
            .ok_or(AssetError::InvalidBodyIndex { index, count })
    }

    #[cfg(feature = "editing")]
    pub fn constraint_at_mut(&mut self, index: usize) -> Result<&mut Constraint, AssetError> {
        let count = self.constraints.len();
        self.constraints
            .get_mut(index)
            .ok_or(AssetError::InvalidConstraintIndex { index, count })
    }

    /// True unless the pair is in the exclusion table. A body always "collides" with itself.
    pub fn is_collision_enabled(&self, i: usize, j: usize) -> bool {
        !self.collision.is_disabled(i, j)
    }

    /// Constraints with the body's bone at either end.
    pub fn constraints_touching(&self, body_index: usize) -> Vec<usize> {
        self.bodies
            .get(body_index)
            .map(|b| self.constraints.constraints_touching(b.bone_name()))
            .unwrap_or_default()
    }

    /// Verifies the structural invariants.
    ///
    /// - bone names are unique across bodies, joint names across constraints;
    /// - both ends of every constraint name an existing body, and differ;
    /// - exclusion pairs reference valid body indices.
    pub fn check_consistency(&self) -> Result<(), AssetError> {
        let mut bones = HashSet::new();
        for body in self.bodies.bodies() {
            if !bones.insert(body.bone_name()) {
                return Err(AssetError::Inconsistent {
                    reason: format!("two bodies on bone `{}`", body.bone_name()),
                });
            }
        }

        let mut joints = HashSet::new();
        for c in self.constraints.constraints() {
            if !joints.insert(c.joint_name.as_str()) {
                return Err(AssetError::Inconsistent {
                    reason: format!("duplicate joint `{}`", c.joint_name),
                });
            }
            if c.bone_a == c.bone_b {
                return Err(AssetError::Inconsistent {
                    reason: format!("joint `{}` connects `{}` to itself", c.joint_name, c.bone_a),
                });
            }
            for end in [&c.bone_a, &c.bone_b] {
                if !bones.contains(end.as_str()) {
                    return Err(AssetError::Inconsistent {
                        reason: format!("joint `{}` references bone `{end}` with no body", c.joint_name),
                    });
                }
            }
        }

        if let Some(max) = self.collision.max_index() {
            if max >= self.bodies.len() {
                return Err(AssetError::Inconsistent {
                    reason: format!(
                        "exclusion pair references body {max} (count={})",
                        self.bodies.len()
                    ),
                });
            }
        }
        Ok(())
    }
}
