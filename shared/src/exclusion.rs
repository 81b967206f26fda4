//! Sparse table of body pairs that must not collide with each other.
//!
//! Pairs are stored normalized as `(min, max)` so the relation is symmetric by
//! construction. A body is never paired with itself.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionExclusionTable {
    pairs: BTreeSet<(usize, usize)>,
}

#[inline]
fn key(i: usize, j: usize) -> (usize, usize) {
    if i < j { (i, j) } else { (j, i) }
}

impl CollisionExclusionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disable(&mut self, i: usize, j: usize) {
        if i != j {
            self.pairs.insert(key(i, j));
        }
    }

    pub fn enable(&mut self, i: usize, j: usize) {
        if i != j {
            self.pairs.remove(&key(i, j));
        }
    }

    pub fn is_disabled(&self, i: usize, j: usize) -> bool {
        i != j && self.pairs.contains(&key(i, j))
    }

    /// Drops every pair that mentions `deleted` and shifts higher indices down by one.
    pub fn remap_on_delete(&mut self, deleted: usize) {
        let shift = |x: usize| if x > deleted { x - 1 } else { x };
        self.pairs = std::mem::take(&mut self.pairs)
            .into_iter()
            .filter(|&(a, b)| a != deleted && b != deleted)
            .map(|(a, b)| key(shift(a), shift(b)))
            .collect();
    }

    /// Moves every pair of `from` onto `to`. The `(from, to)` pair itself is dropped.
    ///
    /// `from` keeps no pairs afterwards; its index is expected to be deleted next.
    pub fn reassign(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        self.pairs = std::mem::take(&mut self.pairs)
            .into_iter()
            .filter_map(|(a, b)| {
                let a = if a == from { to } else { a };
                let b = if b == from { to } else { b };
                (a != b).then(|| key(a, b))
            })
            .collect();
    }

    /// All pairs in ascending `(min, max)` order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Highest body index mentioned by any pair.
    pub fn max_index(&self) -> Option<usize> {
        self.pairs.iter().map(|&(_, b)| b).max()
    }
}
