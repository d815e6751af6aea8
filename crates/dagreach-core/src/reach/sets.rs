//! Reachable-set representations.
//!
//! The DP only needs "start from a singleton, absorb a successor's set,
//! report the size". Two representations implement that:
//!
//! - `HashSet<usize>`: memory proportional to the actual reachable pairs.
//!   Right for sparse reachability over large condensations.
//! - [`FixedBitSet`]: `n` bits per live set, word-parallel unions. Right for
//!   dense reachability when `n` is small enough that `n²/8` bytes fit.
//!
//! Both produce identical counts; [`ReachRepresentation::Auto`] picks by
//! node count.

use std::collections::{BTreeMap, HashSet};

use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};

use crate::graph::NodeId;

/// Which set type the reachability DP uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReachRepresentation {
    /// Hash sets of dense indices.
    Sets,
    /// One bitset of `n` bits per node.
    Bitset,
    /// Bitsets up to a node-count threshold, hash sets above it.
    #[default]
    Auto,
}

impl ReachRepresentation {
    /// Resolve `Auto` against a node count.
    #[must_use]
    pub const fn resolve(self, node_count: usize, bitset_max_nodes: usize) -> Self {
        match self {
            Self::Auto if node_count <= bitset_max_nodes => Self::Bitset,
            Self::Auto => Self::Sets,
            other => other,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sets => "sets",
            Self::Bitset => "bitset",
            Self::Auto => "auto",
        }
    }
}

/// Operations the reachability DP needs from a set of dense indices.
pub(crate) trait ReachSet {
    /// `{node}` in a universe of `universe` indices.
    fn singleton(node: usize, universe: usize) -> Self;
    /// `self ∪= other`.
    fn absorb(&mut self, other: &Self);
    fn count(&self) -> usize;
    fn members(&self) -> Vec<usize>;
}

impl ReachSet for HashSet<usize> {
    fn singleton(node: usize, _universe: usize) -> Self {
        Self::from([node])
    }

    fn absorb(&mut self, other: &Self) {
        self.extend(other.iter().copied());
    }

    fn count(&self) -> usize {
        self.len()
    }

    fn members(&self) -> Vec<usize> {
        self.iter().copied().collect()
    }
}

impl ReachSet for FixedBitSet {
    fn singleton(node: usize, universe: usize) -> Self {
        let mut set = Self::with_capacity(universe);
        set.insert(node);
        set
    }

    fn absorb(&mut self, other: &Self) {
        self.union_with(other);
    }

    fn count(&self) -> usize {
        self.count_ones(..)
    }

    fn members(&self) -> Vec<usize> {
        self.ones().collect()
    }
}

// ---------------------------------------------------------------------------
// ReachableSets
// ---------------------------------------------------------------------------

/// Retained per-node reachable sets (each includes the node itself).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReachableSets {
    sets: BTreeMap<NodeId, Vec<NodeId>>,
}

impl ReachableSets {
    pub(crate) fn insert(&mut self, node: NodeId, mut reach: Vec<NodeId>) {
        reach.sort_unstable();
        self.sets.insert(node, reach);
    }

    /// Reachable set of `node`, sorted ascending.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&[NodeId]> {
        self.sets.get(&node).map(Vec::as_slice)
    }

    /// `|reach(node)|`, including `node` itself.
    #[must_use]
    pub fn len_of(&self, node: NodeId) -> Option<usize> {
        self.sets.get(&node).map(Vec::len)
    }

    /// `true` if `to` is reachable from `from` (every node reaches itself).
    #[must_use]
    pub fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        self.sets
            .get(&from)
            .is_some_and(|reach| reach.binary_search(&to).is_ok())
    }

    /// Number of nodes with a retained set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// `(node, reach)` pairs in ascending node order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &[NodeId])> {
        self.sets.iter().map(|(&node, reach)| (node, reach.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise<S: ReachSet>() {
        let mut a = S::singleton(1, 8);
        let mut b = S::singleton(5, 8);
        b.absorb(&S::singleton(7, 8));
        a.absorb(&b);
        a.absorb(&b);
        assert_eq!(a.count(), 3);
        let mut members = a.members();
        members.sort_unstable();
        assert_eq!(members, vec![1, 5, 7]);
    }

    #[test]
    fn hash_sets_union_idempotently() {
        exercise::<HashSet<usize>>();
    }

    #[test]
    fn bitsets_union_idempotently() {
        exercise::<FixedBitSet>();
    }

    #[test]
    fn auto_resolves_by_node_count() {
        assert_eq!(
            ReachRepresentation::Auto.resolve(10, 100),
            ReachRepresentation::Bitset
        );
        assert_eq!(
            ReachRepresentation::Auto.resolve(101, 100),
            ReachRepresentation::Sets
        );
        assert_eq!(
            ReachRepresentation::Sets.resolve(1, 100),
            ReachRepresentation::Sets
        );
    }

    #[test]
    fn reachable_sets_lookup() {
        let mut sets = ReachableSets::default();
        sets.insert(0, vec![2, 0, 1]);
        sets.insert(2, vec![2]);
        assert_eq!(sets.get(0), Some(&[0, 1, 2][..]));
        assert_eq!(sets.len_of(2), Some(1));
        assert!(sets.reaches(0, 2));
        assert!(!sets.reaches(2, 0));
        assert!(sets.reaches(2, 2));
        assert_eq!(sets.iter().count(), 2);
    }
}
