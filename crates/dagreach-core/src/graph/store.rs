//! Adjacency storage for a directed graph over integer node ids.
//!
//! # Index Space
//!
//! External ids ([`NodeId`]) are mapped to dense `usize` indices in the
//! order they are first seen. Algorithms work on the dense indices so their
//! bookkeeping can live in plain `Vec`s; results are translated back to ids
//! at the boundary.
//!
//! ## Self-loops and Multi-edges
//!
//! A self-loop registers its endpoint as a node but never becomes an edge.
//! Repeated `(from, to)` pairs collapse into one logical edge.
//!
//! ## Dense Node Space
//!
//! [`DiGraphStore::with_node_space`] pre-registers ids `0..n` and rejects
//! any endpoint `>= n` with [`GraphError::InvalidEdge`]. This mirrors
//! array-backed loaders that size their tables from a declared node count.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

use crate::error::GraphError;
use crate::graph::NodeId;

// ---------------------------------------------------------------------------
// DiGraphStore
// ---------------------------------------------------------------------------

/// A directed graph with deduplicated edges.
///
/// Successor order is insertion order, so every traversal is deterministic
/// for a given input sequence.
#[derive(Debug, Clone, Default)]
pub struct DiGraphStore {
    /// Dense index → external id.
    ids: Vec<NodeId>,
    /// External id → dense index.
    index: HashMap<NodeId, usize>,
    /// Out-neighbours per dense index, in insertion order.
    adjacency: Vec<Vec<usize>>,
    /// In-degree per dense index.
    in_degree: Vec<usize>,
    /// Logical edge set used for deduplication.
    edge_set: HashSet<(usize, usize)>,
    /// Upper bound (exclusive) on ids for dense stores.
    node_space: Option<u64>,
}

impl DiGraphStore {
    /// Create an empty sparse store: any id is accepted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dense store holding nodes `0..node_space`.
    ///
    /// Edges whose endpoints fall outside that range are rejected.
    #[must_use]
    pub fn with_node_space(node_space: u64) -> Self {
        let mut store = Self {
            node_space: Some(node_space),
            ..Self::default()
        };
        for id in 0..node_space {
            store.register(id);
        }
        store
    }

    /// Build a sparse store from an edge sequence.
    ///
    /// # Errors
    ///
    /// Never fails for sparse stores; the `Result` keeps the signature
    /// aligned with [`DiGraphStore::add_edge`].
    pub fn from_edges<I>(edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut store = Self::new();
        store.extend_edges(edges)?;
        Ok(store)
    }

    /// Insert every edge of `edges`.
    ///
    /// Returns the number of new logical edges.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidEdge`] on the first out-of-range edge of
    /// a dense store. Edges before it stay inserted.
    pub fn extend_edges<I>(&mut self, edges: I) -> Result<usize, GraphError>
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut inserted = 0;
        for (from, to) in edges {
            if self.add_edge(from, to)? {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    /// Register `id` as a node (no-op if already present).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidEdge`] if `id` is outside a dense
    /// store's node space.
    pub fn add_node(&mut self, id: NodeId) -> Result<usize, GraphError> {
        self.check_space(id, id)?;
        Ok(self.register(id))
    }

    /// Insert the edge `from -> to`, registering both endpoints.
    ///
    /// Returns `true` if a new logical edge was added, `false` for
    /// self-loops and duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidEdge`] if either endpoint is outside a
    /// dense store's node space.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<bool, GraphError> {
        self.check_space(from, to)?;
        Ok(self.link(from, to))
    }

    /// Register `id` in a sparse store. Infallible counterpart of
    /// [`DiGraphStore::add_node`] for stores built inside the crate.
    pub(crate) fn insert_node(&mut self, id: NodeId) -> usize {
        debug_assert!(self.node_space.is_none(), "insert_node on a dense store");
        self.register(id)
    }

    /// Infallible counterpart of [`DiGraphStore::add_edge`] for sparse
    /// stores.
    pub(crate) fn insert_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        debug_assert!(self.node_space.is_none(), "insert_edge on a dense store");
        self.link(from, to)
    }

    fn link(&mut self, from: NodeId, to: NodeId) -> bool {
        let u = self.register(from);
        if from == to {
            return false;
        }
        let v = self.register(to);
        if !self.edge_set.insert((u, v)) {
            return false;
        }
        self.adjacency[u].push(v);
        self.in_degree[v] += 1;
        true
    }

    /// Return the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Return the number of logical edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_set.len()
    }

    /// `true` when the store holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Node ids in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.iter().copied()
    }

    /// Out-neighbours of `node` in insertion order (empty for unknown ids).
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.index
            .get(&node)
            .into_iter()
            .flat_map(move |&u| self.adjacency[u].iter().map(move |&v| self.ids[v]))
    }

    /// All edges, grouped by source in registration order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.adjacency.iter().enumerate().flat_map(move |(u, succ)| {
            succ.iter().map(move |&v| (self.ids[u], self.ids[v]))
        })
    }

    /// All edges sorted by `(from, to)`, for stable serialization.
    #[must_use]
    pub fn sorted_edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut edges: Vec<_> = self.edges().collect();
        edges.sort_unstable();
        edges
    }

    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.index.contains_key(&node)
    }

    #[must_use]
    pub fn contains_edge(&self, from: NodeId, to: NodeId) -> bool {
        match (self.index.get(&from), self.index.get(&to)) {
            (Some(&u), Some(&v)) => self.edge_set.contains(&(u, v)),
            _ => false,
        }
    }

    /// Out-degree of `node` (0 for unknown ids).
    #[must_use]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.index.get(&node).map_or(0, |&u| self.adjacency[u].len())
    }

    /// In-degree of `node` (0 for unknown ids).
    #[must_use]
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.index.get(&node).map_or(0, |&u| self.in_degree[u])
    }

    /// Dense index of `node`.
    #[must_use]
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.index.get(&node).copied()
    }

    /// External id at dense index `idx`.
    #[must_use]
    pub fn id_of(&self, idx: usize) -> Option<NodeId> {
        self.ids.get(idx).copied()
    }

    /// Out-neighbours of dense index `idx`, as dense indices.
    #[must_use]
    pub fn successor_indices(&self, idx: usize) -> &[usize] {
        self.adjacency.get(idx).map_or(&[], Vec::as_slice)
    }

    /// In-degree of every dense index.
    #[must_use]
    pub fn in_degrees(&self) -> &[usize] {
        &self.in_degree
    }

    /// Declared node space of a dense store.
    #[must_use]
    pub const fn node_space(&self) -> Option<u64> {
        self.node_space
    }

    /// BLAKE3 hash of the sorted edge list plus isolated nodes.
    ///
    /// Independent of insertion order; compare against a stored value to
    /// skip recomputation for an unchanged graph.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for (from, to) in self.sorted_edges() {
            hasher.update(&from.to_le_bytes());
            hasher.update(&to.to_le_bytes());
        }
        hasher.update(b"\x00nodes\x00");
        let mut isolated: Vec<NodeId> = self
            .ids
            .iter()
            .enumerate()
            .filter(|&(i, _)| self.adjacency[i].is_empty() && self.in_degree[i] == 0)
            .map(|(_, &id)| id)
            .collect();
        isolated.sort_unstable();
        for id in isolated {
            hasher.update(&id.to_le_bytes());
        }
        format!("blake3:{}", hasher.finalize())
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn register(&mut self, id: NodeId) -> usize {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.ids.len();
        self.ids.push(id);
        self.index.insert(id, idx);
        self.adjacency.push(Vec::new());
        self.in_degree.push(0);
        idx
    }

    fn check_space(&self, from: NodeId, to: NodeId) -> Result<(), GraphError> {
        match self.node_space {
            Some(space) if from >= space || to >= space => Err(GraphError::InvalidEdge {
                from,
                to,
                node_space: space,
            }),
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
