//! Strongly connected components via Tarjan's algorithm without recursion.
//!
//! # Explicit Frames
//!
//! Input graphs can contain chains and cycles hundreds of thousands of nodes
//! deep, far past what the native call stack survives. The DFS therefore runs
//! on a heap-allocated stack of `(node, cursor)` frames that simulates call
//! and return:
//!
//! - **Entry** (cursor 0, node unvisited): assign `index = lowlink =
//!   next_index`, push the node on the component stack.
//! - **Scan** (any cursor): walk successors from the cursor. An unvisited
//!   successor suspends this frame (saving the cursor) and pushes a child
//!   frame. An on-stack successor lowers `lowlink` to its `index` on the spot.
//! - **Return** (successors exhausted): if `lowlink == index` the node is a
//!   component root; pop the component stack down to it and emit one SCC.
//!   Then fold `lowlink` into the frame beneath, which is the DFS parent.
//!
//! All bookkeeping lives in [`TarjanState`], owned by a single call.
//!
//! # Output Order
//!
//! Components are emitted sinks first: a reverse topological order of the
//! condensation.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::graph::NodeId;
use crate::graph::store::DiGraphStore;

const UNVISITED: usize = usize::MAX;

// ---------------------------------------------------------------------------
// RepresentativePolicy
// ---------------------------------------------------------------------------

/// Which member labels a component in the condensation.
///
/// The choice never changes the shape of the condensation, only the id its
/// merged nodes carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepresentativePolicy {
    /// Smallest member id (stable across input orderings).
    #[default]
    Smallest,
    /// The DFS root that closed the component.
    Root,
}

// ---------------------------------------------------------------------------
// SccPartition
// ---------------------------------------------------------------------------

/// A partition of the node set into strongly connected components.
#[derive(Debug, Clone, Default)]
pub struct SccPartition {
    /// Members per component, sorted ascending. Emission order (sinks first).
    components: Vec<Vec<NodeId>>,
    /// Representative per component.
    representatives: Vec<NodeId>,
    /// Node id → component position.
    component_of: HashMap<NodeId, usize>,
}

impl SccPartition {
    /// Number of components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Number of components with more than one member.
    #[must_use]
    pub fn nontrivial_count(&self) -> usize {
        self.components.iter().filter(|c| c.len() > 1).count()
    }

    /// Number of nodes that sit inside a component of size > 1.
    #[must_use]
    pub fn nodes_in_nontrivial(&self) -> usize {
        self.components
            .iter()
            .filter(|c| c.len() > 1)
            .map(Vec::len)
            .sum()
    }

    /// Size of the largest component (0 for an empty partition).
    #[must_use]
    pub fn largest_component_size(&self) -> usize {
        self.components.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Number of partitioned nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.component_of.len()
    }

    /// Components in emission order, members sorted ascending.
    #[must_use]
    pub fn components(&self) -> &[Vec<NodeId>] {
        &self.components
    }

    /// Representatives in the same order as [`SccPartition::components`].
    #[must_use]
    pub fn representatives(&self) -> &[NodeId] {
        &self.representatives
    }

    /// Position of `node`'s component in [`SccPartition::components`].
    #[must_use]
    pub fn component_of(&self, node: NodeId) -> Option<usize> {
        self.component_of.get(&node).copied()
    }

    /// Representative of `node`'s component.
    #[must_use]
    pub fn representative(&self, node: NodeId) -> Option<NodeId> {
        self.component_of(node).map(|c| self.representatives[c])
    }

    /// Members of `node`'s component.
    #[must_use]
    pub fn members_of(&self, node: NodeId) -> Option<&[NodeId]> {
        self.component_of(node).map(|c| self.components[c].as_slice())
    }

    /// `true` if `u` and `v` are mutually reachable.
    #[must_use]
    pub fn same_component(&self, u: NodeId, v: NodeId) -> bool {
        match (self.component_of(u), self.component_of(v)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// `(node, representative)` pairs, component by component.
    pub fn mapping(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.components
            .iter()
            .zip(&self.representatives)
            .flat_map(|(members, &rep)| members.iter().map(move |&m| (m, rep)))
    }

    /// `(node, representative)` pairs sorted by node id.
    #[must_use]
    pub fn sorted_mapping(&self) -> Vec<(NodeId, NodeId)> {
        let mut pairs: Vec<_> = self.mapping().collect();
        pairs.sort_unstable();
        pairs
    }
}

// ---------------------------------------------------------------------------
// Tarjan
// ---------------------------------------------------------------------------

/// Partition `graph` into SCCs, labelling each by its smallest member.
#[must_use]
pub fn find_sccs(graph: &DiGraphStore) -> SccPartition {
    find_sccs_with(graph, RepresentativePolicy::Smallest)
}

/// Partition `graph` into SCCs with an explicit representative policy.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn find_sccs_with(graph: &DiGraphStore, policy: RepresentativePolicy) -> SccPartition {
    let mut state = TarjanState::new(graph);
    for start in 0..graph.node_count() {
        if state.index[start] == UNVISITED {
            state.strong_connect(start);
        }
    }

    let partition = state.into_partition(policy);
    debug!(
        components = partition.component_count(),
        nontrivial = partition.nontrivial_count(),
        "scc partition computed"
    );
    partition
}

/// One simulated call frame: the node and the next successor to scan.
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: usize,
    cursor: usize,
}

/// Per-invocation Tarjan bookkeeping over dense indices.
struct TarjanState<'g> {
    graph: &'g DiGraphStore,
    index: Vec<usize>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    component_stack: Vec<usize>,
    frames: Vec<Frame>,
    next_index: usize,
    /// Emitted components as `(root, members)` in dense indices.
    emitted: Vec<(usize, Vec<usize>)>,
}

impl<'g> TarjanState<'g> {
    fn new(graph: &'g DiGraphStore) -> Self {
        let n = graph.node_count();
        Self {
            graph,
            index: vec![UNVISITED; n],
            lowlink: vec![UNVISITED; n],
            on_stack: vec![false; n],
            component_stack: Vec::new(),
            frames: Vec::new(),
            next_index: 0,
            emitted: Vec::new(),
        }
    }

    fn strong_connect(&mut self, start: usize) {
        let graph = self.graph;
        self.frames.push(Frame {
            node: start,
            cursor: 0,
        });

        while let Some(&Frame { node: v, cursor }) = self.frames.last() {
            if cursor == 0 && self.index[v] == UNVISITED {
                self.enter(v);
            }

            let successors = graph.successor_indices(v);
            let mut next = cursor;
            let mut child = None;
            while next < successors.len() {
                let w = successors[next];
                next += 1;
                if self.index[w] == UNVISITED {
                    child = Some(w);
                    break;
                }
                if self.on_stack[w] {
                    self.lowlink[v] = self.lowlink[v].min(self.index[w]);
                }
            }

            if let Some(w) = child {
                if let Some(top) = self.frames.last_mut() {
                    top.cursor = next;
                }
                self.frames.push(Frame { node: w, cursor: 0 });
                continue;
            }

            self.frames.pop();
            if self.lowlink[v] == self.index[v] {
                self.emit(v);
            }
            if let Some(&Frame { node: parent, .. }) = self.frames.last() {
                self.lowlink[parent] = self.lowlink[parent].min(self.lowlink[v]);
            }
        }
    }

    fn enter(&mut self, v: usize) {
        self.index[v] = self.next_index;
        self.lowlink[v] = self.next_index;
        self.next_index += 1;
        self.component_stack.push(v);
        self.on_stack[v] = true;
    }

    fn emit(&mut self, root: usize) {
        let mut members = Vec::new();
        while let Some(w) = self.component_stack.pop() {
            self.on_stack[w] = false;
            members.push(w);
            if w == root {
                break;
            }
        }
        self.emitted.push((root, members));
    }

    fn into_partition(self, policy: RepresentativePolicy) -> SccPartition {
        let graph = self.graph;
        let id = |idx: usize| graph.id_of(idx).unwrap_or_default();

        let mut partition = SccPartition {
            components: Vec::with_capacity(self.emitted.len()),
            representatives: Vec::with_capacity(self.emitted.len()),
            component_of: HashMap::with_capacity(graph.node_count()),
        };

        for (position, (root, members)) in self.emitted.into_iter().enumerate() {
            let mut ids: Vec<NodeId> = members.into_iter().map(id).collect();
            ids.sort_unstable();
            let rep = match policy {
                RepresentativePolicy::Smallest => ids[0],
                RepresentativePolicy::Root => id(root),
            };
            for &member in &ids {
                partition.component_of.insert(member, position);
            }
            partition.components.push(ids);
            partition.representatives.push(rep);
        }

        partition
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
