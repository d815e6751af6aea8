//! SCC condensation: collapse every component to one representative node.
//!
//! # Overview
//!
//! Each original edge `u → v` is mapped to `rep(u) → rep(v)`. Edges inside a
//! component vanish; the rest go through the store's deduplicating insert,
//! so many parallel edges between two components become one.
//!
//! The result is acyclic whenever the partition is correct. That property is
//! checked by [`crate::graph::acyclic`], not assumed.

#![allow(clippy::module_name_repetitions)]

use tracing::{debug, instrument};

use crate::graph::NodeId;
use crate::graph::scc::{RepresentativePolicy, SccPartition, find_sccs_with};
use crate::graph::store::DiGraphStore;

// ---------------------------------------------------------------------------
// Condensation
// ---------------------------------------------------------------------------

/// The condensed DAG plus the mapping back onto original node ids.
#[derive(Debug, Clone)]
pub struct Condensation {
    /// One node per SCC, labelled by its representative.
    pub dag: DiGraphStore,
    /// Original node → representative.
    pub partition: SccPartition,
}

impl Condensation {
    /// Run the SCC finder and condense `graph` in one step.
    #[must_use]
    pub fn build(graph: &DiGraphStore, policy: RepresentativePolicy) -> Self {
        let partition = find_sccs_with(graph, policy);
        condense(graph, partition)
    }

    /// Representative of an original node.
    #[must_use]
    pub fn representative(&self, node: NodeId) -> Option<NodeId> {
        self.partition.representative(node)
    }

    /// Size of the component a representative stands for.
    #[must_use]
    pub fn weight_of(&self, representative: NodeId) -> usize {
        self.partition.members_of(representative).map_or(0, <[NodeId]>::len)
    }

    /// Number of original edges that collapsed away (intra-component or
    /// duplicate inter-component edges).
    #[must_use]
    pub fn collapsed_edges(&self, original: &DiGraphStore) -> usize {
        original.edge_count().saturating_sub(self.dag.edge_count())
    }
}

/// Build the condensation of `graph` from a precomputed partition.
///
/// Every representative becomes a node, including those of isolated
/// components, so the condensation has exactly
/// [`SccPartition::component_count`] nodes.
#[must_use]
#[instrument(skip(graph, partition), fields(components = partition.component_count()))]
pub fn condense(graph: &DiGraphStore, partition: SccPartition) -> Condensation {
    let mut dag = DiGraphStore::new();

    // Register representatives in original node order for stable output.
    for node in graph.nodes() {
        if let Some(rep) = partition.representative(node) {
            dag.insert_node(rep);
        }
    }

    for (from, to) in graph.edges() {
        let (Some(ru), Some(rv)) = (partition.representative(from), partition.representative(to))
        else {
            continue;
        };
        if ru != rv {
            dag.insert_edge(ru, rv);
        }
    }

    debug!(
        nodes = dag.node_count(),
        edges = dag.edge_count(),
        "condensation built"
    );

    Condensation { dag, partition }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
