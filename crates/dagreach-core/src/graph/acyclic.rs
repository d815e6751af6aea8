//! Acyclicity validation by topological sort (Kahn's algorithm).
//!
//! A full ordering over every node exists iff the graph is acyclic. On
//! failure the nodes left with a positive in-degree are exactly those on a
//! cycle or downstream of one; a few of them are reported in the error.

use std::collections::VecDeque;

use tracing::{instrument, warn};

use crate::error::GraphError;
use crate::graph::NodeId;
use crate::graph::store::DiGraphStore;

/// Nodes listed in a [`GraphError::CyclicGraph`] sample.
const CYCLE_SAMPLE_LEN: usize = 8;

/// `true` if `graph` has no directed cycle.
#[must_use]
pub fn is_acyclic(graph: &DiGraphStore) -> bool {
    topological_indices(graph).is_ok()
}

/// A topological order of every node in `graph`.
///
/// Ties among independent nodes are broken by registration order.
///
/// # Errors
///
/// Returns [`GraphError::CyclicGraph`] if no full ordering exists.
pub fn topological_order(graph: &DiGraphStore) -> Result<Vec<NodeId>, GraphError> {
    let order = topological_indices(graph)?;
    Ok(order.into_iter().filter_map(|i| graph.id_of(i)).collect())
}

/// Kahn's algorithm over dense indices.
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub(crate) fn topological_indices(graph: &DiGraphStore) -> Result<Vec<usize>, GraphError> {
    let n = graph.node_count();
    let mut in_degree = graph.in_degrees().to_vec();
    let mut ready: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while let Some(u) = ready.pop_front() {
        order.push(u);
        for &v in graph.successor_indices(u) {
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                ready.push_back(v);
            }
        }
    }

    if order.len() == n {
        return Ok(order);
    }

    let mut stuck: Vec<NodeId> = (0..n)
        .filter(|&i| in_degree[i] > 0)
        .filter_map(|i| graph.id_of(i))
        .collect();
    stuck.sort_unstable();
    let remaining = stuck.len();
    stuck.truncate(CYCLE_SAMPLE_LEN);
    warn!(remaining, "topological sort failed: graph contains a cycle");

    Err(GraphError::CyclicGraph {
        remaining,
        sample: stuck,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(NodeId, NodeId)]) -> DiGraphStore {
        DiGraphStore::from_edges(edges.iter().copied()).expect("sparse build")
    }

    fn position(order: &[NodeId], node: NodeId) -> usize {
        order.iter().position(|&n| n == node).expect("node in order")
    }

    #[test]
    fn empty_graph_is_acyclic() {
        let g = DiGraphStore::new();
        assert!(is_acyclic(&g));
        assert_eq!(topological_order(&g).expect("empty order"), Vec::<NodeId>::new());
    }

    #[test]
    fn diamond_order_respects_edges() {
        let g = graph(&[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let order = topological_order(&g).expect("diamond is a DAG");
        assert_eq!(order.len(), 4);
        for (u, v) in g.edges() {
            assert!(position(&order, u) < position(&order, v), "{u} before {v}");
        }
    }

    #[test]
    fn triangle_is_rejected() {
        let g = graph(&[(0, 1), (1, 2), (2, 0)]);
        assert!(!is_acyclic(&g));
        let err = topological_order(&g).expect_err("cycle");
        assert_eq!(
            err,
            GraphError::CyclicGraph {
                remaining: 3,
                sample: vec![0, 1, 2],
            }
        );
    }

    #[test]
    fn downstream_of_cycle_is_reported_unordered() {
        // 3 is acyclic itself but hangs off the cycle.
        let g = graph(&[(5, 0), (0, 1), (1, 0), (1, 3)]);
        match topological_order(&g) {
            Err(GraphError::CyclicGraph { remaining, sample }) => {
                assert_eq!(remaining, 3);
                assert_eq!(sample, vec![0, 1, 3]);
            }
            other => panic!("expected CyclicGraph, got {other:?}"),
        }
    }

    #[test]
    fn isolated_nodes_are_ordered() {
        let mut g = DiGraphStore::new();
        g.add_node(4).expect("add");
        g.add_node(2).expect("add");
        assert_eq!(topological_order(&g).expect("no edges"), vec![4, 2]);
    }
}
