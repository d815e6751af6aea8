//! Summary statistics for a directed graph and its condensation.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: size of the original graph.
//! - **density**: `edge_count / (node_count * (node_count - 1))`; 0.0 for
//!   graphs with fewer than two nodes.
//! - **scc_count**: number of strongly connected components (= nodes of the
//!   condensation).
//! - **nontrivial_scc_count**: SCCs with more than one member.
//! - **nodes_in_nontrivial_scc** and **nontrivial_scc_node_ratio**: how much
//!   of the graph sits inside a cycle.
//! - **scc_per_node_ratio**: `nontrivial_scc_count / node_count`.
//! - **largest_scc_size**: members of the biggest component.
//! - **wcc_count**: weakly connected components (edges read undirected),
//!   plus the non-trivial count and the nodes inside them.
//! - **nontrivial_wcc_node_ratio** / **wcc_per_node_ratio**: the weak
//!   counterparts of the two SCC ratios.
//! - **isolated_node_count**: nodes with no in- or out-edges.
//! - **max_in_degree** / **max_out_degree**: over the original graph.
//! - **condensed_edge_count**: edges left after condensation.

use serde::Serialize;

use crate::graph::condense::Condensation;
use crate::graph::store::DiGraphStore;

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Summary statistics for a graph.
///
/// All counts refer to the original graph unless the name says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub scc_count: usize,
    pub nontrivial_scc_count: usize,
    pub nodes_in_nontrivial_scc: usize,
    pub nontrivial_scc_node_ratio: f64,
    pub scc_per_node_ratio: f64,
    pub largest_scc_size: usize,
    pub wcc_count: usize,
    pub nontrivial_wcc_count: usize,
    pub nodes_in_nontrivial_wcc: usize,
    pub nontrivial_wcc_node_ratio: f64,
    pub wcc_per_node_ratio: f64,
    pub isolated_node_count: usize,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
    pub condensed_edge_count: usize,
}

impl GraphStats {
    /// Compute statistics for `graph` given its condensation.
    #[must_use]
    pub fn compute(graph: &DiGraphStore, condensation: &Condensation) -> Self {
        let node_count = graph.node_count();
        let edge_count = graph.edge_count();
        let partition = &condensation.partition;

        let nontrivial_scc_count = partition.nontrivial_count();
        let nodes_in_nontrivial_scc = partition.nodes_in_nontrivial();

        let wcc_sizes = weak_component_sizes(graph);
        let nontrivial_wcc: Vec<usize> = wcc_sizes.iter().copied().filter(|&s| s > 1).collect();
        let nodes_in_nontrivial_wcc: usize = nontrivial_wcc.iter().sum();

        let isolated_node_count = graph
            .nodes()
            .filter(|&v| graph.in_degree(v) == 0 && graph.out_degree(v) == 0)
            .count();

        Self {
            node_count,
            edge_count,
            density: compute_density(node_count, edge_count),
            scc_count: partition.component_count(),
            nontrivial_scc_count,
            nodes_in_nontrivial_scc,
            nontrivial_scc_node_ratio: compute_ratio(nodes_in_nontrivial_scc, node_count),
            scc_per_node_ratio: compute_ratio(nontrivial_scc_count, node_count),
            largest_scc_size: partition.largest_component_size(),
            wcc_count: wcc_sizes.len(),
            nontrivial_wcc_count: nontrivial_wcc.len(),
            nodes_in_nontrivial_wcc,
            nontrivial_wcc_node_ratio: compute_ratio(nodes_in_nontrivial_wcc, node_count),
            wcc_per_node_ratio: compute_ratio(nontrivial_wcc.len(), node_count),
            isolated_node_count,
            max_in_degree: graph.nodes().map(|v| graph.in_degree(v)).max().unwrap_or(0),
            max_out_degree: graph.nodes().map(|v| graph.out_degree(v)).max().unwrap_or(0),
            condensed_edge_count: condensation.dag.edge_count(),
        }
    }

    /// Return `true` if the graph contains at least one cycle.
    #[must_use]
    pub const fn has_cycles(&self) -> bool {
        self.nontrivial_scc_count > 0
    }

    /// Return `true` if the graph has no edges.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.edge_count == 0
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Sizes of the weakly connected components, via union-find over indices.
fn weak_component_sizes(graph: &DiGraphStore) -> Vec<usize> {
    let n = graph.node_count();
    let mut parent: Vec<usize> = (0..n).collect();
    let mut size = vec![1usize; n];

    for u in 0..n {
        for &v in graph.successor_indices(u) {
            let (mut a, mut b) = (find(&mut parent, u), find(&mut parent, v));
            if a == b {
                continue;
            }
            if size[a] < size[b] {
                std::mem::swap(&mut a, &mut b);
            }
            parent[b] = a;
            size[a] += size[b];
        }
    }

    (0..n)
        .filter(|&i| find(&mut parent, i) == i)
        .map(|root| size[root])
        .collect()
}

/// Union-find root with path halving.
fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    edge_count as f64 / max_edges
}

#[allow(clippy::cast_precision_loss)]
fn compute_ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0_f64;
    }
    part as f64 / whole as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;
    use crate::graph::scc::RepresentativePolicy;

    fn stats(edges: &[(NodeId, NodeId)], isolated: &[NodeId]) -> GraphStats {
        let mut g = DiGraphStore::from_edges(edges.iter().copied()).expect("sparse build");
        for &id in isolated {
            g.add_node(id).expect("add");
        }
        let c = Condensation::build(&g, RepresentativePolicy::Smallest);
        GraphStats::compute(&g, &c)
    }

    #[test]
    fn empty_graph_stats_are_zero() {
        let s = stats(&[], &[]);
        assert_eq!(s.node_count, 0);
        assert!((s.density - 0.0).abs() < f64::EPSILON);
        assert_eq!(s.wcc_count, 0);
        assert!((s.nontrivial_wcc_node_ratio - 0.0).abs() < f64::EPSILON);
        assert!((s.wcc_per_node_ratio - 0.0).abs() < f64::EPSILON);
        assert!(!s.has_cycles());
        assert!(s.is_flat());
    }

    #[test]
    fn chain_stats() {
        let s = stats(&[(0, 1), (1, 2)], &[]);
        assert_eq!(s.node_count, 3);
        assert_eq!(s.edge_count, 2);
        assert!((s.density - 2.0 / 6.0).abs() < 1e-12);
        assert_eq!(s.scc_count, 3);
        assert_eq!(s.nontrivial_scc_count, 0);
        assert_eq!(s.wcc_count, 1);
        assert_eq!(s.max_in_degree, 1);
        assert_eq!(s.max_out_degree, 1);
    }

    #[test]
    fn cycle_and_isolated_node() {
        // {0,1,2} cycle → 3, plus isolated 9.
        let s = stats(&[(0, 1), (1, 2), (2, 0), (2, 3)], &[9]);
        assert_eq!(s.node_count, 5);
        assert_eq!(s.scc_count, 3);
        assert_eq!(s.nontrivial_scc_count, 1);
        assert_eq!(s.nodes_in_nontrivial_scc, 3);
        assert!((s.nontrivial_scc_node_ratio - 0.6).abs() < 1e-12);
        assert!((s.scc_per_node_ratio - 0.2).abs() < 1e-12);
        assert_eq!(s.largest_scc_size, 3);
        assert_eq!(s.wcc_count, 2);
        assert_eq!(s.nontrivial_wcc_count, 1);
        assert_eq!(s.nodes_in_nontrivial_wcc, 4);
        assert!((s.nontrivial_wcc_node_ratio - 0.8).abs() < 1e-12);
        assert!((s.wcc_per_node_ratio - 0.2).abs() < 1e-12);
        assert_eq!(s.isolated_node_count, 1);
        assert_eq!(s.condensed_edge_count, 1);
        assert!(s.has_cycles());
    }

    #[test]
    fn weak_components_ignore_direction() {
        // 0 → 1 ← 2 is one weak component.
        let s = stats(&[(0, 1), (2, 1), (3, 4)], &[]);
        assert_eq!(s.wcc_count, 2);
        assert_eq!(s.max_in_degree, 2);
    }
}
