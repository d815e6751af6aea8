//! Brute-force reachability counts by one BFS per node.
//!
//! Works on any directed graph, cyclic or not. `O(n · (n + m))`, so it is
//! meant for graphs up to a few thousand nodes and as a reference for the
//! DP engine.
//!
//! One visited buffer is reused across all searches: each BFS bumps a
//! stamp instead of clearing the buffer.

use tracing::instrument;

use crate::graph::NodeId;
use crate::graph::store::DiGraphStore;

/// Number of nodes reachable from each node, excluding the node itself.
///
/// Returned in registration order.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn reach_counts(graph: &DiGraphStore) -> Vec<(NodeId, usize)> {
    let n = graph.node_count();
    let mut visited: Vec<u32> = vec![0; n];
    let mut stamp: u32 = 0;
    let mut queue: Vec<usize> = Vec::new();
    let mut counts = Vec::with_capacity(n);

    for start in 0..n {
        stamp = stamp.wrapping_add(1);
        if stamp == 0 {
            // Wrapped: stale stamps could alias the new one.
            visited.fill(0);
            stamp = 1;
        }
        queue.clear();
        // Marking `start` keeps it out of the count even when a cycle returns to it.
        visited[start] = stamp;
        queue.push(start);

        let mut head = 0usize;
        let mut count = 0usize;
        while head < queue.len() {
            let cur = queue[head];
            head += 1;
            for &next in graph.successor_indices(cur) {
                if visited[next] != stamp {
                    visited[next] = stamp;
                    queue.push(next);
                    count += 1;
                }
            }
        }

        if let Some(id) = graph.id_of(start) {
            counts.push((id, count));
        }
    }

    counts
}

/// Ordered pairs `(u, v)`, `u ≠ v`, with `v` reachable from `u`.
#[must_use]
pub fn bfs_reachable_pairs(graph: &DiGraphStore) -> u64 {
    reach_counts(graph).iter().map(|&(_, c)| c as u64).sum()
}

/// Reachability ratio of any directed graph by brute force.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn bfs_reach_ratio(graph: &DiGraphStore) -> f64 {
    let n = graph.node_count() as u64;
    if n < 2 {
        return 0.0_f64;
    }
    bfs_reachable_pairs(graph) as f64 / (n * (n - 1)) as f64
}
