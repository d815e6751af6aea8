//! Exact reachability ratio of a DAG via a reverse-topological DP.
//!
//! # Algorithm
//!
//! 1. Order the nodes topologically (Kahn). A cycle aborts here with
//!    [`GraphError::CyclicGraph`] before any DP work.
//! 2. Walk the order backwards, sinks first. For node `v`:
//!    `reach(v) = {v} ∪ ⋃ reach(w)` over successors `w`. Every successor
//!    precedes `v` in this walk, so its set is complete when consumed.
//! 3. `reachable_pairs = Σ (|reach(v)| − 1)`.
//! 4. `ratio = reachable_pairs / (n · (n − 1))`, or `0.0` when `n < 2`.
//!
//! A successor's set is dropped once its last predecessor has absorbed it,
//! unless the caller asked to retain every set.
//!
//! # Cost
//!
//! `O(|V| + Σ |reach(v)|)`: quadratic when reachability is dense. That is
//! inherent to exact counting.
//!
//! # Lifted Ratio
//!
//! [`lifted_reach_ratio`] runs the same DP on a condensation, weighting each
//! representative by its component size, which yields the reachability ratio
//! of the original, possibly cyclic, graph.

use std::collections::HashSet;

use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::NodeId;
use crate::graph::acyclic::topological_indices;
use crate::graph::condense::Condensation;
use crate::graph::store::DiGraphStore;
use crate::reach::sets::{ReachRepresentation, ReachSet, ReachableSets};

// ---------------------------------------------------------------------------
// Options and report
// ---------------------------------------------------------------------------

/// Default node-count ceiling for [`ReachRepresentation::Auto`] to pick
/// bitsets (20 000² bits ≈ 50 MB worst case).
pub const DEFAULT_BITSET_MAX_NODES: usize = 20_000;

/// Tuning knobs for the reachability engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReachOptions {
    pub representation: ReachRepresentation,
    pub bitset_max_nodes: usize,
    /// Keep every node's reachable set in the report.
    pub retain_sets: bool,
}

impl Default for ReachOptions {
    fn default() -> Self {
        Self {
            representation: ReachRepresentation::Auto,
            bitset_max_nodes: DEFAULT_BITSET_MAX_NODES,
            retain_sets: false,
        }
    }
}

/// Result of a reachability computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReachReport {
    /// Nodes counted in the denominator.
    pub node_count: usize,
    /// Ordered pairs `(u, v)`, `u ≠ v`, with `v` reachable from `u`.
    pub reachable_pairs: u64,
    /// `n · (n − 1)`.
    pub total_pairs: u64,
    /// `reachable_pairs / total_pairs`, `0.0` when `total_pairs == 0`.
    pub ratio: f64,
    /// Set representation actually used.
    pub representation: ReachRepresentation,
    /// Per-node reachable sets, when requested.
    #[serde(skip)]
    pub sets: Option<ReachableSets>,
}

impl ReachReport {
    fn new(
        node_count: usize,
        reachable_pairs: u64,
        representation: ReachRepresentation,
        sets: Option<ReachableSets>,
    ) -> Self {
        let n = node_count as u64;
        let total_pairs = n.saturating_mul(n.saturating_sub(1));
        Self {
            node_count,
            reachable_pairs,
            total_pairs,
            ratio: ratio_of(reachable_pairs, total_pairs),
            representation,
            sets,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio_of(pairs: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0_f64;
    }
    pairs as f64 / total as f64
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Reachability ratio of `dag`.
///
/// # Errors
///
/// Returns [`GraphError::CyclicGraph`] if `dag` has a cycle; no DP work is
/// done in that case.
#[instrument(skip(dag, options), fields(nodes = dag.node_count(), edges = dag.edge_count()))]
pub fn reach_ratio(dag: &DiGraphStore, options: &ReachOptions) -> Result<ReachReport, GraphError> {
    let order = topological_indices(dag)?;
    run(dag, &order, None, dag.node_count(), options)
}

/// Reachability ratio of `dag` using a caller-supplied topological order.
///
/// # Errors
///
/// Returns [`GraphError::NotAGraphDag`] if `order` is not a permutation of
/// the node set or is not topological. No partial ratio is produced.
#[instrument(skip(dag, order, options), fields(nodes = dag.node_count()))]
pub fn reach_ratio_with_order(
    dag: &DiGraphStore,
    order: &[NodeId],
    options: &ReachOptions,
) -> Result<ReachReport, GraphError> {
    let n = dag.node_count();
    if order.len() != n {
        return Err(GraphError::NotAGraphDag {
            reason: format!("order lists {} node(s), graph has {n}", order.len()),
        });
    }

    let mut seen = vec![false; n];
    let mut indices = Vec::with_capacity(n);
    for &id in order {
        let Some(idx) = dag.index_of(id) else {
            return Err(GraphError::NotAGraphDag {
                reason: format!("order names unknown node {id}"),
            });
        };
        if std::mem::replace(&mut seen[idx], true) {
            return Err(GraphError::NotAGraphDag {
                reason: format!("order lists node {id} twice"),
            });
        }
        indices.push(idx);
    }

    run(dag, &indices, None, n, options)
}

/// Reachability ratio of the graph a condensation was built from.
///
/// Each representative counts for its component's size, so the result
/// equals the ratio a BFS from every original node would give, at the cost
/// of a DP over the (much smaller) condensation. Retained sets, if
/// requested, are keyed by representative.
///
/// # Errors
///
/// Returns [`GraphError::CyclicGraph`] if the condensation is not acyclic,
/// which means the partition was wrong.
#[instrument(skip(condensation, options), fields(components = condensation.dag.node_count()))]
pub fn lifted_reach_ratio(
    condensation: &Condensation,
    options: &ReachOptions,
) -> Result<ReachReport, GraphError> {
    let dag = &condensation.dag;
    let order = topological_indices(dag)?;
    let weights: Vec<u64> = (0..dag.node_count())
        .map(|i| {
            dag.id_of(i)
                .map_or(0, |rep| condensation.weight_of(rep) as u64)
        })
        .collect();
    run(
        dag,
        &order,
        Some(&weights),
        condensation.partition.node_count(),
        options,
    )
}

// ---------------------------------------------------------------------------
// DP
// ---------------------------------------------------------------------------

fn run(
    dag: &DiGraphStore,
    order: &[usize],
    weights: Option<&[u64]>,
    node_count: usize,
    options: &ReachOptions,
) -> Result<ReachReport, GraphError> {
    if dag.is_empty() {
        debug!("empty graph: ratio is 0.0 by definition");
    }

    let representation = options
        .representation
        .resolve(dag.node_count(), options.bitset_max_nodes);
    let (pairs, sets) = match representation {
        ReachRepresentation::Bitset => {
            propagate::<FixedBitSet>(dag, order, weights, options.retain_sets)?
        }
        _ => propagate::<HashSet<usize>>(dag, order, weights, options.retain_sets)?,
    };

    let report = ReachReport::new(node_count, pairs, representation, sets);
    debug!(
        reachable_pairs = report.reachable_pairs,
        total_pairs = report.total_pairs,
        ratio = report.ratio,
        representation = representation.as_str(),
        "reachability ratio computed"
    );
    Ok(report)
}

/// Reverse-topological set propagation.
///
/// With `weights`, node `v` contributes `w(v) · (Σ_{u ∈ reach(v)} w(u) − 1)`
/// pairs; without, `|reach(v)| − 1`.
fn propagate<S: ReachSet>(
    dag: &DiGraphStore,
    order: &[usize],
    weights: Option<&[u64]>,
    retain: bool,
) -> Result<(u64, Option<ReachableSets>), GraphError> {
    let n = dag.node_count();
    let mut sets: Vec<Option<S>> = std::iter::repeat_with(|| None).take(n).collect();
    let mut done = vec![false; n];
    let mut pending_preds = dag.in_degrees().to_vec();
    let mut pairs: u64 = 0;

    for &v in order.iter().rev() {
        let mut reach = S::singleton(v, n);
        for &w in dag.successor_indices(v) {
            let Some(successor) = sets[w].as_ref() else {
                return Err(not_a_dag(dag, v, w, done[w]));
            };
            reach.absorb(successor);
        }

        pairs += match weights {
            None => reach.count() as u64 - 1,
            Some(weights) => {
                let reached: u64 = reach.members().into_iter().map(|u| weights[u]).sum();
                weights[v] * (reached - 1)
            }
        };

        if !retain {
            for &w in dag.successor_indices(v) {
                pending_preds[w] -= 1;
                if pending_preds[w] == 0 {
                    sets[w] = None;
                }
            }
        }

        done[v] = true;
        sets[v] = Some(reach);
    }

    let retained = retain.then(|| {
        let mut out = ReachableSets::default();
        for (idx, set) in sets.iter().enumerate() {
            if let (Some(set), Some(id)) = (set, dag.id_of(idx)) {
                let reach = set.members().into_iter().filter_map(|u| dag.id_of(u)).collect();
                out.insert(id, reach);
            }
        }
        out
    });

    Ok((pairs, retained))
}

fn not_a_dag(dag: &DiGraphStore, v: usize, w: usize, released: bool) -> GraphError {
    let id = |i: usize| dag.id_of(i).unwrap_or_default();
    let reason = if released {
        format!("successor {} of {} was processed twice", id(w), id(v))
    } else {
        format!(
            "successor {} of {} was not processed before it",
            id(w),
            id(v)
        )
    };
    GraphError::NotAGraphDag { reason }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
