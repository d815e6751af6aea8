//! One-shot analysis: condense, validate, count.
//!
//! ```text
//! DiGraphStore ──find_sccs──▶ SccPartition ──condense──▶ Condensation
//!                                                          │
//!                          topological_order (validate) ◀──┤
//!                                                          ▼
//!                         reach_ratio (DAG) + lifted_reach_ratio (original)
//! ```

use serde::Serialize;
use tracing::{info, instrument};

use crate::config::Config;
use crate::error::GraphError;
use crate::graph::stats::GraphStats;
use crate::graph::store::DiGraphStore;
use crate::graph::{Condensation, condense, find_sccs_with, topological_order};
use crate::reach::{ReachReport, lifted_reach_ratio, reach_ratio, reach_ratio_with_order};

/// Everything the pipeline derived from one input graph.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// `blake3:` hash of the input graph.
    pub content_hash: String,
    pub stats: GraphStats,
    /// Ratio of the condensation itself.
    pub dag: ReachReport,
    /// Ratio of the input graph, computed through the condensation.
    pub lifted: ReachReport,
    /// `true` if the acyclicity validator ran on the condensation.
    pub validated: bool,
    #[serde(skip)]
    pub condensation: Condensation,
}

/// Run every stage on `graph` with the given settings.
///
/// # Errors
///
/// Returns [`GraphError::CyclicGraph`] if the condensation is not acyclic.
/// That only happens if the partition is wrong, so it indicates a bug.
#[instrument(skip(graph, config), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn run(graph: &DiGraphStore, config: &Config) -> Result<PipelineReport, GraphError> {
    let content_hash = graph.content_hash();
    let partition = find_sccs_with(graph, config.condense.representative);
    let condensation = condense(graph, partition);

    let dag = if config.condense.validate {
        let order = topological_order(&condensation.dag)?;
        reach_ratio_with_order(&condensation.dag, &order, &config.reach)?
    } else {
        reach_ratio(&condensation.dag, &config.reach)?
    };
    let lifted = lifted_reach_ratio(&condensation, &config.reach)?;
    let stats = GraphStats::compute(graph, &condensation);

    info!(
        components = stats.scc_count,
        condensed_edges = stats.condensed_edge_count,
        dag_ratio = dag.ratio,
        lifted_ratio = lifted.ratio,
        "pipeline complete"
    );

    Ok(PipelineReport {
        content_hash,
        stats,
        dag,
        lifted,
        validated: config.condense.validate,
        condensation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RepresentativePolicy;
    use crate::reach::bfs_reach_ratio;

    fn sample() -> DiGraphStore {
        // cycle {0,1,2} → 3 → 4, and 5 isolated
        let mut g =
            DiGraphStore::from_edges([(0, 1), (1, 2), (2, 0), (2, 3), (3, 4)]).expect("build");
        g.add_node(5).expect("add");
        g
    }

    #[test]
    fn report_covers_every_stage() {
        let g = sample();
        let report = run(&g, &Config::default()).expect("pipeline");

        assert!(report.validated);
        assert_eq!(report.content_hash, g.content_hash());
        assert_eq!(report.stats.scc_count, 4);
        assert_eq!(report.condensation.dag.node_count(), 4);
        assert_eq!(report.condensation.dag.edge_count(), 2);

        // condensation 0 → 3 → 4 plus isolated 5: 3 pairs of 12
        assert_eq!(report.dag.reachable_pairs, 3);
        assert_eq!(report.dag.total_pairs, 12);

        assert_eq!(report.lifted.node_count, 6);
        assert!((report.lifted.ratio - bfs_reach_ratio(&g)).abs() < 1e-12);
    }

    #[test]
    fn skipping_validation_gives_same_counts() {
        let g = sample();
        let mut config = Config::default();
        config.condense.validate = false;
        let unchecked = run(&g, &config).expect("pipeline");
        let checked = run(&g, &Config::default()).expect("pipeline");

        assert!(!unchecked.validated);
        assert_eq!(unchecked.dag.reachable_pairs, checked.dag.reachable_pairs);
        assert_eq!(unchecked.lifted.reachable_pairs, checked.lifted.reachable_pairs);
    }

    #[test]
    fn root_policy_changes_representatives_only() {
        let g = sample();
        let mut config = Config::default();
        config.condense.representative = RepresentativePolicy::Root;
        let report = run(&g, &config).expect("pipeline");
        let smallest = run(&g, &Config::default()).expect("pipeline");

        assert_eq!(report.dag.reachable_pairs, smallest.dag.reachable_pairs);
        assert_eq!(report.lifted.reachable_pairs, smallest.lifted.reachable_pairs);
        assert!(report.condensation.partition.same_component(0, 2));
    }

    #[test]
    fn empty_graph_runs_cleanly() {
        let report = run(&DiGraphStore::new(), &Config::default()).expect("empty");
        assert_eq!(report.stats.node_count, 0);
        assert!((report.dag.ratio - 0.0).abs() < f64::EPSILON);
        assert!((report.lifted.ratio - 0.0).abs() < f64::EPSILON);
    }
}
