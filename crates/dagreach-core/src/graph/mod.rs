//! Directed graph storage, SCC condensation and acyclicity checks.
//!
//! # Overview
//!
//! Every stage takes an immutable [`DiGraphStore`] and returns a new derived
//! artifact; nothing is mutated in place once handed to the next stage.
//!
//! ## Pipeline
//!
//! ```text
//! (NodeId, NodeId) edges
//!        ↓  store::DiGraphStore::from_edges()
//! DiGraphStore (may contain cycles)
//!        ↓  scc::find_sccs()
//! SccPartition (node → representative)
//!        ↓  condense::condense()
//! Condensation
//!   ├─ dag:       one node per SCC, deduplicated edges
//!   └─ partition: mapping back onto original ids
//!        ↓  acyclic::topological_order()
//! Vec<NodeId> (or GraphError::CyclicGraph)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use dagreach_core::graph::{Condensation, DiGraphStore, RepresentativePolicy, is_acyclic};
//!
//! let graph = DiGraphStore::from_edges([(0, 1), (1, 2), (2, 0), (2, 3)])?;
//! let condensed = Condensation::build(&graph, RepresentativePolicy::Smallest);
//!
//! assert_eq!(condensed.dag.node_count(), 2);
//! assert!(condensed.dag.contains_edge(0, 3));
//! assert!(is_acyclic(&condensed.dag));
//! # Ok::<(), dagreach_core::GraphError>(())
//! ```

pub mod acyclic;
pub mod condense;
pub mod scc;
pub mod stats;
pub mod store;

/// External node identifier.
pub type NodeId = u64;

pub use acyclic::{is_acyclic, topological_order};
pub use condense::{Condensation, condense};
pub use scc::{RepresentativePolicy, SccPartition, find_sccs, find_sccs_with};
pub use stats::GraphStats;
pub use store::DiGraphStore;
