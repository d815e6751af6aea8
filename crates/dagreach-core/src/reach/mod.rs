//! Reachability counting over DAGs and condensations.
//!
//! - [`ratio`]: the exact reverse-topological DP (the main engine).
//! - [`sets`]: hash-set and bitset representations behind one trait.
//! - [`bfs`]: per-node BFS counts for arbitrary graphs, used as a reference.

pub mod bfs;
pub mod ratio;
pub mod sets;

pub use bfs::{bfs_reach_ratio, reach_counts};
pub use ratio::{
    DEFAULT_BITSET_MAX_NODES, ReachOptions, ReachReport, lifted_reach_ratio, reach_ratio,
    reach_ratio_with_order,
};
pub use sets::{ReachRepresentation, ReachableSets};
