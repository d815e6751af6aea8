use std::fmt;

use crate::graph::NodeId;

/// Machine-readable error codes for scripted pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidEdge,
    ConfigParseError,
    EdgeListParseError,
    CyclicGraph,
    NotAGraphDag,
    IoFailure,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidEdge => "E1001",
            Self::ConfigParseError => "E1002",
            Self::EdgeListParseError => "E1003",
            Self::CyclicGraph => "E2001",
            Self::NotAGraphDag => "E2002",
            Self::IoFailure => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidEdge => "Edge endpoint outside the declared node space",
            Self::ConfigParseError => "Config file parse error",
            Self::EdgeListParseError => "Edge list parse error",
            Self::CyclicGraph => "Graph contains a cycle",
            Self::NotAGraphDag => "Reachability engine invoked on a non-DAG",
            Self::IoFailure => "File read or write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidEdge => Some("Widen the node space or renumber node ids."),
            Self::ConfigParseError => Some("Fix syntax in dagreach.toml and retry."),
            Self::EdgeListParseError => {
                Some("Each line must hold two non-negative integers: `from to`.")
            }
            Self::CyclicGraph => Some("Condense the graph first (`dagreach ratio --condense`)."),
            Self::NotAGraphDag => {
                Some("Pass a valid topological order or let the engine compute one.")
            }
            Self::IoFailure => Some("Check the path and file permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failures raised by the graph algorithms.
///
/// An empty graph is not an error: every stage accepts it and yields the
/// degenerate result (empty partition, ratio `0.0`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An endpoint lies outside a dense store's declared node space.
    #[error("edge {from} -> {to} references a node outside the node space 0..{node_space}")]
    InvalidEdge {
        from: NodeId,
        to: NodeId,
        node_space: u64,
    },

    /// The validator could not order every node.
    #[error("graph contains a cycle: {remaining} node(s) could not be ordered (e.g. {sample:?})")]
    CyclicGraph {
        /// Number of nodes left without a position in the topological order.
        remaining: usize,
        /// A few of those nodes, smallest ids first.
        sample: Vec<NodeId>,
    },

    /// The reachability engine was handed an order that is not topological.
    #[error("not a DAG: {reason}")]
    NotAGraphDag { reason: String },
}

impl GraphError {
    /// Map to the stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidEdge { .. } => ErrorCode::InvalidEdge,
            Self::CyclicGraph { .. } => ErrorCode::CyclicGraph,
            Self::NotAGraphDag { .. } => ErrorCode::NotAGraphDag,
        }
    }

    /// `true` for errors meaning "the input was not acyclic".
    #[must_use]
    pub const fn is_cycle(&self) -> bool {
        matches!(self, Self::CyclicGraph { .. } | Self::NotAGraphDag { .. })
    }
}
