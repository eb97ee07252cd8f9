use std::fmt;

/// Result alias for fallible `louvain` operations.
pub type Result<T> = std::result::Result<T, LouvainError>;

/// Errors surfaced by the Louvain driver. All of them are raised before any clustering state is built.
#[derive(Debug, Clone, PartialEq)]
pub enum LouvainError {
    /// The input graph is directed; modularity is only defined here for undirected graphs.
    InvalidGraphKind,

    /// The seed partition does not cover every vertex exactly once.
    PartitionSizeMismatch {
        /// Number of vertices in the graph.
        expected: usize,
        /// Number of labels supplied.
        found: usize,
    },

    /// An edge weight is negative, NaN or infinite.
    InvalidEdgeWeight {
        /// Source vertex of the offending edge.
        source: usize,
        /// Target vertex of the offending edge.
        target: usize,
        /// The rejected weight.
        weight: f64,
    },

    /// The graph has more vertices than a `u32` node id can address.
    GraphTooLarge {
        /// Number of vertices in the graph.
        nodes: usize,
    },

    /// A configuration value is out of range.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        message: &'static str,
    },

    /// A level hit the configured sweep cap before reaching a fixed point.
    NotConverged {
        /// Level at which the cap was hit.
        level: usize,
        /// Number of sweeps performed.
        sweeps: usize,
    },
}

impl fmt::Display for LouvainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LouvainError::InvalidGraphKind => f.write_str("louvain requires an undirected graph"),
            LouvainError::PartitionSizeMismatch { expected, found } => {
                write!(f, "seed partition has {found} labels but the graph has {expected} vertices")
            }
            LouvainError::InvalidEdgeWeight { source, target, weight } => {
                write!(f, "edge ({source}, {target}) has invalid weight {weight}")
            }
            LouvainError::GraphTooLarge { nodes } => {
                write!(f, "graph has {nodes} vertices, more than {} are not supported", u32::MAX)
            }
            LouvainError::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            LouvainError::NotConverged { level, sweeps } => {
                write!(f, "level {level} did not converge after {sweeps} sweeps")
            }
        }
    }
}

impl std::error::Error for LouvainError {}
