//! Louvain community detection: greedy modularity maximization by local moving and aggregation
#![deny(missing_docs)]
#![deny(warnings)]

/// Data structure for storing a clustering of nodes
pub mod clustering;

/// Partition of one level, indexed both by vertex and by community
pub mod community_index;

/// Weighted degree of the nodes of one level
pub mod degree;

/// Modularity gain of moving a single vertex
pub mod delta;

/// Sequence of partitions produced by the Louvain driver
pub mod dendrogram;

/// Error types
pub mod error;

/// Adapter for graphs coming from outside the crate
pub mod input;

/// Greedy local moving on a single level
pub mod local_moving;

/// Louvain clustering algorithm
pub mod louvain;

/// Data structure for storing a weighted, undirected graph (aka network)
pub mod network;

/// Clustering objective functions
pub mod objective;

mod graph;


pub use clustering::{Clustering, SimpleClustering};
pub use community_index::CommunityIndex;
pub use degree::WeightedDegreeIndex;
pub use dendrogram::{Dendrogram, Level};
pub use error::{LouvainError, Result};
pub use input::InputGraph;
pub use louvain::{LevelPolicy, Louvain, LouvainConfig, VisitOrder, DEFAULT_THRESHOLD};
pub use network::{Graph, Network};

trait ZeroVec {
    fn zero_len(&mut self, len: usize);
}

impl<T: Default> ZeroVec for Vec<T> {
    fn zero_len(&mut self, len: usize) {
        self.clear();
        self.resize_with(len, T::default)
    }
}
