use crate::graph::{Edges, UnGraph};
use crate::Clustering;
use fxhash::FxHashMap;
use itertools::Itertools;
use rayon::prelude::{IndexedParallelIterator, ParallelIterator};
use rayon::slice::ParallelSlice;

/// Undirected graph with f64 node weights and f64 edge weights. Used to represent one level of the
/// network being clustered. The node weight is the number of original vertices the node stands for.
pub type Graph = UnGraph<f64, f64, u32>;

/// Container for the network graph of one level.
#[derive(Clone, Debug)]
pub struct Network {
    pub(crate) graph: Graph,
}

/// Iterator over pairs of (adjacent node id, edge_weight) for all neighbors of a chosen node.
/// A self-loop is yielded once, with the node itself as the neighbor.
pub struct NeighborAndWeightIter<'a> {
    edge_iter: Edges<'a, f64, u32>,
    home_node: usize,
}

impl Iterator for NeighborAndWeightIter<'_> {
    type Item = (usize, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.edge_iter.next().map(|edge_ref| {
            debug_assert_eq!(edge_ref.source().as_usize(), self.home_node);
            (edge_ref.target().as_usize(), *edge_ref.weight())
        })
    }
}

impl Network {
    /// Create a new empty network
    pub fn new() -> Network {
        Network {
            graph: Graph::with_capacity(0, 0),
        }
    }

    /// Build a network of `n_nodes` unit-size nodes from a list of weighted adjacencies.
    /// Repeated pairs (in either orientation) are merged by summing their weights; `(i, i, w)` is a
    /// self-loop. Edges are inserted in ascending `(min, max)` order so the adjacency lists, and
    /// therefore every downstream result, do not depend on the order of the input.
    pub fn from_edges<I: IntoIterator<Item = (u32, u32, f64)>>(n_nodes: usize, adjacency: I) -> Network {
        let mut edge_memo = FxHashMap::default();
        for (i, j, w) in adjacency {
            let key = if i <= j { (i, j) } else { (j, i) };
            *edge_memo.entry(key).or_insert(0.0) += w;
        }

        let mut graph = Graph::with_capacity(n_nodes, edge_memo.len());
        for _ in 0..n_nodes {
            graph.add_node(1.0);
        }
        for ((i, j), w) in edge_memo.into_iter().sorted_unstable_by_key(|(key, _)| *key) {
            graph.add_edge(i.into(), j.into(), w);
        }

        Network { graph }
    }

    /// Number of nodes in the graph
    pub fn nodes(&self) -> usize {
        self.graph.node_count() as usize
    }

    /// Number of undirected edges in the graph, self-loops included
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of original vertices represented by `node`.
    pub fn size(&self, node: usize) -> f64 {
        self.graph.node_weights()[node]
    }

    /// Iterator over pairs of (adjacent node id, edge_weight) for all neighbors of `node`.
    pub fn neighbors(&'_ self, node: usize) -> NeighborAndWeightIter<'_> {
        NeighborAndWeightIter {
            edge_iter: self.graph.edges((node as u32).into()),
            home_node: node,
        }
    }

    /// Iterator over every undirected edge once, as `(source, target, weight)` with `source <= target`.
    pub fn edge_list(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().as_usize(), e.target().as_usize(), *e.weight()))
    }

    /// Get the total size of all nodes in the graph
    pub fn get_total_node_weight(&self) -> f64 {
        self.graph.node_weights().iter().sum()
    }

    /// Get the total edge weight of the graph, counting every edge (and self-loop) once
    pub fn get_total_edge_weight(&self) -> f64 {
        self.graph
            .edge_references()
            .fold(0.0, |acc, edge| acc + *edge.weight())
    }

    /// Get the total edge weight of the graph, computed in parallel
    pub fn get_total_edge_weight_par(&self) -> f64 {
        const CHUNK: usize = 256;
        let mut partial_sums = vec![];

        // sum up the edge weights in parallel over chunks of nodes, then sum the chunks serially to
        // ensure a deterministic result. Each edge is only counted from its lower endpoint.
        self.graph
            .edges
            .par_chunks(CHUNK)
            .enumerate()
            .map(|(chunk, node_chunk)| {
                node_chunk
                    .iter()
                    .enumerate()
                    .map(|(offset, adjacent)| {
                        let node = chunk * CHUNK + offset;
                        adjacent
                            .iter()
                            .filter(|e| e.target().as_usize() >= node)
                            .fold(0.0, |acc, e| acc + e.weight)
                    })
                    .sum::<f64>()
            })
            .collect_into_vec(&mut partial_sums);

        partial_sums.iter().sum::<f64>()
    }

    /// Creates a reduced (or aggregate) network based on a clustering with dense labels.
    /// Each node in the reduced network corresponds to a cluster of nodes in
    /// the original network. The size of a node in the reduced network equals
    /// the sum of the sizes of the nodes in the corresponding cluster. The weight
    /// of an edge between two nodes in the reduced network equals the sum of the
    /// weights of the edges between the two corresponding clusters, and the weight
    /// of the self-loop on a node equals the total weight of the edges inside the
    /// cluster (self-loops included). Total edge weight is therefore preserved.
    pub fn create_reduced_network(&self, clustering: &impl Clustering) -> Network {
        let num_clusters = clustering.num_clusters();
        let mut cluster_g = Graph::with_capacity(num_clusters, num_clusters * 2);

        let mut sizes = vec![0.0; num_clusters];
        for node in 0..self.nodes() {
            sizes[clustering.get(node)] += self.size(node);
        }
        for size in sizes {
            cluster_g.add_node(size);
        }

        let mut edge_memo = FxHashMap::default();

        for e in self.graph.edge_references() {
            let c1 = clustering.get(e.source().as_usize()) as u32;
            let c2 = clustering.get(e.target().as_usize()) as u32;

            let key = if c1 <= c2 { (c1, c2) } else { (c2, c1) };

            *edge_memo.entry(key).or_insert(0.0) += *e.weight();
        }

        for ((c1, c2), weight) in edge_memo.into_iter().sorted_unstable_by_key(|(key, _)| *key) {
            cluster_g.add_edge(c1.into(), c2.into(), weight);
        }

        Network { graph: cluster_g }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::SimpleClustering;
    use approx::assert_relative_eq;

    fn path_with_loop() -> Network {
        // 0 - 1 - 2 - 3, plus a self-loop on 3
        Network::from_edges(4, vec![(0, 1, 1.0), (2, 1, 2.0), (2, 3, 0.5), (3, 3, 4.0)])
    }

    #[test]
    fn from_edges_merges_parallel_edges() {
        let n = Network::from_edges(3, vec![(0, 1, 1.0), (1, 0, 2.0), (1, 2, 1.0)]);
        assert_eq!(n.edge_count(), 2);
        assert_eq!(n.neighbors(0).collect::<Vec<_>>(), vec![(1, 3.0)]);
        assert_eq!(n.neighbors(1).collect::<Vec<_>>(), vec![(0, 3.0), (2, 1.0)]);
    }

    #[test]
    fn total_edge_weight() {
        let n = path_with_loop();
        assert_relative_eq!(n.get_total_edge_weight(), 7.5);
        assert_eq!(n.get_total_edge_weight(), n.get_total_edge_weight_par());
        assert_relative_eq!(n.get_total_node_weight(), 4.0);
    }

    #[test]
    fn reduced_network_keeps_internal_weight_as_loops() {
        let n = path_with_loop();
        let c = SimpleClustering::new_from_labels(&[0, 0, 1, 1]);
        let reduced = n.create_reduced_network(&c);

        assert_eq!(reduced.nodes(), 2);
        assert_relative_eq!(reduced.size(0), 2.0);
        assert_relative_eq!(reduced.size(1), 2.0);
        assert_eq!(
            reduced.edge_list().collect::<Vec<_>>(),
            vec![(0, 0, 1.0), (0, 1, 2.0), (1, 1, 4.5)]
        );
        assert_relative_eq!(reduced.get_total_edge_weight(), n.get_total_edge_weight());
    }
}
