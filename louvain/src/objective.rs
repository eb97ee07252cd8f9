use crate::{Clustering, Network, WeightedDegreeIndex};
use rayon::prelude::*;

/// Newman's modularity `Q = Σ_s (e_ss - a_s²)` of a network clustering, where `e_ss` is the fraction
/// of edge weight inside community `s` and `a_s` the fraction of edge ends attached to it.
/// Self-loops count once towards `e_ss` and twice towards the degree. Returns 0 for a graph with no
/// edge weight.
pub fn modularity(graph: &Network, clustering: &impl Clustering) -> f64 {
    let mut internal = 0.0f64;
    let mut total_edge_weight = 0.0f64;
    let mut cluster_degrees = vec![0.0; clustering.num_clusters()];

    for (source, target, weight) in graph.edge_list() {
        let c1 = clustering.get(source);
        let c2 = clustering.get(target);

        if c1 == c2 {
            internal += 2.0 * weight;
        }

        cluster_degrees[c1] += weight;
        cluster_degrees[c2] += weight;
        total_edge_weight += weight;
    }

    finish(internal, 2.0 * total_edge_weight, &cluster_degrees)
}

/// Newman's modularity of a network clustering, computed using parallelization.
/// Edge sums are reduced serially over fixed chunks so the result does not depend on scheduling.
pub fn par_modularity<C: Clustering + Sync>(graph: &Network, clustering: &C) -> f64 {
    // Create a number of chunks that is large relative to typical thread-counts
    let chunk_size = std::cmp::max(1, graph.nodes() / 64);
    let chunks = (0..graph.nodes())
        .collect::<Vec<usize>>()
        .par_chunks(chunk_size)
        .map(|nodes| {
            let mut internal = 0f64;
            let mut total_edge_weight = 0f64;

            for &i in nodes {
                let c_i = clustering.get(i);
                for (j, weight) in graph.neighbors(i) {
                    // Enforce ordering of node indices to avoid processing edges twice.
                    if j >= i {
                        total_edge_weight += weight;
                        if c_i == clustering.get(j) {
                            internal += 2.0 * weight;
                        }
                    }
                }
            }
            (internal, total_edge_weight)
        })
        .collect::<Vec<(f64, f64)>>();

    let (internal, total_edge_weight) = chunks
        .into_iter()
        .fold((0f64, 0f64), |a, b| (a.0 + b.0, a.1 + b.1));

    let degrees = WeightedDegreeIndex::new(graph);
    let mut cluster_degrees = vec![0.0; clustering.num_clusters()];
    for (i, degree) in degrees.as_slice().iter().enumerate() {
        cluster_degrees[clustering.get(i)] += degree;
    }

    finish(internal, 2.0 * total_edge_weight, &cluster_degrees)
}

fn finish(mut internal: f64, m: f64, cluster_degrees: &[f64]) -> f64 {
    if m == 0.0 {
        return 0.0;
    }

    for degree in cluster_degrees {
        internal -= degree * degree / m;
    }

    internal / m
}
