use crate::delta::delta_modularity;
use crate::error::{LouvainError, Result};
use crate::louvain::{LouvainConfig, VisitOrder};
use crate::{CommunityIndex, Network, WeightedDegreeIndex, ZeroVec};
use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Outcome of running local moving to a fixed point on one level.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Number of full sweeps over the vertices, including the final sweep that moved nothing.
    pub sweeps: usize,
    /// Total number of vertex moves applied.
    pub moves: usize,
}

/// Greedy local search over one level: repeatedly sweep the vertices in a fixed order and move each
/// vertex to the neighboring community with the largest modularity gain, as long as that gain exceeds
/// the threshold. Stops after the first sweep that moves nothing.
///
/// Moves take effect immediately, so later vertices of the same sweep see them. Among candidates with
/// the same gain the one with the lowest community id wins.
#[derive(Default)]
pub struct LocalMoving {
    threshold: f64,
    order: VisitOrder,
    max_sweeps: Option<usize>,
    // scratch space, reused between levels
    node_order: Vec<usize>,
    edge_weight_per_cluster: Vec<f64>,
    touched: Vec<bool>,
    neighboring_clusters: Vec<usize>,
}

impl LocalMoving {
    /// Create a local mover with the threshold, visit order and sweep cap of `config`.
    pub fn new(config: &LouvainConfig) -> Self {
        LocalMoving {
            threshold: config.threshold,
            order: config.order,
            max_sweeps: config.max_sweeps,
            ..LocalMoving::default()
        }
    }

    /// Run sweeps over `n` until one of them moves no vertex, updating `index` in place.
    /// `level` only seeds the shuffled visit order and labels diagnostics.
    pub fn iterate(
        &mut self,
        n: &Network,
        degrees: &WeightedDegreeIndex,
        index: &mut CommunityIndex,
        level: usize,
    ) -> Result<SweepStats> {
        let mut stats = SweepStats::default();
        let m = degrees.total();

        // no edge weight, no gain to be had
        if !(m > 0.0) {
            return Ok(stats);
        }

        self.node_order.clear();
        self.node_order.extend(0..n.nodes());
        if let VisitOrder::Shuffled { seed } = self.order {
            let mut rng = ChaCha20Rng::seed_from_u64(seed.wrapping_add(level as u64));
            self.node_order.shuffle(&mut rng);
        }

        self.edge_weight_per_cluster.zero_len(index.capacity());
        self.touched.zero_len(index.capacity());

        loop {
            if let Some(cap) = self.max_sweeps {
                if stats.sweeps >= cap {
                    return Err(LouvainError::NotConverged {
                        level,
                        sweeps: stats.sweeps,
                    });
                }
            }

            let moved = self.sweep(n, degrees, index, m);
            stats.sweeps += 1;
            stats.moves += moved;
            debug!(
                "level {level} sweep {}: {moved} moves, {} communities",
                stats.sweeps,
                index.num_communities()
            );

            if moved == 0 {
                return Ok(stats);
            }
        }
    }

    fn sweep(&mut self, n: &Network, degrees: &WeightedDegreeIndex, index: &mut CommunityIndex, m: f64) -> usize {
        let mut moved = 0;

        for i in 0..self.node_order.len() {
            let node = self.node_order[i];
            let current = index.community_of(node);

            if let Some((best, gain)) = self.best_move(n, degrees, index, node, m) {
                if gain > self.threshold {
                    trace!("move {node}: {current} -> {best} (dQ = {gain:e})");
                    index.move_node(node, current, best, degrees.degree(node));
                    moved += 1;
                }
            }
        }

        moved
    }

    /// The neighboring community (other than its own) with the largest gain for `node`, with that gain.
    fn best_move(
        &mut self,
        n: &Network,
        degrees: &WeightedDegreeIndex,
        index: &CommunityIndex,
        node: usize,
        m: f64,
    ) -> Option<(usize, f64)> {
        let current = index.community_of(node);
        let degree = degrees.degree(node);

        self.neighboring_clusters.clear();
        for (target, edge_weight) in n.neighbors(node) {
            if target == node {
                continue;
            }
            let neighbor_cluster = index.community_of(target);
            if !self.touched[neighbor_cluster] {
                self.touched[neighbor_cluster] = true;
                self.neighboring_clusters.push(neighbor_cluster);
            }
            self.edge_weight_per_cluster[neighbor_cluster] += edge_weight;
        }
        self.neighboring_clusters.sort_unstable();

        let d_cur = self.edge_weight_per_cluster[current];
        let s_cur = index.degree_sum(current);

        let mut best: Option<(usize, f64)> = None;
        for &l in &self.neighboring_clusters {
            if l == current {
                continue;
            }
            let gain = delta_modularity(degree, d_cur, s_cur, self.edge_weight_per_cluster[l], index.degree_sum(l), m);
            // strict comparison over ascending ids keeps the lowest id on ties
            if best.map_or(true, |(_, best_gain)| gain > best_gain) {
                best = Some((l, gain));
            }
        }

        // give the next node a blank slate
        for &l in &self.neighboring_clusters {
            self.edge_weight_per_cluster[l] = 0.0;
            self.touched[l] = false;
        }

        best
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::objective::modularity;
    use crate::{Clustering, SimpleClustering};

    fn run(n: &Network, config: &LouvainConfig) -> (CommunityIndex, SweepStats) {
        let degrees = WeightedDegreeIndex::new(n);
        let mut index = CommunityIndex::singletons(&degrees);
        let stats = LocalMoving::new(config).iterate(n, &degrees, &mut index, 0).unwrap();
        (index, stats)
    }

    #[test]
    fn star_collapses_into_hub() {
        let n = Network::from_edges(5, (1..5).map(|leaf| (0, leaf, 1.0)));
        let (index, stats) = run(&n, &LouvainConfig::default());

        assert_eq!(index.num_communities(), 1);
        assert!(stats.moves >= 4);
        assert_eq!(index.to_clustering().labels(), &[0; 5]);
    }

    #[test]
    fn ties_go_to_the_lowest_community() {
        // vertex 1 sits between two identical neighbors
        let n = Network::from_edges(3, vec![(0, 1, 1.0), (1, 2, 1.0)]);
        let config = LouvainConfig::default();
        let degrees = WeightedDegreeIndex::new(&n);
        let index = CommunityIndex::singletons(&degrees);
        let mut mover = LocalMoving::new(&config);
        mover.edge_weight_per_cluster.zero_len(index.capacity());
        mover.touched.zero_len(index.capacity());

        let (best, gain) = mover.best_move(&n, &degrees, &index, 1, degrees.total()).unwrap();
        assert_eq!(best, 0);
        assert!(gain > 0.0);
        assert!(mover.touched.iter().all(|t| !t));
        assert!(mover.edge_weight_per_cluster.iter().all(|&w| w == 0.0));
    }

    #[test]
    fn converged_partition_is_a_fixed_point() {
        let n = Network::from_edges(
            6,
            vec![(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0), (2, 3, 0.2), (3, 4, 1.0), (4, 5, 1.0), (3, 5, 1.0)],
        );
        let config = LouvainConfig::default();
        let (index, _) = run(&n, &config);

        let degrees = WeightedDegreeIndex::new(&n);
        let mut again = CommunityIndex::new(&index.to_clustering(), &degrees);
        let stats = LocalMoving::new(&config).iterate(&n, &degrees, &mut again, 0).unwrap();
        assert_eq!(stats, SweepStats { sweeps: 1, moves: 0 });
    }

    #[test]
    fn modularity_never_decreases() {
        let n = Network::from_edges(
            7,
            vec![
                (0, 1, 2.0),
                (1, 2, 1.0),
                (2, 0, 1.0),
                (2, 3, 0.5),
                (3, 4, 1.0),
                (4, 5, 3.0),
                (5, 6, 1.0),
                (6, 3, 1.0),
                (1, 1, 1.0),
            ],
        );
        let config = LouvainConfig::default();
        let before = modularity(&n, &SimpleClustering::init_different_clusters(n.nodes()));
        let (index, _) = run(&n, &config);
        let after = modularity(&n, &index.to_clustering());
        assert!(after >= before);
    }

    #[test]
    fn undefined_total_weight_moves_nothing() {
        for w in [0.0, f64::NAN] {
            let n = Network::from_edges(2, vec![(0, 1, w)]);
            let (index, stats) = run(&n, &LouvainConfig::default());
            assert_eq!(stats, SweepStats::default());
            assert_eq!(index.num_communities(), 2);
        }
    }

    #[test]
    fn sweep_cap_reports_non_convergence() {
        let n = Network::from_edges(3, vec![(0, 1, 1.0), (1, 2, 1.0)]);
        let config = LouvainConfig::default().with_max_sweeps(1);
        let degrees = WeightedDegreeIndex::new(&n);
        let mut index = CommunityIndex::singletons(&degrees);
        let err = LocalMoving::new(&config).iterate(&n, &degrees, &mut index, 3).unwrap_err();
        assert_eq!(err, LouvainError::NotConverged { level: 3, sweeps: 1 });
    }

    #[test]
    fn shuffled_order_is_reproducible() {
        let n = Network::from_edges(
            8,
            vec![(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0), (4, 5, 1.0), (5, 6, 1.0), (6, 7, 1.0)],
        );
        let config = LouvainConfig::default().with_order(VisitOrder::Shuffled { seed: 17 });
        let (a, _) = run(&n, &config);
        let (b, _) = run(&n, &config);
        assert_eq!(a.to_clustering(), b.to_clustering());
        assert_eq!(a.to_clustering().nodes(), 8);
    }
}
