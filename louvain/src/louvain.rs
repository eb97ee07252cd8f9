use crate::dendrogram::{Dendrogram, Level};
use crate::error::{LouvainError, Result};
use crate::input::InputGraph;
use crate::local_moving::LocalMoving;
use crate::objective::par_modularity;
use crate::{Clustering, CommunityIndex, Network, SimpleClustering, WeightedDegreeIndex};
use log::{debug, info, warn};
use std::borrow::Cow;

/// Default minimum modularity gain for a vertex move to be applied
pub const DEFAULT_THRESHOLD: f64 = 1e-5;

/// How many rounds of local moving and aggregation to run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LevelPolicy {
    /// One round of local moving followed by a single aggregation.
    #[default]
    SingleRound,
    /// Keep aggregating until a level moves no vertex, aggregation stops shrinking the graph,
    /// or `max_levels` levels have been emitted.
    Multilevel {
        /// Optional cap on the number of emitted levels.
        max_levels: Option<usize>,
    },
}

/// Order in which vertices are visited during a sweep.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum VisitOrder {
    /// Ascending vertex id.
    #[default]
    Ascending,
    /// A permutation drawn once per level from a ChaCha20 generator seeded with `seed` plus the level.
    Shuffled {
        /// Random seed.
        seed: u64,
    },
}

/// Parameters of the Louvain driver.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LouvainConfig {
    pub(crate) threshold: f64,
    pub(crate) levels: LevelPolicy,
    pub(crate) order: VisitOrder,
    pub(crate) max_sweeps: Option<usize>,
    pub(crate) verbose: bool,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        LouvainConfig {
            threshold: DEFAULT_THRESHOLD,
            levels: LevelPolicy::SingleRound,
            order: VisitOrder::Ascending,
            max_sweeps: None,
            verbose: false,
        }
    }
}

impl LouvainConfig {
    /// Set the minimum modularity gain for a move. Must be finite and positive.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the level policy.
    pub fn with_levels(mut self, levels: LevelPolicy) -> Self {
        self.levels = levels;
        self
    }

    /// Set the vertex visit order.
    pub fn with_order(mut self, order: VisitOrder) -> Self {
        self.order = order;
        self
    }

    /// Cap the number of sweeps per level. Hitting the cap is an error, not a silent truncation.
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = Some(max_sweeps);
        self
    }

    /// Report per-level modularity at info level.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check that every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(LouvainError::InvalidParameter {
                name: "threshold",
                message: "must be a finite positive number",
            });
        }
        if self.max_sweeps == Some(0) {
            return Err(LouvainError::InvalidParameter {
                name: "max_sweeps",
                message: "must be at least 1",
            });
        }
        if let LevelPolicy::Multilevel { max_levels: Some(0) } = self.levels {
            return Err(LouvainError::InvalidParameter {
                name: "max_levels",
                message: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// Perform the Louvain clustering algorithm
pub struct Louvain {
    config: LouvainConfig,
    local_moving: LocalMoving,
}

impl Louvain {
    /// Initialize the Louvain algorithm with the given configuration.
    pub fn new(config: LouvainConfig) -> Louvain {
        Louvain {
            local_moving: LocalMoving::new(&config),
            config,
        }
    }

    /// Cluster an external undirected graph.
    ///
    /// `weight` maps each edge value to its weight; without it every edge weighs 1. `partition`, if
    /// given, is a label per vertex: the graph is first condensed by it and optimization starts from there.
    pub fn run<G: InputGraph>(
        &mut self,
        graph: &G,
        weight: Option<&dyn Fn(&G::EdgeWeight) -> f64>,
        partition: Option<&[usize]>,
    ) -> Result<Dendrogram> {
        if graph.is_directed() {
            return Err(LouvainError::InvalidGraphKind);
        }
        self.config.validate()?;
        check_partition(graph.node_count(), partition)?;

        let network = Network::from_input(graph, weight)?;
        self.run_network(&network, partition)
    }

    /// Cluster a network, optionally starting from the seed `partition`.
    /// Fails if an edge weight is negative or not finite.
    pub fn run_network(&mut self, network: &Network, partition: Option<&[usize]>) -> Result<Dendrogram> {
        self.config.validate()?;
        check_partition(network.nodes(), partition)?;
        check_weights(network)?;

        if network.edge_count() == 0 {
            debug!("graph has no edges, returning the {} partition", if partition.is_some() { "seed" } else { "singleton" });
            let labels = partition.map_or_else(|| (0..network.nodes()).collect(), |p| p.to_vec());
            let level = Level {
                labels,
                modularity: 0.0,
                sweeps: 0,
                moves: 0,
            };
            return Ok(Dendrogram::new(vec![level], None));
        }

        let seed = partition.map(SimpleClustering::new_from_labels);
        let base = match &seed {
            Some(seed) => Cow::Owned(network.create_reduced_network(seed)),
            None => Cow::Borrowed(network),
        };

        let max_levels = match self.config.levels {
            LevelPolicy::SingleRound => Some(1),
            LevelPolicy::Multilevel { max_levels } => max_levels,
        };

        let mut levels = Vec::new();
        let mut coarse: Option<Network> = None;

        loop {
            let level = levels.len();
            let current: &Network = coarse.as_ref().unwrap_or(&*base);

            let degrees = WeightedDegreeIndex::new(current);
            let mut index = CommunityIndex::singletons(&degrees);
            let stats = self.local_moving.iterate(current, &degrees, &mut index, level)?;

            // A coarse level where nothing moves repeats the previous one.
            if stats.moves == 0 && level > 0 {
                break;
            }

            let clustering = index.to_clustering();
            let modularity = par_modularity(current, &clustering);
            if self.config.verbose {
                info!(
                    "level {level}: {} nodes -> {} communities, {} moves in {} sweeps, Q = {modularity:.6}",
                    current.nodes(),
                    clustering.num_clusters(),
                    stats.moves,
                    stats.sweeps
                );
            } else {
                debug!("level {level}: {} communities, Q = {modularity:.6}", clustering.num_clusters());
            }

            let labels = match (&seed, level) {
                (Some(seed), 0) => seed.labels().iter().map(|&s| clustering.get(s)).collect(),
                _ => clustering.labels().to_vec(),
            };
            levels.push(Level {
                labels,
                modularity,
                sweeps: stats.sweeps,
                moves: stats.moves,
            });

            if stats.moves == 0 {
                break;
            }

            let reduced = current.create_reduced_network(&clustering);
            check_conservation(current, &reduced, level);
            let shrunk = reduced.nodes() < current.nodes();
            coarse = Some(reduced);

            if !shrunk || max_levels.is_some_and(|max| levels.len() >= max) {
                break;
            }
        }

        Ok(Dendrogram::new(levels, coarse))
    }
}

impl Default for Louvain {
    fn default() -> Self {
        Louvain::new(LouvainConfig::default())
    }
}

fn check_partition(nodes: usize, partition: Option<&[usize]>) -> Result<()> {
    match partition {
        Some(p) if p.len() != nodes => Err(LouvainError::PartitionSizeMismatch {
            expected: nodes,
            found: p.len(),
        }),
        _ => Ok(()),
    }
}

fn check_weights(network: &Network) -> Result<()> {
    match network.edge_list().find(|&(_, _, w)| !(w.is_finite() && w >= 0.0)) {
        Some((source, target, weight)) => Err(LouvainError::InvalidEdgeWeight { source, target, weight }),
        None => Ok(()),
    }
}

fn check_conservation(fine: &Network, coarse: &Network, level: usize) {
    let before = fine.get_total_edge_weight_par();
    let after = coarse.get_total_edge_weight_par();
    if (before - after).abs() > 1e-9 * before.abs().max(1.0) {
        warn!("aggregation of level {level} changed total edge weight from {before} to {after}");
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn config_validation() {
        assert!(LouvainConfig::default().validate().is_ok());
        for threshold in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = LouvainConfig::default().with_threshold(threshold).validate().unwrap_err();
            assert!(matches!(err, LouvainError::InvalidParameter { name: "threshold", .. }));
        }
        assert!(LouvainConfig::default().with_max_sweeps(0).validate().is_err());
        assert!(LouvainConfig::default()
            .with_levels(LevelPolicy::Multilevel { max_levels: Some(0) })
            .validate()
            .is_err());
    }

    #[test]
    fn partition_length_is_checked() {
        let n = Network::from_edges(3, vec![(0, 1, 1.0)]);
        let err = Louvain::default().run_network(&n, Some(&[0, 1][..])).unwrap_err();
        assert_eq!(err, LouvainError::PartitionSizeMismatch { expected: 3, found: 2 });
    }

    #[test]
    fn edge_weights_are_checked() {
        let n = Network::from_edges(3, vec![(0, 1, -5.0), (1, 2, 1.0), (2, 0, 1.0)]);
        let err = Louvain::default().run_network(&n, None).unwrap_err();
        assert_eq!(
            err,
            LouvainError::InvalidEdgeWeight {
                source: 0,
                target: 1,
                weight: -5.0
            }
        );

        let n = Network::from_edges(3, vec![(0, 1, 1.0), (1, 2, f64::NAN)]);
        let err = Louvain::default().run_network(&n, None).unwrap_err();
        assert!(matches!(err, LouvainError::InvalidEdgeWeight { source: 1, target: 2, weight } if weight.is_nan()));

        let n = Network::from_edges(2, vec![(0, 1, f64::INFINITY)]);
        assert!(Louvain::default().run_network(&n, Some(&[0, 1][..])).is_err());
    }
}
