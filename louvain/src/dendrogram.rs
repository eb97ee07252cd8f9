use crate::Network;

/// One level of the dendrogram.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    /// Community of each node of this level. Level 0 is indexed by original vertex id, each later
    /// level by the community ids of the level before it.
    pub labels: Vec<usize>,
    /// Modularity of the partition. Equal to the modularity of the composed partition on the original graph.
    pub modularity: f64,
    /// Number of local moving sweeps run on this level.
    pub sweeps: usize,
    /// Number of vertex moves applied on this level.
    pub moves: usize,
}

/// Ordered partitions from finest to coarsest, and the coarse network built from the last one.
#[derive(Clone, Debug)]
pub struct Dendrogram {
    levels: Vec<Level>,
    coarse: Option<Network>,
}

impl Dendrogram {
    pub(crate) fn new(levels: Vec<Level>, coarse: Option<Network>) -> Dendrogram {
        assert!(!levels.is_empty());
        Dendrogram { levels, coarse }
    }

    /// All levels, finest first.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Number of levels. Always at least one.
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// The network whose nodes are the communities of the last level, if any aggregation happened.
    /// Node `c` carries the number of original vertices in community `c` as its size.
    pub fn coarse_network(&self) -> Option<&Network> {
        self.coarse.as_ref()
    }

    /// Partition of the original vertices at `level`, composing the labels of levels `0..=level`.
    pub fn partition_at(&self, level: usize) -> Option<Vec<usize>> {
        let (first, rest) = self.levels.get(..=level)?.split_first()?;
        let mut labels = first.labels.clone();
        for l in rest {
            for label in labels.iter_mut() {
                *label = l.labels[*label];
            }
        }
        Some(labels)
    }

    /// Partition of the original vertices at the coarsest level.
    pub fn final_partition(&self) -> Vec<usize> {
        self.partition_at(self.levels.len() - 1).unwrap_or_default()
    }

    /// Modularity reached at the coarsest level.
    pub fn modularity(&self) -> f64 {
        self.levels.last().map_or(0.0, |l| l.modularity)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn level(labels: Vec<usize>) -> Level {
        Level {
            labels,
            modularity: 0.0,
            sweeps: 1,
            moves: 1,
        }
    }

    #[test]
    fn composes_levels() {
        let d = Dendrogram::new(
            vec![level(vec![0, 0, 1, 2, 2, 3]), level(vec![0, 0, 1, 1]), level(vec![0, 0])],
            None,
        );
        assert_eq!(d.partition_at(0).unwrap(), vec![0, 0, 1, 2, 2, 3]);
        assert_eq!(d.partition_at(1).unwrap(), vec![0, 0, 0, 1, 1, 1]);
        assert_eq!(d.final_partition(), vec![0; 6]);
        assert!(d.partition_at(3).is_none());
    }
}
