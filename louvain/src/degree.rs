use crate::Network;

/// Weighted degree of every node of one level, with self-loops counted twice.
///
/// Built once per level and read-only afterwards. The sum of all degrees is `m`, twice the total
/// edge weight of the level.
#[derive(Clone, Debug, Default)]
pub struct WeightedDegreeIndex {
    degrees: Vec<f64>,
    total: f64,
}

impl WeightedDegreeIndex {
    /// Tabulate the weighted degree of each node of `n`.
    pub fn new(n: &Network) -> WeightedDegreeIndex {
        let mut degrees = Vec::with_capacity(n.nodes());

        for node in 0..n.nodes() {
            let degree = n
                .neighbors(node)
                .map(|(target, w)| if target == node { 2.0 * w } else { w })
                .sum::<f64>();
            degrees.push(degree);
        }

        let total = degrees.iter().sum();
        WeightedDegreeIndex { degrees, total }
    }

    /// Weighted degree of `node`.
    pub fn degree(&self, node: usize) -> f64 {
        self.degrees[node]
    }

    /// Sum of all weighted degrees, `m`.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// All degrees, indexed by node.
    pub fn as_slice(&self) -> &[f64] {
        &self.degrees
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn self_loops_count_twice() {
        let n = Network::from_edges(3, vec![(0, 1, 1.5), (1, 1, 2.0), (1, 2, 1.0)]);
        let d = WeightedDegreeIndex::new(&n);

        assert_eq!(d.as_slice(), &[1.5, 6.5, 1.0]);
        assert_relative_eq!(d.total(), 2.0 * n.get_total_edge_weight());
    }

    #[test]
    fn isolated_nodes_have_zero_degree() {
        let n = Network::from_edges(2, vec![]);
        let d = WeightedDegreeIndex::new(&n);
        assert_eq!(d.degree(0), 0.0);
        assert_eq!(d.total(), 0.0);
    }
}
