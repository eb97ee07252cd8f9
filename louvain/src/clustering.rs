use itertools::Itertools;

/// Trait representing a partition of a set of vertices.
/// Each vertex is assigned a single integer community label.
pub trait Clustering: std::fmt::Debug {
    /// Initialize a fresh clustering with each vertex in its own community
    fn init_different_clusters(num_nodes: usize) -> Self;

    /// Initialize the clustering from arbitrary labels. Labels are relabelled densely,
    /// preserving their relative order.
    fn new_from_labels(labels: &[usize]) -> Self;

    /// List the vertices of each community, in ascending vertex order
    fn nodes_per_cluster(&self) -> Vec<Vec<usize>>;

    /// Get the label of vertex `i`
    fn get(&self, i: usize) -> usize;

    /// Set the label of vertex `i`. Note this must update the number of communities
    fn set(&mut self, i: usize, cluster: usize);

    /// Total number of vertices
    fn nodes(&self) -> usize;

    /// Number of community labels in use. Labels may be left unused after `set`.
    fn num_clusters(&self) -> usize;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// A basic Vec-backed implementation of `Clustering`
pub struct SimpleClustering {
    labels: Vec<usize>,
    num_clusters: usize,
}

impl SimpleClustering {
    /// Borrow the label vector
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }
}

impl Clustering for SimpleClustering {
    fn init_different_clusters(num_nodes: usize) -> Self {
        SimpleClustering {
            labels: (0..num_nodes).collect(),
            num_clusters: num_nodes,
        }
    }

    fn new_from_labels(input_labels: &[usize]) -> Self {
        // Labels may be sparse or huge, so map them through the sorted distinct set.
        let distinct: Vec<usize> = input_labels.iter().copied().sorted_unstable().dedup().collect();
        let labels = input_labels
            .iter()
            .map(|l| distinct.partition_point(|d| d < l))
            .collect();

        SimpleClustering {
            labels,
            num_clusters: distinct.len(),
        }
    }

    fn nodes_per_cluster(&self) -> Vec<Vec<usize>> {
        let mut cluster_lists = vec![Vec::new(); self.num_clusters()];

        for (node, label) in self.labels.iter().enumerate() {
            cluster_lists[*label].push(node)
        }

        cluster_lists
    }

    fn get(&self, node: usize) -> usize {
        self.labels[node]
    }

    fn set(&mut self, node: usize, label: usize) {
        self.labels[node] = label;
        if label >= self.num_clusters {
            self.num_clusters = label + 1;
        }
    }

    fn nodes(&self) -> usize {
        self.labels.len()
    }

    fn num_clusters(&self) -> usize {
        self.num_clusters
    }
}
