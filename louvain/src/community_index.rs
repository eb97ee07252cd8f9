use crate::{Clustering, SimpleClustering, WeightedDegreeIndex};

/// The partition of one level, kept as paired forward (vertex to community) and backward
/// (community to sorted members) maps, together with the degree sum of every community.
///
/// Community ids index a fixed arena sized at construction. Moves only ever target communities
/// that currently have members, so ids that empty out during a level are left vacant and are
/// compacted away by [`CommunityIndex::to_clustering`].
#[derive(Clone, Debug)]
pub struct CommunityIndex {
    community_of: Vec<usize>,
    members: Vec<Vec<usize>>,
    degree_sums: Vec<f64>,
    non_empty: usize,
}

impl CommunityIndex {
    /// Seed the index from a clustering with dense labels.
    pub fn new(clustering: &impl Clustering, degrees: &WeightedDegreeIndex) -> CommunityIndex {
        let num_clusters = clustering.num_clusters();
        let mut community_of = Vec::with_capacity(clustering.nodes());
        let mut members = vec![Vec::new(); num_clusters];
        let mut degree_sums = vec![0.0; num_clusters];

        // ascending vertex order keeps every member list sorted
        for node in 0..clustering.nodes() {
            let c = clustering.get(node);
            community_of.push(c);
            members[c].push(node);
            degree_sums[c] += degrees.degree(node);
        }

        let non_empty = members.iter().filter(|m| !m.is_empty()).count();

        CommunityIndex {
            community_of,
            members,
            degree_sums,
            non_empty,
        }
    }

    /// Every vertex in its own community, community id equal to vertex id.
    pub fn singletons(degrees: &WeightedDegreeIndex) -> CommunityIndex {
        let nodes = degrees.as_slice().len();
        CommunityIndex {
            community_of: (0..nodes).collect(),
            members: (0..nodes).map(|v| vec![v]).collect(),
            degree_sums: degrees.as_slice().to_vec(),
            non_empty: nodes,
        }
    }

    /// Community currently holding `node`.
    #[inline]
    pub fn community_of(&self, node: usize) -> usize {
        self.community_of[node]
    }

    /// Members of community `c` in ascending order. Empty for vacated ids.
    pub fn members_of(&self, c: usize) -> &[usize] {
        &self.members[c]
    }

    /// Sum of the weighted degrees of the members of `c`.
    #[inline]
    pub fn degree_sum(&self, c: usize) -> f64 {
        self.degree_sums[c]
    }

    /// Number of vertices.
    pub fn nodes(&self) -> usize {
        self.community_of.len()
    }

    /// Size of the community id arena.
    pub fn capacity(&self) -> usize {
        self.members.len()
    }

    /// Number of communities with at least one member.
    pub fn num_communities(&self) -> usize {
        self.non_empty
    }

    /// Move `node`, of weighted degree `degree`, from community `from` to community `to`,
    /// updating both directions of the mapping and the degree sums together.
    pub fn move_node(&mut self, node: usize, from: usize, to: usize, degree: f64) {
        debug_assert_eq!(self.community_of[node], from);
        if from == to {
            return;
        }

        if let Ok(pos) = self.members[from].binary_search(&node) {
            self.members[from].remove(pos);
        }
        if let Err(pos) = self.members[to].binary_search(&node) {
            self.members[to].insert(pos, node);
        }
        self.community_of[node] = to;

        if self.members[to].len() == 1 {
            self.non_empty += 1;
        }
        if self.members[from].is_empty() {
            self.non_empty -= 1;
            // drop accumulated rounding so a vacant id reads as exactly zero
            self.degree_sums[from] = 0.0;
        } else {
            self.degree_sums[from] -= degree;
        }
        self.degree_sums[to] += degree;
    }

    /// Freeze the partition into a clustering with dense labels, preserving the relative order of ids.
    pub fn to_clustering(&self) -> SimpleClustering {
        SimpleClustering::new_from_labels(&self.community_of)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Network;

    fn consistent(index: &CommunityIndex) -> bool {
        let mut seen = 0;
        for c in 0..index.capacity() {
            for &v in index.members_of(c) {
                if index.community_of(v) != c {
                    return false;
                }
                seen += 1;
            }
        }
        seen == index.nodes()
    }

    #[test]
    fn moves_keep_both_directions_consistent() {
        let n = Network::from_edges(4, vec![(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]);
        let degrees = WeightedDegreeIndex::new(&n);
        let mut index = CommunityIndex::singletons(&degrees);
        assert_eq!(index.num_communities(), 4);

        index.move_node(0, 0, 1, degrees.degree(0));
        index.move_node(3, 3, 1, degrees.degree(3));
        assert!(consistent(&index));
        assert_eq!(index.members_of(1), &[0, 1, 3]);
        assert!(index.members_of(0).is_empty());
        assert_eq!(index.num_communities(), 2);
        assert_eq!(index.degree_sum(1), 4.0);
        assert_eq!(index.degree_sum(0), 0.0);

        index.move_node(1, 1, 2, degrees.degree(1));
        assert!(consistent(&index));
        assert_eq!(index.members_of(2), &[1, 2]);
        assert_eq!(index.to_clustering().labels(), &[0, 1, 1, 0]);
    }

    #[test]
    fn seeded_from_clustering() {
        let n = Network::from_edges(3, vec![(0, 1, 2.0), (1, 2, 1.0)]);
        let degrees = WeightedDegreeIndex::new(&n);
        let c = SimpleClustering::new_from_labels(&[4, 4, 9]);
        let index = CommunityIndex::new(&c, &degrees);

        assert!(consistent(&index));
        assert_eq!(index.num_communities(), 2);
        assert_eq!(index.members_of(0), &[0, 1]);
        assert_eq!(index.degree_sum(0), 5.0);
        assert_eq!(index.degree_sum(1), 1.0);
    }
}
