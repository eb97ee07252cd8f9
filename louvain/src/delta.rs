/// Modularity change from moving a vertex `x` out of its community `cur` and into a candidate community.
///
/// * `degree`: weighted degree of `x`.
/// * `d_cur`: edge weight from `x` to the other members of `cur`, self-loop excluded.
/// * `s_cur`: degree sum of `cur`, `x` included.
/// * `d_n`: edge weight from `x` to the members of the candidate, self-loop excluded.
/// * `s_n`: degree sum of the candidate.
/// * `m`: twice the total edge weight of the level. Must be non-zero.
///
/// With `s2 = s_cur - degree` (the degree sum of `cur` without `x`) this is
/// `2 * ((d_n - d_cur) - degree / m * (s_n - s2)) / m`, the exact change of
/// `Q = Σ_s (e_ss - a_s²)`. The self-loop of `x` and its own `degree² / m²` term stay with `x` and cancel.
#[inline]
pub fn delta_modularity(degree: f64, d_cur: f64, s_cur: f64, d_n: f64, s_n: f64, m: f64) -> f64 {
    debug_assert!(m > 0.0);
    2.0 * ((d_n - d_cur) - (degree / m) * (s_n - s_cur + degree)) / m
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::objective::modularity;
    use crate::{Clustering, Network, SimpleClustering};
    use approx::assert_relative_eq;

    #[test]
    fn merging_a_single_edge() {
        // two singletons joined by one unit edge: Q goes from -0.5 to 0
        assert_relative_eq!(delta_modularity(1.0, 0.0, 1.0, 1.0, 1.0, 2.0), 0.5);
    }

    #[test]
    fn matches_modularity_difference() {
        // 0-1-2 triangle, 2-3, 3-4, self-loop on 4
        let n = Network::from_edges(
            5,
            vec![(0, 1, 1.0), (1, 2, 2.0), (0, 2, 1.0), (2, 3, 0.5), (3, 4, 3.0), (4, 4, 1.0)],
        );
        let degrees = crate::WeightedDegreeIndex::new(&n);
        let m = degrees.total();

        let before = SimpleClustering::new_from_labels(&[0, 0, 1, 1, 1]);
        let mut after = before.clone();
        after.set(2, 0);

        // moving vertex 2 from {2, 3, 4} into {0, 1}
        let d_cur = 0.5;
        let s_cur = degrees.degree(2) + degrees.degree(3) + degrees.degree(4);
        let d_n = 1.0 + 2.0;
        let s_n = degrees.degree(0) + degrees.degree(1);
        let gain = delta_modularity(degrees.degree(2), d_cur, s_cur, d_n, s_n, m);

        assert_relative_eq!(gain, modularity(&n, &after) - modularity(&n, &before), epsilon = 1e-12);
    }
}
