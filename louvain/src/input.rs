use crate::error::{LouvainError, Result};
use crate::Network;
use petgraph::graph::IndexType;
use petgraph::visit::EdgeRef;
use petgraph::EdgeType;

/// The view of an external graph that Louvain consumes.
pub trait InputGraph {
    /// Value attached to each edge, mapped to a weight by the caller.
    type EdgeWeight;

    /// Whether the graph is directed. Directed graphs are rejected.
    fn is_directed(&self) -> bool;

    /// Number of vertices. Vertex ids are `0..node_count()`.
    fn node_count(&self) -> usize;

    /// Number of edges, self-loops included.
    fn edge_count(&self) -> usize;

    /// Call `f(source, target, value)` once per edge.
    fn for_each_edge<F: FnMut(usize, usize, &Self::EdgeWeight)>(&self, f: F);
}

impl<N, E, Ty, Ix> InputGraph for petgraph::Graph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    type EdgeWeight = E;

    fn is_directed(&self) -> bool {
        petgraph::Graph::is_directed(self)
    }

    fn node_count(&self) -> usize {
        petgraph::Graph::node_count(self)
    }

    fn edge_count(&self) -> usize {
        petgraph::Graph::edge_count(self)
    }

    fn for_each_edge<F: FnMut(usize, usize, &Self::EdgeWeight)>(&self, mut f: F) {
        for e in self.edge_references() {
            f(e.source().index(), e.target().index(), e.weight());
        }
    }
}

impl InputGraph for Network {
    type EdgeWeight = f64;

    fn is_directed(&self) -> bool {
        false
    }

    fn node_count(&self) -> usize {
        self.nodes()
    }

    fn edge_count(&self) -> usize {
        Network::edge_count(self)
    }

    fn for_each_edge<F: FnMut(usize, usize, &Self::EdgeWeight)>(&self, mut f: F) {
        for (source, target, weight) in self.edge_list() {
            f(source, target, &weight);
        }
    }
}

impl Network {
    /// Copy an external graph into a network of unit-size nodes. Without `weight` every edge weighs 1.
    /// Fails if a weight is negative or not finite, or if the vertices do not fit `u32` ids.
    pub fn from_input<G: InputGraph + ?Sized>(
        graph: &G,
        weight: Option<&dyn Fn(&G::EdgeWeight) -> f64>,
    ) -> Result<Network> {
        let nodes = graph.node_count();
        if u32::try_from(nodes).is_err() {
            return Err(LouvainError::GraphTooLarge { nodes });
        }

        let mut edges = Vec::with_capacity(graph.edge_count());
        let mut invalid = None;

        graph.for_each_edge(|source, target, value| {
            let w = weight.map_or(1.0, |f| f(value));
            if !(w.is_finite() && w >= 0.0) {
                invalid.get_or_insert(LouvainError::InvalidEdgeWeight {
                    source,
                    target,
                    weight: w,
                });
            }
            // ids are below `nodes`, which fits u32
            edges.push((source as u32, target as u32, w));
        });

        match invalid {
            Some(err) => Err(err),
            None => Ok(Network::from_edges(nodes, edges)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use petgraph::graph::{DiGraph, UnGraph};

    #[test]
    fn petgraph_edges_default_to_unit_weight() {
        let mut g = UnGraph::<(), &str>::new_undirected();
        let a = g.add_node(());
        let b = g.add_node(());
        let c = g.add_node(());
        g.add_edge(a, b, "x");
        g.add_edge(b, c, "y");
        g.add_edge(c, c, "z");

        let n = Network::from_input(&g, None).unwrap();
        assert_eq!(n.nodes(), 3);
        assert_eq!(n.edge_list().collect::<Vec<_>>(), vec![(0, 1, 1.0), (1, 2, 1.0), (2, 2, 1.0)]);
    }

    #[test]
    fn weights_are_mapped_and_checked() {
        let mut g = UnGraph::<(), f64>::new_undirected();
        let a = g.add_node(());
        let b = g.add_node(());
        g.add_edge(a, b, 2.5);

        let weight: &dyn Fn(&f64) -> f64 = &|w| *w;
        let n = Network::from_input(&g, Some(weight)).unwrap();
        assert_eq!(n.get_total_edge_weight(), 2.5);

        g.add_edge(b, a, -1.0);
        let err = Network::from_input(&g, Some(weight)).unwrap_err();
        assert_eq!(
            err,
            LouvainError::InvalidEdgeWeight {
                source: 1,
                target: 0,
                weight: -1.0
            }
        );
    }

    struct Oversized;

    impl InputGraph for Oversized {
        type EdgeWeight = ();

        fn is_directed(&self) -> bool {
            false
        }

        fn node_count(&self) -> usize {
            usize::MAX
        }

        fn edge_count(&self) -> usize {
            0
        }

        fn for_each_edge<F: FnMut(usize, usize, &Self::EdgeWeight)>(&self, _f: F) {}
    }

    #[test]
    fn vertex_count_must_fit_node_ids() {
        let err = Network::from_input(&Oversized, None).unwrap_err();
        assert_eq!(err, LouvainError::GraphTooLarge { nodes: usize::MAX });
    }

    #[test]
    fn directedness_is_reported() {
        let g = DiGraph::<(), ()>::new();
        assert!(InputGraph::is_directed(&g));
        let n = Network::new();
        assert!(!InputGraph::is_directed(&n));
    }
}
