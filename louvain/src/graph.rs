use num_traits::cast::AsPrimitive;
use num_traits::identities::{One, Zero};
use std::iter::{repeat, FlatMap, Repeat, Zip};
use std::ops::AddAssign;
use std::slice::Iter;

/// Integer type used for node ids.
pub trait IndexTrait: AddAssign + AsPrimitive<usize> + Copy + One + PartialEq + PartialOrd + Zero {}

impl IndexTrait for u32 {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd)]
pub struct Index<Ix>(Ix)
where
    Ix: IndexTrait;

impl<Ix> Index<Ix>
where
    Ix: IndexTrait,
{
    pub fn as_usize(&self) -> usize {
        self.0.as_()
    }
}

impl<Ix> From<Ix> for Index<Ix>
where
    Ix: IndexTrait,
{
    fn from(ix: Ix) -> Self {
        Index(ix)
    }
}

/// An edge as seen from its `source` endpoint.
#[derive(Copy, Clone, Debug)]
pub struct Edge<W, NodeIx>
where
    W: Clone,
    NodeIx: IndexTrait,
{
    source: Index<NodeIx>,
    target: Index<NodeIx>,
    weight: W,
}

impl<W, NodeIx> Edge<W, NodeIx>
where
    W: Clone,
    NodeIx: IndexTrait,
{
    pub fn source(&self) -> Index<NodeIx> {
        self.source
    }
    pub fn target(&self) -> Index<NodeIx> {
        self.target
    }
    pub fn weight(&self) -> W {
        self.weight.clone()
    }
}

/// Half of an undirected edge, stored in the adjacency list of one endpoint.
#[derive(Copy, Clone, Debug)]
pub struct DiEdge<W, NodeIx>
where
    W: Clone,
    NodeIx: IndexTrait,
{
    target: Index<NodeIx>,
    pub(crate) weight: W,
}

impl<W, NodeIx> DiEdge<W, NodeIx>
where
    W: Clone,
    NodeIx: IndexTrait,
{
    pub fn target(&self) -> Index<NodeIx> {
        self.target
    }
}

pub struct Edges<'a, W, NodeIx>
where
    W: Clone,
    NodeIx: IndexTrait,
{
    source: Index<NodeIx>,
    iter: Iter<'a, DiEdge<W, NodeIx>>,
}

impl<'a, W, NodeIx> Iterator for Edges<'a, W, NodeIx>
where
    W: Clone,
    NodeIx: IndexTrait,
{
    type Item = Edge<&'a W, NodeIx>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|DiEdge { target, weight }| Edge {
            source: self.source,
            target: *target,
            weight,
        })
    }
}

fn edge_refs_mapper<W, NodeIx>(
    (src, edges): (Index<NodeIx>, &Vec<DiEdge<W, NodeIx>>),
) -> Zip<Repeat<Index<NodeIx>>, Iter<'_, DiEdge<W, NodeIx>>>
where
    W: Clone,
    NodeIx: IndexTrait,
{
    repeat(src).zip(edges.iter())
}

type EdgeRefsMapper<W, NodeIx> =
    for<'b> fn((Index<NodeIx>, &'b Vec<DiEdge<W, NodeIx>>)) -> Zip<Repeat<Index<NodeIx>>, Iter<'b, DiEdge<W, NodeIx>>>;
type IndexEdgeMapInput<'a, W, NodeIx> = Zip<Repeat<Index<NodeIx>>, Iter<'a, DiEdge<W, NodeIx>>>;
type IndexEdgeMapOutput<'a, W, NodeIx> = Zip<NodeIndices<NodeIx>, Iter<'a, Vec<DiEdge<W, NodeIx>>>>;

/// Every undirected edge exactly once, with `source <= target`.
pub struct EdgeReferences<'a, W, NodeIx>
where
    W: Clone,
    NodeIx: IndexTrait,
{
    iter: FlatMap<IndexEdgeMapOutput<'a, W, NodeIx>, IndexEdgeMapInput<'a, W, NodeIx>, EdgeRefsMapper<W, NodeIx>>,
}

impl<'a, W, NodeIx> Iterator for EdgeReferences<'a, W, NodeIx>
where
    W: Clone,
    NodeIx: IndexTrait,
{
    type Item = Edge<&'a W, NodeIx>;

    fn next(&mut self) -> Option<Self::Item> {
        for (source, DiEdge { target, weight }) in self.iter.by_ref() {
            // self-loops are stored once, so `>=` yields them once as well
            if target.0 >= source.0 {
                return Some(Edge {
                    source,
                    target: *target,
                    weight,
                });
            }
        }
        None
    }
}

pub struct NodeIndices<Ix>
where
    Ix: IndexTrait,
{
    start: Ix,
    end: Ix,
}

impl<Ix> Iterator for NodeIndices<Ix>
where
    Ix: IndexTrait,
{
    type Item = Index<Ix>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start < self.end {
            let ix = self.start;
            self.start += Ix::one();
            Some(Index(ix))
        } else {
            None
        }
    }
}

/// Adjacency-list undirected graph. Each simple edge appears in the lists of both endpoints;
/// a self-loop appears once in the list of its vertex.
#[derive(Clone, Debug)]
pub struct UnGraph<NodeW, EdgeW, NodeIx>
where
    EdgeW: Clone,
    NodeIx: IndexTrait,
{
    pub(crate) edges: Vec<Vec<DiEdge<EdgeW, NodeIx>>>,
    node_weights: Vec<NodeW>,
    total_edges: usize,
    total_nodes: NodeIx,
}

impl<NodeW, EdgeW, NodeIx> UnGraph<NodeW, EdgeW, NodeIx>
where
    EdgeW: Clone,
    NodeIx: IndexTrait,
{
    pub fn add_edge(&mut self, source: Index<NodeIx>, target: Index<NodeIx>, weight: EdgeW) {
        if source != target {
            self.edges[target.0.as_()].push(DiEdge {
                target: source,
                weight: weight.clone(),
            });
        }
        self.edges[source.0.as_()].push(DiEdge { target, weight });
        self.total_edges += 1;
    }

    pub fn add_node(&mut self, weight: NodeW) -> Index<NodeIx> {
        let index = self.total_nodes;
        self.edges.push(vec![]);
        self.node_weights.push(weight);
        self.total_nodes += NodeIx::one();
        Index(index)
    }

    pub fn edge_count(&self) -> usize {
        self.total_edges
    }

    pub fn node_count(&self) -> NodeIx {
        self.total_nodes
    }

    pub fn node_weights(&self) -> &[NodeW] {
        &self.node_weights
    }

    pub fn edges(&self, source: Index<NodeIx>) -> Edges<'_, EdgeW, NodeIx> {
        Edges {
            source,
            iter: self.edges[source.0.as_()].iter(),
        }
    }

    pub fn node_indices(&self) -> NodeIndices<NodeIx> {
        NodeIndices {
            start: NodeIx::zero(),
            end: self.total_nodes,
        }
    }

    pub fn with_capacity(nodes: usize, _edges: usize) -> Self {
        UnGraph {
            edges: Vec::with_capacity(nodes),
            node_weights: Vec::with_capacity(nodes),
            total_edges: 0,
            total_nodes: NodeIx::zero(),
        }
    }

    pub fn edge_references(&self) -> EdgeReferences<'_, EdgeW, NodeIx> {
        let iter = self
            .node_indices()
            .zip(self.edges.iter())
            .flat_map(edge_refs_mapper as EdgeRefsMapper<EdgeW, NodeIx>);
        EdgeReferences { iter }
    }
}
