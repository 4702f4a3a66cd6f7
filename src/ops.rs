/*!
# Graph Operations

Core graph traits and operations.

This module defines the **fundamental traits** that graph representations
should implement. It covers:
- **Node and edge counts** ([`GraphNodeOrder`], [`GraphEdgeOrder`]).
- **Neighborhood access** ([`AdjacencyList`], [`DirectedAdjacencyList`]).
- **Edge-index access** ([`EdgeIndexedGraph`]).
- **Edge testing and editing** ([`AdjacencyTest`], [`GraphEdgeEditing`]).

The controllability solvers in [`crate::model`] are written against these
traits only, so they work with any backend that provides them.

# Examples
```
use ctrlgraphs::prelude::*;

let g = DiGraph::from_edges(3, [(0, 1), (1, 2), (2, 0)]);

assert_eq!(g.number_of_nodes(), 3);
assert_eq!(g.number_of_edges(), 3);
assert!(g.has_edge(0, 1));
assert!(!g.has_edge(1, 0));
```
*/

use std::ops::Range;

use crate::{edge::*, node::*};

/// Provides accessors related to the number of nodes.
///
/// Implemented by all graph representations.
pub trait GraphNodeOrder {
    /// Iterator over all nodes in the graph.
    type VertexIter<'a>: Iterator<Item = Node> + 'a
    where
        Self: 'a;

    /// Returns the number of nodes in the graph.
    fn number_of_nodes(&self) -> NumNodes;

    /// Returns an iterator over all nodes in the graph.
    fn vertices(&self) -> Self::VertexIter<'_>;

    /// Returns the number of nodes as a `usize`.
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns `true` if the graph has no nodes (and therefore no edges).
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a range of all nodes.
    ///
    /// Unlike `vertices()`, this does not borrow `self` and can be used
    /// where additional mutable references are needed.
    fn vertices_range(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }

    /// Returns an empty bitset with one entry per node.
    ///
    /// Useful for marking or filtering nodes.
    fn vertex_bitset_unset(&self) -> NodeBitSet {
        NodeBitSet::new(self.number_of_nodes())
    }
}

/// Provides accessors related to the number of edges.
pub trait GraphEdgeOrder {
    /// Returns the number of edges in the graph.
    fn number_of_edges(&self) -> NumEdges;

    /// Returns an empty bitset with one entry per edge.
    fn edge_bitset_unset(&self) -> EdgeBitSet {
        EdgeBitSet::new(self.number_of_edges())
    }

    /// Returns `true` if the graph has no edges.
    fn is_singleton_graph(&self) -> bool {
        self.number_of_edges() == 0
    }
}

/// Trait providing access to (out-)neighborhoods.
///
/// For directed graphs, `neighbors_of(u)` corresponds to outgoing neighbors.
pub trait AdjacencyList: GraphNodeOrder + Sized {
    /// Iterator over all neighbors of a vertex in the graph.
    type NeighborIter<'a>: Iterator<Item = Node> + 'a
    where
        Self: 'a;

    /// Returns an iterator over the out-neighbors of a given vertex.
    ///
    /// **Panics if `u >= n`.**
    fn neighbors_of(&self, u: Node) -> Self::NeighborIter<'_>;

    /// Returns the number of out-neighbors of a vertex, counting parallel
    /// edges separately.
    ///
    /// **Panics if `u >= n`.**
    fn degree_of(&self, u: Node) -> NumNodes;
}

/// Extends [`AdjacencyList`] with in-neighbor access for directed graphs.
///
/// Also aliases functions of [`AdjacencyList`] with `out`-versions
/// (aka. [`AdjacencyList::neighbors_of`] => [`DirectedAdjacencyList::out_neighbors_of`]).
pub trait DirectedAdjacencyList: AdjacencyList {
    /// Iterator over all incoming neighbors of a vertex in the graph.
    type InNeighborIter<'a>: Iterator<Item = Node> + 'a
    where
        Self: 'a;

    /// Returns an iterator over incoming neighbors of a vertex
    /// (`v` such that `(v, u)` exists).
    ///
    /// **Panics if `u >= n`.**
    fn in_neighbors_of(&self, u: Node) -> Self::InNeighborIter<'_>;

    /// Returns the number of incoming edges of vertex `u`.
    ///
    /// **Panics if `u >= n`.**
    fn in_degree_of(&self, u: Node) -> NumNodes;

    /// Returns an iterator over outgoing neighbors of a given vertex.
    /// Delegates to [`AdjacencyList::neighbors_of`].
    fn out_neighbors_of(&self, u: Node) -> Self::NeighborIter<'_> {
        self.neighbors_of(u)
    }

    /// Returns the out-degree of a given vertex.
    /// Delegates to [`AdjacencyList::degree_of`].
    fn out_degree_of(&self, u: Node) -> NumNodes {
        self.degree_of(u)
    }

    /// Returns the sum of in-degree and out-degree for vertex `u`.
    fn total_degree_of(&self, u: Node) -> NumNodes {
        self.out_degree_of(u) + self.in_degree_of(u)
    }

    /// Returns an iterator over out- and in-neighbors of a vertex, in that
    /// order. Vertices reachable via parallel edges appear multiple times.
    ///
    /// This is the neighborhood seen when the orientation of edges is
    /// ignored, e.g. by weakly-connected-component searches.
    fn all_neighbors_of(
        &self,
        u: Node,
    ) -> std::iter::Chain<Self::NeighborIter<'_>, Self::InNeighborIter<'_>> {
        self.neighbors_of(u).chain(self.in_neighbors_of(u))
    }
}

/// Trait for testing the existence of edges.
pub trait AdjacencyTest: GraphNodeOrder {
    /// Returns `true` if the edge `(u, v)` exists in the graph.
    ///
    /// **Panics if `u >= n || v >= n`.**
    fn has_edge(&self, u: Node, v: Node) -> bool;

    /// Returns `true` if a self-loop `(u, u)` exists at the given vertex.
    fn has_self_loop(&self, u: Node) -> bool {
        self.has_edge(u, u)
    }

    /// Returns `true` if any vertex in the graph has a self-loop.
    fn has_self_loops(&self) -> bool {
        self.vertices().any(|u| self.has_self_loop(u))
    }
}

/// Provides access to edges by their index.
///
/// Edge indices are assigned in insertion order and are stable for the
/// lifetime of the graph. All per-edge outputs of the solvers (edge classes,
/// path annotations) are reported in edge-index order.
pub trait EdgeIndexedGraph: GraphEdgeOrder {
    /// Iterator over all edges in edge-index order.
    type EdgeIter<'a>: Iterator<Item = Edge> + 'a
    where
        Self: 'a;

    /// Returns the edge with the given index.
    ///
    /// **Panics if `e >= m`.**
    fn edge(&self, e: NumEdges) -> Edge;

    /// Returns an iterator over all edges in edge-index order.
    fn edges(&self) -> Self::EdgeIter<'_>;

    /// Returns the index of an edge `u -> v`, or `None` if no such edge
    /// exists. If parallel edges exist, the one inserted first is returned.
    fn eid(&self, u: Node, v: Node) -> Option<NumEdges>;

    /// Returns the indices of all edges leaving `u`, in insertion order.
    ///
    /// **Panics if `u >= n`.**
    fn out_edges_of(&self, u: Node) -> &[NumEdges];

    /// Returns the indices of all edges entering `u`, in insertion order.
    ///
    /// **Panics if `u >= n`.**
    fn in_edges_of(&self, u: Node) -> &[NumEdges];
}

/// Trait for creating a new graph with a fixed number of nodes and no edges.
pub trait GraphNew {
    /// Creates a new graph with `n` nodes and no edges.
    fn new(n: NumNodes) -> Self;
}

/// Trait for adding edges to a graph.
pub trait GraphEdgeEditing {
    /// Adds the edge `(u, v)` to the graph. Parallel edges and self-loops
    /// are allowed.
    ///
    /// **Panics if `u >= n || v >= n`.**
    fn add_edge(&mut self, u: Node, v: Node);

    /// Adds all edges of the iterator to the graph.
    fn add_edges<E, I>(&mut self, edges: I)
    where
        E: Into<Edge>,
        I: IntoIterator<Item = E>,
    {
        for edge in edges {
            let Edge(u, v) = edge.into();
            self.add_edge(u, v);
        }
    }
}

/// Trait for creating a graph from a list of edges.
pub trait GraphFromScratch: GraphNew + GraphEdgeEditing + Sized {
    /// Creates a new graph with `n` nodes and the given edges.
    fn from_edges<E, I>(n: NumNodes, edges: I) -> Self
    where
        E: Into<Edge>,
        I: IntoIterator<Item = E>,
    {
        let mut graph = Self::new(n);
        graph.add_edges(edges);
        graph
    }
}

impl<G> GraphFromScratch for G where G: GraphNew + GraphEdgeEditing {}
