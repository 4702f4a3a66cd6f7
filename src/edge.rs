/*!
# Edge Representation

This module defines the representation of edges in directed graphs.

- An `Edge(u, v)` consists of a source node `u` and a target node `v`.
- Edges additionally carry an *index* in the graph representation; the index
  is simply the insertion order and is the unit of the per-edge outputs
  (edge classes, path annotations).
- Provides utilities for converting integers into edges (`from_u64` and
  `from_u64_no_loops`) for enumeration of all possible edges.
*/

use std::fmt::{Debug, Display};

use stream_bitset::bitset::BitSetImpl;

use crate::node::Node;

/// Represents a directed edge from node `u` to node `v`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(pub Node, pub Node);

/// Type alias representing the number of edges.
///
/// Limited to `u32` (maximum 2^32 - 1 edges).
pub type NumEdges = u32;

/// Bitset specialized for edge indices.
pub type EdgeBitSet = BitSetImpl<NumEdges>;

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

impl Debug for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl Edge {
    /// Returns the source node of the edge.
    #[inline(always)]
    pub fn source(&self) -> Node {
        self.0
    }

    /// Returns the target node of the edge.
    #[inline(always)]
    pub fn target(&self) -> Node {
        self.1
    }

    /// Returns `true` if the edge is a self-loop (`u == v`).
    #[inline(always)]
    pub fn is_loop(&self) -> bool {
        self.0 == self.1
    }

    /// Returns the edge with endpoints swapped (`Edge(v, u)`).
    #[inline(always)]
    pub fn reverse(&self) -> Self {
        Edge(self.1, self.0)
    }

    /// Maps a number `x` in `0..n^2` to a directed edge `(u, v)` of `n` nodes.
    ///
    /// # Panics
    /// Debug-asserts if `x >= n * n`.
    #[inline(always)]
    pub fn from_u64(x: u64, n: u64) -> Self {
        debug_assert!(x < n * n);

        let u = x / n;
        let v = x % n;
        Edge(u as Node, v as Node)
    }

    /// Maps a number `x` in `0..n*(n-1)` to a directed edge `(u, v)` with
    /// `u != v`. The enumeration skips the diagonal of the `n x n` edge
    /// space, which makes it suitable for sampling loop-free graphs.
    ///
    /// # Panics
    /// Debug-asserts if `x >= n * (n - 1)`.
    #[inline(always)]
    pub fn from_u64_no_loops(x: u64, n: u64) -> Self {
        debug_assert!(x < n * (n - 1));

        let u = x / (n - 1);
        let r = x % (n - 1);
        let v = r + (r >= u) as u64;
        Edge(u as Node, v as Node)
    }
}

impl From<(Node, Node)> for Edge {
    fn from(value: (Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&(Node, Node)> for Edge {
    fn from(value: &(Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&Edge> for Edge {
    fn from(value: &Edge) -> Self {
        *value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn from_u64_enumerates_all_edges() {
        let n = 7u64;
        let mut edges: Vec<Edge> = (0..n * n).map(|x| Edge::from_u64(x, n)).collect();
        edges.sort_unstable();
        edges.dedup();
        assert_eq!(edges.len(), (n * n) as usize);
    }

    #[test]
    fn from_u64_no_loops_skips_diagonal() {
        let n = 7u64;
        let edges = (0..n * (n - 1))
            .map(|x| Edge::from_u64_no_loops(x, n))
            .collect_vec();

        assert!(edges.iter().all(|e| !e.is_loop()));

        let mut dedup = edges.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), edges.len());
    }
}
