/*!
# Matching Algorithms

This module provides an algorithm for computing **maximum bipartite
matchings**.

A *matching* is a set of edges without shared endpoints; a **maximum
matching** is the largest possible matching. The matcher works on an
implicit bipartition: `left_count` left vertices and `right_count` right
vertices, both 0-indexed within their side, with edges always oriented from
left to right. This avoids materializing the doubled vertex set that the
derived bipartite graph of the Liu construction would otherwise need.
*/

use std::collections::VecDeque;

use super::*;

/// Maximum bipartite matching via the Hopcroft-Karp algorithm.
///
/// Runs in `O(m * sqrt(n))`: each phase finds a maximal set of shortest
/// vertex-disjoint augmenting paths with one BFS layering followed by DFS
/// augmentation, and `O(sqrt(n))` phases suffice.
///
/// # Examples
/// ```
/// use ctrlgraphs::algo::BipartiteMatcher;
///
/// let mut matcher = BipartiteMatcher::new(2, 2);
/// matcher.add_edge(0, 0);
/// matcher.add_edge(0, 1);
/// matcher.add_edge(1, 0);
///
/// let matching = matcher.compute();
/// assert_eq!(matching.size(), 2);
/// assert_eq!(matching.pair_of_left(1), 0);
/// ```
pub struct BipartiteMatcher {
    adj: Vec<Vec<Node>>,
    right_count: NumNodes,
}

/// Result of a bipartite matching computation. Unmatched vertices map to
/// [`INVALID_NODE`].
pub struct BipartiteMatching {
    pair_of_left: Vec<Node>,
    pair_of_right: Vec<Node>,
    size: NumNodes,
}

impl BipartiteMatching {
    /// Returns the right partner of a left vertex, or [`INVALID_NODE`].
    pub fn pair_of_left(&self, l: Node) -> Node {
        self.pair_of_left[l as usize]
    }

    /// Returns the left partner of a right vertex, or [`INVALID_NODE`].
    pub fn pair_of_right(&self, r: Node) -> Node {
        self.pair_of_right[r as usize]
    }

    /// Returns the number of matched pairs.
    pub fn size(&self) -> NumNodes {
        self.size
    }
}

const UNREACHED: NumNodes = NumNodes::MAX;

impl BipartiteMatcher {
    /// Creates a matcher for `left_count` left and `right_count` right
    /// vertices and no edges.
    pub fn new(left_count: NumNodes, right_count: NumNodes) -> Self {
        Self {
            adj: vec![Vec::new(); left_count as usize],
            right_count,
        }
    }

    /// Adds the edge `{l, r}`. Parallel edges are allowed and harmless.
    ///
    /// **Panics if `l >= left_count`.**
    pub fn add_edge(&mut self, l: Node, r: Node) {
        debug_assert!(r < self.right_count);
        self.adj[l as usize].push(r);
    }

    /// Computes a maximum matching.
    pub fn compute(&self) -> BipartiteMatching {
        let left_count = self.adj.len();

        let mut pair_of_left = vec![INVALID_NODE; left_count];
        let mut pair_of_right = vec![INVALID_NODE; self.right_count as usize];
        let mut dist = vec![UNREACHED; left_count];
        let mut size = 0;

        while self.layer(&pair_of_left, &pair_of_right, &mut dist) {
            for l in 0..left_count as Node {
                if pair_of_left[l as usize] == INVALID_NODE
                    && self.augment(l, &mut pair_of_left, &mut pair_of_right, &mut dist)
                {
                    size += 1;
                }
            }
        }

        BipartiteMatching {
            pair_of_left,
            pair_of_right,
            size,
        }
    }

    /// BFS phase: assigns layer depths to left vertices, starting from the
    /// unmatched ones. Returns *true* iff some augmenting path exists.
    fn layer(
        &self,
        pair_of_left: &[Node],
        pair_of_right: &[Node],
        dist: &mut [NumNodes],
    ) -> bool {
        let mut queue = VecDeque::new();

        for (l, &r) in pair_of_left.iter().enumerate() {
            if r == INVALID_NODE {
                dist[l] = 0;
                queue.push_back(l as Node);
            } else {
                dist[l] = UNREACHED;
            }
        }

        let mut found = false;
        while let Some(l) = queue.pop_front() {
            for &r in &self.adj[l as usize] {
                let l2 = pair_of_right[r as usize];
                if l2 == INVALID_NODE {
                    found = true;
                } else if dist[l2 as usize] == UNREACHED {
                    dist[l2 as usize] = dist[l as usize] + 1;
                    queue.push_back(l2);
                }
            }
        }

        found
    }

    /// DFS phase: tries to augment along a shortest path starting at the
    /// unmatched left vertex `l`.
    fn augment(
        &self,
        l: Node,
        pair_of_left: &mut [Node],
        pair_of_right: &mut [Node],
        dist: &mut [NumNodes],
    ) -> bool {
        for &r in &self.adj[l as usize] {
            let l2 = pair_of_right[r as usize];
            if l2 == INVALID_NODE
                || (dist[l2 as usize] == dist[l as usize] + 1
                    && self.augment(l2, pair_of_left, pair_of_right, dist))
            {
                pair_of_left[l as usize] = r;
                pair_of_right[r as usize] = l;
                return true;
            }
        }

        dist[l as usize] = UNREACHED;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds the matcher for the bipartite representation of a directed
    /// graph: left = tails, right = heads.
    fn matcher_of_digraph(graph: &DiGraph) -> BipartiteMatcher {
        let n = graph.number_of_nodes();
        let mut matcher = BipartiteMatcher::new(n, n);
        for Edge(u, v) in graph.edges() {
            matcher.add_edge(u, v);
        }
        matcher
    }

    #[test]
    fn path_graph_is_perfectly_matched_except_head() {
        let graph = DiGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let matching = matcher_of_digraph(&graph).compute();

        assert_eq!(matching.size(), 3);
        assert_eq!(matching.pair_of_right(0), INVALID_NODE);
        for v in 1..4 {
            assert_eq!(matching.pair_of_right(v), v - 1);
        }
    }

    #[test]
    fn cycle_is_perfectly_matched() {
        let graph = DiGraph::from_edges(3, [(0, 1), (1, 2), (2, 0)]);
        let matching = matcher_of_digraph(&graph).compute();

        assert_eq!(matching.size(), 3);
        for v in 0..3 {
            assert_eq!(matching.pair_of_right(v), (v + 2) % 3);
        }
    }

    #[test]
    fn star_matches_single_leaf() {
        let graph = DiGraph::from_edges(4, [(0, 1), (0, 2), (0, 3)]);
        let matching = matcher_of_digraph(&graph).compute();

        assert_eq!(matching.size(), 1);
        assert_eq!(matching.pair_of_left(0), 1);
    }

    #[test]
    fn self_loop_is_matchable() {
        let graph = DiGraph::from_edges(1, [(0, 0)]);
        let matching = matcher_of_digraph(&graph).compute();

        assert_eq!(matching.size(), 1);
        assert_eq!(matching.pair_of_left(0), 0);
    }

    #[test]
    fn augmenting_paths_are_found() {
        // Greedy left-to-right matching of 0 would block 1; the matcher must
        // reroute through an augmenting path.
        let mut matcher = BipartiteMatcher::new(2, 2);
        matcher.add_edge(0, 0);
        matcher.add_edge(0, 1);
        matcher.add_edge(1, 0);

        let matching = matcher.compute();
        assert_eq!(matching.size(), 2);
        assert_eq!(matching.pair_of_left(0), 1);
        assert_eq!(matching.pair_of_left(1), 0);
    }
}
