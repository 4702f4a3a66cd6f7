/*!
# Liu Controllability Model

Structural controllability under nodal dynamics, following Liu et al.
(Nature 473, 2011). The minimum driver-node set is obtained from a maximum
matching of the bipartite graph `B(G)`: split every vertex into a left copy
(as edge tail) and a right copy (as edge head); every edge `u -> v` of `G`
becomes `{u, v + n}` in `B(G)`. Vertices whose right copy stays unmatched
cannot be reached through a matched edge and must be driven directly.

The matched edges decompose the vertex set into *stems* (paths rooted at
driver nodes) and *buds* (cycles); a bud that has an in-neighbor on some
stem is attached there and then needs no input signal of its own.

The per-edge classification implements Régin's filtering argument for
all-different constraints (AAAI '94, Algorithm 2): an edge that is neither
reachable from an unmatched vertex in the oriented bipartite graph nor part
of an alternating cycle occurs in every maximum matching (if matched) or in
none (if unmatched).
*/

use std::collections::VecDeque;

use tracing::debug;

use crate::algo::{BipartiteMatcher, Connectivity};
use crate::errors::{ControllabilityError, Result};
use crate::model::matching::DirectedMatching;
use crate::model::paths::{Bud, ControlPath, Stem};
use crate::model::{ControllabilityModel, EdgeClass};
use crate::prelude::*;

/// Driver-node discovery and control-path reconstruction under the Liu
/// model.
///
/// # Examples
/// ```
/// use ctrlgraphs::prelude::*;
/// use ctrlgraphs::model::ControllabilityModel;
/// use ctrlgraphs::model::liu::LiuModel;
///
/// let g = DiGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
/// let mut model = LiuModel::new(&g);
/// model.calculate().unwrap();
///
/// assert_eq!(model.driver_nodes(), [0]);
/// assert_eq!(model.controllability(), 0.25);
/// ```
pub struct LiuModel<'a, G> {
    graph: &'a G,
    matching: DirectedMatching,
    driver_nodes: Vec<Node>,
    control_paths: Vec<ControlPath>,
    calculated: bool,
}

impl<'a, G> LiuModel<'a, G>
where
    G: DirectedAdjacencyList + EdgeIndexedGraph,
{
    /// Creates a model attached to the given graph, with no result yet.
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            matching: DirectedMatching::new(0),
            driver_nodes: Vec::new(),
            control_paths: Vec::new(),
            calculated: false,
        }
    }

    /// Returns a stateless duplicate attached to the same graph. Results
    /// are not copied.
    pub fn clone_detached(&self) -> Self {
        Self::new(self.graph)
    }

    /// Returns the matching backing the latest result.
    pub fn matching(&self) -> &DirectedMatching {
        &self.matching
    }

    /// Computes a maximum matching of `B(G)` and encodes it as a directed
    /// matching on the vertices of `G`.
    fn compute_matching(&self) -> DirectedMatching {
        let n = self.graph.number_of_nodes();

        let mut matcher = BipartiteMatcher::new(n, n);
        for Edge(u, v) in self.graph.edges() {
            matcher.add_edge(u, v);
        }
        let bipartite = matcher.compute();

        let mut matching = DirectedMatching::new(n);
        for v in self.graph.vertices() {
            let u = bipartite.pair_of_right(v);
            if u != INVALID_NODE {
                matching.set_match(u, v);
            }
        }
        matching
    }

    /// Builds the orientation of `B(G)` used by the edge classifier:
    /// a matched edge `u -> v` becomes the arc `v -> u + n`, an unmatched
    /// one the arc `u + n -> v`. Arc indices coincide with the edge indices
    /// of the underlying graph.
    fn oriented_bipartite_graph(&self) -> DiGraph {
        let n = self.graph.number_of_nodes();
        let mut bipartite = DiGraph::new(2 * n);

        for Edge(u, v) in self.graph.edges() {
            if self.matching.match_in(v) == u {
                bipartite.add_edge(v, u + n);
            } else {
                bipartite.add_edge(u + n, v);
            }
        }

        bipartite
    }

    /// Seeds for both reachability passes of the classifier: the left copy
    /// of every unmatched vertex and the right copy of every vertex that
    /// matches nothing.
    fn classifier_seeds(&self, seen: &mut NodeBitSet, queue: &mut VecDeque<Node>) {
        let n = self.graph.number_of_nodes();
        for w in self.graph.vertices() {
            if !self.matching.is_matched(w) {
                queue.push_back(w);
                seen.set_bit(w);
            }
            if !self.matching.is_matching(w) {
                queue.push_back(w + n);
                seen.set_bit(w + n);
            }
        }
    }
}

impl<'a, G> ControllabilityModel for LiuModel<'a, G>
where
    G: DirectedAdjacencyList + EdgeIndexedGraph,
{
    fn calculate(&mut self) -> Result<()> {
        let n = self.graph.number_of_nodes();

        self.matching = self.compute_matching();

        self.driver_nodes = self
            .graph
            .vertices()
            .filter(|&v| !self.matching.is_matched(v))
            .collect();

        self.control_paths.clear();

        // Construct stems from each driver node. `stem_of` maps vertices to
        // the stem they belong to so buds can be attached below.
        let mut vertex_used = self.graph.vertex_bitset_unset();
        let mut stem_of: Vec<Option<usize>> = vec![None; n as usize];

        for &driver in &self.driver_nodes {
            let mut nodes = Vec::new();
            let mut u = driver;
            loop {
                nodes.push(u);
                vertex_used.set_bit(u);
                stem_of[u as usize] = Some(self.control_paths.len());
                match self.matching.match_out(u).first() {
                    Some(&next) => u = next,
                    None => break,
                }
            }
            self.control_paths.push(ControlPath::Stem(Stem::new(nodes)));
        }

        // The remaining matched edges form buds.
        for start in self.graph.vertices() {
            if vertex_used.get_bit(start) || !self.matching.is_matched(start) {
                continue;
            }

            let mut nodes = Vec::new();
            let mut u = start;
            while !vertex_used.get_bit(u) {
                nodes.push(u);
                vertex_used.set_bit(u);
                match self.matching.match_out(u).first() {
                    Some(&next) => u = next,
                    None => break,
                }
            }
            if nodes.len() > 1 && nodes.first() == nodes.last() {
                nodes.pop();
            }

            let mut bud = Bud::new(nodes);

            // Attach the bud to a stem if any bud vertex has an in-neighbor
            // on one.
            let mut attach_to = None;
            'attach: for &w in bud.nodes() {
                for x in self.graph.in_neighbors_of(w) {
                    if let Some(stem_idx) = stem_of[x as usize] {
                        attach_to = Some(stem_idx);
                        break 'attach;
                    }
                }
            }
            if let Some(stem_idx) = attach_to {
                bud.set_stem(stem_idx);
            }

            self.control_paths.push(ControlPath::Bud(bud));
        }

        // Every real network needs at least one input.
        if self.driver_nodes.is_empty() && n > 0 {
            debug!("graph is perfectly matched; forcing vertex 0 into the driver set");
            self.driver_nodes.push(0);
        }

        self.calculated = true;
        Ok(())
    }

    fn controllability(&self) -> f64 {
        let n = self.graph.number_of_nodes();
        if n == 0 {
            return 0.0;
        }
        self.driver_nodes.len() as f64 / n as f64
    }

    fn driver_nodes(&self) -> &[Node] {
        &self.driver_nodes
    }

    fn control_paths(&self) -> &[ControlPath] {
        &self.control_paths
    }

    fn edge_classes(&self) -> Result<Vec<EdgeClass>> {
        if !self.calculated {
            return Err(ControllabilityError::InvalidState);
        }

        let n = self.graph.number_of_nodes();
        let m = self.graph.number_of_edges();

        // (1) Initially, all the edges are redundant.
        let mut result = vec![EdgeClass::Redundant; m as usize];

        // (2) Orient the bipartite graph: matched edges run from the right
        //     side to the left, unmatched ones from left to right.
        let bipartite = self.oriented_bipartite_graph();

        let mut seen = NodeBitSet::new(2 * n);
        let mut queue = VecDeque::new();

        // (3a) Backward reachability from the unmatched copies; every
        //      traversed edge is ordinary.
        self.classifier_seeds(&mut seen, &mut queue);
        while let Some(to) = queue.pop_front() {
            for &e in bipartite.in_edges_of(to) {
                result[e as usize] = EdgeClass::Ordinary;
                let from = bipartite.edge(e).source();
                if !seen.get_bit(from) {
                    seen.set_bit(from);
                    queue.push_back(from);
                }
            }
        }

        // (3b) Forward reachability, same seeds.
        seen.clear_all();
        self.classifier_seeds(&mut seen, &mut queue);
        while let Some(from) = queue.pop_front() {
            for &e in bipartite.out_edges_of(from) {
                result[e as usize] = EdgeClass::Ordinary;
                let to = bipartite.edge(e).target();
                if !seen.get_bit(to) {
                    seen.set_bit(to);
                    queue.push_back(to);
                }
            }
        }

        // (4) Every edge inside a strongly connected component of the
        //     orientation lies on an alternating cycle and is ordinary.
        let components = bipartite.strong_components();
        for e in 0..m {
            let Edge(from, to) = bipartite.edge(e);
            if components.class_of(from) == components.class_of(to) {
                result[e as usize] = EdgeClass::Ordinary;
            }
        }

        // (5) Matched edges that are still redundant are forced: critical.
        for u in self.graph.vertices() {
            for &v in self.matching.match_out(u) {
                if let Some(e) = self.graph.eid(u, v) {
                    if result[e as usize] == EdgeClass::Redundant {
                        result[e as usize] = EdgeClass::Critical;
                    }
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn calculated(graph: &DiGraph) -> LiuModel<'_, DiGraph> {
        let mut model = LiuModel::new(graph);
        model.calculate().unwrap();
        model
    }

    fn sorted_drivers(model: &LiuModel<'_, DiGraph>) -> Vec<Node> {
        model.driver_nodes().iter().copied().sorted().collect()
    }

    #[test]
    fn empty_graph() {
        let graph = DiGraph::new(0);
        let model = calculated(&graph);

        assert!(model.driver_nodes().is_empty());
        assert!(model.control_paths().is_empty());
        assert_eq!(model.controllability(), 0.0);
        assert!(model.edge_classes().unwrap().is_empty());
    }

    #[test]
    fn single_node_without_edges() {
        let graph = DiGraph::new(1);
        let model = calculated(&graph);

        assert_eq!(model.driver_nodes(), [0]);
        assert_eq!(model.control_paths().len(), 1);
        assert_eq!(model.control_paths()[0].nodes(), [0]);
        assert_eq!(model.controllability(), 1.0);
    }

    #[test]
    fn edge_classes_require_calculation() {
        let graph = DiGraph::new(2);
        let model = LiuModel::new(&graph);
        assert_eq!(
            model.edge_classes().unwrap_err(),
            ControllabilityError::InvalidState
        );
    }

    #[test]
    fn directed_path() {
        let graph = DiGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let model = calculated(&graph);

        assert_eq!(model.driver_nodes(), [0]);
        assert_eq!(model.control_paths().len(), 1);
        assert_eq!(model.control_paths()[0].nodes(), [0, 1, 2, 3]);

        assert_eq!(model.edge_classes().unwrap(), vec![EdgeClass::Critical; 3]);
    }

    #[test]
    fn directed_cycle_forces_driver_zero() {
        let graph = DiGraph::from_edges(3, [(0, 1), (1, 2), (2, 0)]);
        let model = calculated(&graph);

        assert_eq!(model.driver_nodes(), [0]);
        assert_eq!(model.control_paths().len(), 1);
        assert!(matches!(model.control_paths()[0], ControlPath::Bud(_)));
        assert_eq!(model.control_paths()[0].nodes().len(), 3);

        assert_eq!(model.edge_classes().unwrap(), vec![EdgeClass::Critical; 3]);
    }

    #[test]
    fn star_out_hub() {
        let graph = DiGraph::from_edges(4, [(0, 1), (0, 2), (0, 3)]);
        let model = calculated(&graph);

        assert_eq!(sorted_drivers(&model), vec![0, 2, 3]);
        assert_eq!(model.controllability(), 0.75);

        let stems = model
            .control_paths()
            .iter()
            .filter(|p| matches!(p, ControlPath::Stem(_)))
            .count();
        assert_eq!(stems, 3);
    }

    #[test]
    fn two_cycles_with_attached_stem() {
        let graph = DiGraph::from_edges(5, [(0, 1), (1, 0), (2, 3), (3, 2), (4, 2)]);
        let model = calculated(&graph);

        assert_eq!(model.driver_nodes(), [4]);

        let buds = model
            .control_paths()
            .iter()
            .filter_map(|p| match p {
                ControlPath::Bud(bud) => Some(bud),
                _ => None,
            })
            .collect_vec();
        assert_eq!(buds.len(), 2);

        // Cycle {0,1} has no in-neighbor outside itself and stays
        // unattached; cycle {2,3} is entered from the stem at vertex 4.
        let attachments = buds.iter().map(|b| b.stem().is_some()).collect_vec();
        assert_eq!(attachments.iter().filter(|&&a| a).count(), 1);
    }

    #[test]
    fn complete_bipartite_k22() {
        let graph = DiGraph::from_edges(4, [(0, 2), (0, 3), (1, 2), (1, 3)]);
        let model = calculated(&graph);

        assert_eq!(sorted_drivers(&model), vec![0, 1]);

        // Every edge lies on the alternating cycle through both maximum
        // matchings, so none of them is forced.
        assert_eq!(model.edge_classes().unwrap(), vec![EdgeClass::Ordinary; 4]);
    }

    #[test]
    fn self_loop_matches_vertex_to_itself() {
        let graph = DiGraph::from_edges(1, [(0, 0)]);
        let model = calculated(&graph);

        assert_eq!(model.driver_nodes(), [0]);
        assert_eq!(model.control_paths().len(), 1);
        assert!(matches!(model.control_paths()[0], ControlPath::Bud(_)));
    }

    #[test]
    fn matching_is_consistent_with_graph() {
        let graph = DiGraph::from_edges(6, [(0, 1), (1, 2), (2, 0), (0, 3), (3, 4), (2, 5)]);
        let model = calculated(&graph);
        let matching = model.matching();

        for v in graph.vertices() {
            let u = matching.match_in(v);
            if u != INVALID_NODE {
                assert!(graph.has_edge(u, v));
                assert!(matching.match_out(u).contains(&v));
            }
        }

        // Every non-driver has exactly one incoming matched edge.
        let drivers = model.driver_nodes();
        for v in graph.vertices() {
            assert_eq!(matching.is_matched(v), !drivers.contains(&v));
        }
    }

    #[test]
    fn stems_and_buds_partition_the_vertex_set() {
        let graph = DiGraph::from_edges(7, [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (0, 6)]);
        let model = calculated(&graph);

        let mut all_nodes = model
            .control_paths()
            .iter()
            .flat_map(|p| p.nodes().iter().copied())
            .collect_vec();
        all_nodes.sort_unstable();

        assert_eq!(all_nodes, graph.vertices().collect_vec());
    }

    #[test]
    fn calculate_is_idempotent() {
        let graph = DiGraph::from_edges(5, [(0, 1), (1, 2), (2, 0), (0, 3), (3, 4)]);

        let mut model = calculated(&graph);
        let drivers = model.driver_nodes().to_vec();
        let classes = model.edge_classes().unwrap();
        let texts = model
            .control_paths()
            .iter()
            .map(|p| p.to_text(model.control_paths(), None))
            .collect_vec();

        model.calculate().unwrap();
        assert_eq!(model.driver_nodes(), drivers);
        assert_eq!(model.edge_classes().unwrap(), classes);
        assert_eq!(
            model
                .control_paths()
                .iter()
                .map(|p| p.to_text(model.control_paths(), None))
                .collect_vec(),
            texts
        );
    }

    #[test]
    fn clone_detached_recomputes_the_same_result() {
        let graph = DiGraph::from_edges(5, [(0, 1), (1, 2), (2, 0), (0, 3), (3, 4)]);
        let mut model = calculated(&graph);

        let mut copy = model.clone_detached();
        copy.calculate().unwrap();
        model.calculate().unwrap();

        assert_eq!(copy.driver_nodes(), model.driver_nodes());
        assert_eq!(copy.edge_classes().unwrap(), model.edge_classes().unwrap());
    }
}
