/*!
# Switchboard Controllability Model

Structural controllability under switchboard dynamics, where the state lives
on the edges and every vertex acts as a small switchboard between its
incoming and outgoing signals.

Driver nodes follow directly from the degree sequence: every *divergent*
vertex (more outgoing than incoming edges) is a driver, and every
weakly-connected component consisting solely of *balanced* vertices
(`in == out > 0`) contributes one driver of its own. The edge set is then
covered by walks: divergent vertices emit open walks until their imbalance
is used up, the remaining perfectly balanced residual decomposes into closed
walks, and closed walks are spliced into adjacent walks wherever they share
a vertex.
*/

use std::collections::VecDeque;

use fxhash::FxHashSet;

use crate::algo::Connectivity;
use crate::errors::{ControllabilityError, Result};
use crate::model::paths::{ControlPath, Walk};
use crate::model::{ControllabilityModel, EdgeClass};
use crate::prelude::*;

/// Selects how [`SwitchboardModel::controllability`] normalizes the result.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ControllabilityMeasure {
    /// Number of driver nodes over the number of vertices.
    #[default]
    NodeMeasure,
    /// Number of required input signals (open walks plus balanced
    /// components) over the number of edges.
    EdgeMeasure,
}

/// Driver-node discovery and walk packing under switchboard dynamics.
///
/// # Examples
/// ```
/// use ctrlgraphs::prelude::*;
/// use ctrlgraphs::model::ControllabilityModel;
/// use ctrlgraphs::model::switchboard::SwitchboardModel;
///
/// let g = DiGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
/// let mut model = SwitchboardModel::new(&g);
/// model.calculate().unwrap();
///
/// assert_eq!(model.driver_nodes(), [0]);
/// assert_eq!(model.control_paths().len(), 1);
/// ```
pub struct SwitchboardModel<'a, G> {
    graph: &'a G,
    measure: ControllabilityMeasure,
    driver_nodes: Vec<Node>,
    control_paths: Vec<ControlPath>,
    balanced_components: NumNodes,
    calculated: bool,
}

fn is_balanced(out_deg: NumNodes, in_deg: NumNodes) -> bool {
    out_deg == in_deg && out_deg > 0
}

fn walk_nodes_mut(path: &mut ControlPath) -> &mut Vec<Node> {
    match path {
        ControlPath::OpenWalk(walk) | ControlPath::ClosedWalk(walk) => walk.nodes_mut(),
        _ => unreachable!("switchboard paths are walks"),
    }
}

impl<'a, G> SwitchboardModel<'a, G>
where
    G: DirectedAdjacencyList + EdgeIndexedGraph,
{
    /// Creates a model attached to the given graph, with no result yet and
    /// the node-based measure.
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            measure: ControllabilityMeasure::NodeMeasure,
            driver_nodes: Vec::new(),
            control_paths: Vec::new(),
            balanced_components: 0,
            calculated: false,
        }
    }

    /// Sets the controllability measure (builder style).
    pub fn with_measure(mut self, measure: ControllabilityMeasure) -> Self {
        self.set_measure(measure);
        self
    }

    /// Sets the controllability measure.
    pub fn set_measure(&mut self, measure: ControllabilityMeasure) {
        self.measure = measure;
    }

    /// Returns the configured controllability measure.
    pub fn measure(&self) -> ControllabilityMeasure {
        self.measure
    }

    /// Returns a stateless duplicate attached to the same graph, keeping
    /// the configured measure. Results are not copied.
    pub fn clone_detached(&self) -> Self {
        Self::new(self.graph).with_measure(self.measure)
    }

    /// Follows unused outgoing edges from `start`, always taking the one
    /// with the lowest edge index, until getting stuck. Returns an open
    /// walk if the trail ends elsewhere, a closed walk if it returns to
    /// `start`, and `None` if no step could be taken.
    fn walk_from(
        &self,
        start: Node,
        edge_used: &mut EdgeBitSet,
        out_res: &mut [NumNodes],
        in_res: &mut [NumNodes],
    ) -> Option<ControlPath> {
        let mut walk = Vec::new();
        let mut v = start;

        loop {
            let next = self
                .graph
                .out_edges_of(v)
                .iter()
                .copied()
                .find(|&e| !edge_used.get_bit(e));

            let Some(e) = next else {
                break;
            };

            walk.push(v);
            edge_used.set_bit(e);
            out_res[v as usize] -= 1;
            v = self.graph.edge(e).target();
            in_res[v as usize] -= 1;
        }

        if v != start {
            walk.push(v);
            Some(ControlPath::OpenWalk(Walk::new(walk)))
        } else if walk.is_empty() {
            None
        } else {
            Some(ControlPath::ClosedWalk(Walk::new(walk)))
        }
    }

    /// Splices the closed walk `closed` into `host` at the first vertex of
    /// `host` that also occurs on the closed walk.
    fn extend_with(host: &mut Vec<Node>, closed: &[Node]) {
        let closed_set: FxHashSet<Node> = closed.iter().copied().collect();

        let Some(pos) = host.iter().position(|w| closed_set.contains(w)) else {
            return;
        };
        let closed_pos = closed.iter().position(|&w| w == host[pos]).unwrap();

        let rotated = closed[closed_pos..].iter().chain(&closed[..closed_pos]);
        host.splice(pos..pos, rotated.copied());
    }

    /// Repeatedly merges pending closed walks into any path that shares a
    /// vertex with them, until a full pass makes no progress. `path_of_node`
    /// maps vertices to the path (arena index) containing them; merged
    /// walks are emptied in place and flagged.
    fn try_merge_closed_walks(
        &mut self,
        pending: &mut VecDeque<usize>,
        path_of_node: &mut [Option<usize>],
        merged: &mut [bool],
    ) {
        let mut finished = false;

        while !finished {
            finished = true;

            for _ in 0..pending.len() {
                let closed_idx = pending.pop_front().unwrap();

                let host = self.control_paths[closed_idx]
                    .nodes()
                    .iter()
                    .find_map(|&w| match path_of_node[w as usize] {
                        Some(other) if other != closed_idx => Some(other),
                        _ => None,
                    });

                if let Some(host_idx) = host {
                    let closed_nodes =
                        std::mem::take(walk_nodes_mut(&mut self.control_paths[closed_idx]));
                    Self::extend_with(walk_nodes_mut(&mut self.control_paths[host_idx]), &closed_nodes);
                    for &w in &closed_nodes {
                        path_of_node[w as usize] = Some(host_idx);
                    }
                    merged[closed_idx] = true;
                    finished = false;
                } else {
                    pending.push_back(closed_idx);
                }
            }
        }
    }

    /// BFS through balanced vertices, ignoring edge orientation. Returns
    /// *true* iff `v` lies in a non-trivial component in which every
    /// reachable vertex has a zero degree difference; `except` is treated
    /// as absent from the graph.
    fn in_balanced_component(&self, v: Node, diffs: &[i64], except: Option<Node>) -> bool {
        if diffs[v as usize] != 0 {
            return false;
        }

        let neighbors: Vec<Node> = self.graph.all_neighbors_of(v).collect();
        if neighbors.is_empty() || (neighbors.len() == 1 && Some(neighbors[0]) == except) {
            return false;
        }

        let mut visited = self.graph.vertex_bitset_unset();
        let mut queue = VecDeque::new();
        visited.set_bit(v);
        if let Some(u) = except {
            visited.set_bit(u);
        }
        queue.push_back(v);

        while let Some(w) = queue.pop_front() {
            for x in self.graph.all_neighbors_of(w) {
                if visited.get_bit(x) {
                    continue;
                }
                if diffs[x as usize] != 0 {
                    return false;
                }
                visited.set_bit(x);
                queue.push_back(x);
            }
        }

        true
    }

    /// Computes, for every edge, the change in the number of driver nodes
    /// its removal would cause.
    fn changes_in_driver_nodes_after_edge_removal(&self) -> Vec<i32> {
        let mut diffs: Vec<i64> = self
            .graph
            .vertices()
            .map(|w| self.graph.in_degree_of(w) as i64 - self.graph.out_degree_of(w) as i64)
            .collect();

        let mut result = Vec::with_capacity(self.graph.number_of_edges() as usize);

        for Edge(u, v) in self.graph.edges() {
            let (ui, vi) = (u as usize, v as usize);
            let mut change = 0i32;

            if diffs[ui] == -1 {
                // source vertex becomes balanced instead of divergent
                change -= 1;
            }
            if diffs[vi] == 0 {
                // target vertex becomes divergent instead of balanced
                change += 1;
            }

            if diffs[ui] == 0 && diffs[vi] == 0 {
                // u and v may have been part of a balanced component, which
                // already has a driver before the removal
                if self.in_balanced_component(u, &diffs, None) {
                    change -= 1;
                }
            }
            if diffs[vi] == 1 {
                // v is convergent but becomes balanced; if everything around
                // it (except u) is balanced, a new balanced component forms
                diffs[vi] -= 1;
                diffs[ui] += 1;
                if self.in_balanced_component(v, &diffs, Some(u)) {
                    change += 1;
                }
                diffs[vi] += 1;
                diffs[ui] -= 1;
            }
            if diffs[ui] == -1 {
                // symmetric case for the divergent source
                diffs[vi] -= 1;
                diffs[ui] += 1;
                if self.in_balanced_component(u, &diffs, Some(v)) {
                    change += 1;
                }
                diffs[vi] += 1;
                diffs[ui] -= 1;
            }

            result.push(change);
        }

        result
    }
}

impl<'a, G> ControllabilityModel for SwitchboardModel<'a, G>
where
    G: DirectedAdjacencyList + EdgeIndexedGraph,
{
    fn calculate(&mut self) -> Result<()> {
        let n = self.graph.number_of_nodes();

        let out_degrees: Vec<NumNodes> =
            self.graph.vertices().map(|u| self.graph.out_degree_of(u)).collect();
        let in_degrees: Vec<NumNodes> =
            self.graph.vertices().map(|u| self.graph.in_degree_of(u)).collect();

        // Divergent vertices are drivers; count the balanced ones.
        self.driver_nodes.clear();
        let mut balanced_count = 0;
        for u in self.graph.vertices() {
            let (o, i) = (out_degrees[u as usize], in_degrees[u as usize]);
            if o > i {
                self.driver_nodes.push(u);
            } else if is_balanced(o, i) {
                balanced_count += 1;
            }
        }

        // Each fully balanced weak component gets one driver: its
        // lowest-indexed vertex.
        self.balanced_components = 0;
        if balanced_count > 0 {
            let components = self.graph.weak_components();

            let mut component_balanced = vec![true; components.number_of_components() as usize];
            for u in self.graph.vertices() {
                if !is_balanced(out_degrees[u as usize], in_degrees[u as usize]) {
                    component_balanced[components.class_of(u) as usize] = false;
                }
            }

            self.balanced_components =
                component_balanced.iter().filter(|&&b| b).count() as NumNodes;

            for u in self.graph.vertices() {
                let c = components.class_of(u) as usize;
                if component_balanced[c] {
                    self.driver_nodes.push(u);
                    component_balanced[c] = false;
                }
            }
        }

        self.control_paths.clear();

        let mut edge_used = self.graph.edge_bitset_unset();
        let mut out_res = out_degrees;
        let mut in_res = in_degrees;
        let mut path_of_node: Vec<Option<usize>> = vec![None; n as usize];

        // Phase 1: drain every divergent vertex. The balanced-component
        // drivers at the tail of the list are skipped by the loop condition.
        for i in 0..self.driver_nodes.len() {
            let driver = self.driver_nodes[i];
            while out_res[driver as usize] > in_res[driver as usize] {
                let Some(path) = self.walk_from(driver, &mut edge_used, &mut out_res, &mut in_res)
                else {
                    break;
                };
                for &w in path.nodes() {
                    path_of_node[w as usize] = Some(self.control_paths.len());
                }
                self.control_paths.push(path);
            }
        }

        // Phase 2: the residual degrees are balanced everywhere, so the
        // remaining edges decompose into closed walks.
        let mut pending = VecDeque::new();
        for u in self.graph.vertices() {
            while out_res[u as usize] > 0 {
                let Some(path) = self.walk_from(u, &mut edge_used, &mut out_res, &mut in_res)
                else {
                    break;
                };
                pending.push_back(self.control_paths.len());
                self.control_paths.push(path);
            }
        }

        // Merge closed walks into adjacent open walks first; only then make
        // the survivors visible to each other and merge among them.
        let mut merged = vec![false; self.control_paths.len()];
        self.try_merge_closed_walks(&mut pending, &mut path_of_node, &mut merged);

        for &closed_idx in &pending {
            for &w in self.control_paths[closed_idx].nodes() {
                path_of_node[w as usize] = Some(closed_idx);
            }
        }
        self.try_merge_closed_walks(&mut pending, &mut path_of_node, &mut merged);

        let mut keep = merged.iter().map(|&m| !m);
        self.control_paths.retain(|_| keep.next().unwrap());

        self.calculated = true;
        Ok(())
    }

    fn controllability(&self) -> f64 {
        match self.measure {
            ControllabilityMeasure::NodeMeasure => {
                let n = self.graph.number_of_nodes();
                if n == 0 {
                    return 0.0;
                }
                self.driver_nodes.len() as f64 / n as f64
            }
            ControllabilityMeasure::EdgeMeasure => {
                let m = self.graph.number_of_edges();
                if m == 0 {
                    return 0.0;
                }
                let signals = self
                    .control_paths
                    .iter()
                    .filter(|p| p.needs_input_signal())
                    .count() as NumNodes
                    + self.balanced_components;
                signals as f64 / m as f64
            }
        }
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

        Ok(self
            .changes_in_driver_nodes_after_edge_removal()
            .into_iter()
            .map(|change| match change {
                c if c < 0 => EdgeClass::Distinguished,
                0 => EdgeClass::Redundant,
                _ => EdgeClass::Critical,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn calculated(graph: &DiGraph) -> SwitchboardModel<'_, DiGraph> {
        let mut model = SwitchboardModel::new(graph);
        model.calculate().unwrap();
        model
    }

    fn sorted_drivers(model: &SwitchboardModel<'_, DiGraph>) -> Vec<Node> {
        model.driver_nodes().iter().copied().sorted().collect()
    }

    /// Every edge of the graph must be covered by exactly one walk slot.
    fn assert_edge_cover(graph: &DiGraph, model: &SwitchboardModel<'_, DiGraph>) {
        let mut covered = model
            .control_paths()
            .iter()
            .flat_map(|p| p.edges(graph))
            .collect_vec();
        covered.sort_unstable();
        assert_eq!(covered, (0..graph.number_of_edges()).collect_vec());
    }

    #[test]
    fn empty_graph() {
        let graph = DiGraph::new(0);
        let model = calculated(&graph);

        assert!(model.driver_nodes().is_empty());
        assert!(model.control_paths().is_empty());
        assert_eq!(model.controllability(), 0.0);
    }

    #[test]
    fn directed_path() {
        let graph = DiGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let model = calculated(&graph);

        assert_eq!(model.driver_nodes(), [0]);
        assert_eq!(model.control_paths().len(), 1);
        assert_eq!(model.control_paths()[0].nodes(), [0, 1, 2, 3]);
        assert!(model.control_paths()[0].needs_input_signal());
        assert_eq!(model.controllability(), 0.25);
        assert_edge_cover(&graph, &model);

        assert_eq!(model.edge_classes().unwrap(), vec![
            EdgeClass::Redundant,
            EdgeClass::Critical,
            EdgeClass::Redundant
        ]);
    }

    #[test]
    fn directed_cycle_is_one_balanced_component() {
        let graph = DiGraph::from_edges(3, [(0, 1), (1, 2), (2, 0)]);
        let model = calculated(&graph);

        assert_eq!(model.driver_nodes(), [0]);
        assert_eq!(model.control_paths().len(), 1);
        assert!(matches!(
            model.control_paths()[0],
            ControlPath::ClosedWalk(_)
        ));
        assert_edge_cover(&graph, &model);

        // Removing any cycle edge turns its target into a divergent driver
        // while dissolving the balanced component; the count is unchanged.
        assert_eq!(
            model.edge_classes().unwrap(),
            vec![EdgeClass::Redundant; 3]
        );
    }

    #[test]
    fn sole_edge_is_distinguished() {
        let graph = DiGraph::from_edges(2, [(0, 1)]);
        let model = calculated(&graph);

        assert_eq!(model.driver_nodes(), [0]);
        assert_eq!(
            model.edge_classes().unwrap(),
            vec![EdgeClass::Distinguished]
        );
    }

    #[test]
    fn star_out_hub_needs_three_walks() {
        let graph = DiGraph::from_edges(4, [(0, 1), (0, 2), (0, 3)]);
        let model = calculated(&graph);

        assert_eq!(model.driver_nodes(), [0]);
        assert_eq!(model.control_paths().len(), 3);
        assert!(model
            .control_paths()
            .iter()
            .all(|p| matches!(p, ControlPath::OpenWalk(_))));
        assert_edge_cover(&graph, &model);
    }

    #[test]
    fn balanced_component_gets_its_own_driver() {
        let graph = DiGraph::from_edges(5, [(0, 1), (1, 0), (2, 3), (3, 2), (4, 2)]);
        let model = calculated(&graph);

        assert_eq!(sorted_drivers(&model), vec![0, 4]);
        assert_edge_cover(&graph, &model);

        let kinds = model.control_paths().iter().map(|p| p.name()).collect_vec();
        assert_eq!(kinds, vec!["open walk", "closed walk"]);
    }

    #[test]
    fn closed_walk_is_spliced_into_open_walk() {
        let graph = DiGraph::from_edges(
            6,
            [(0, 1), (1, 2), (2, 3), (3, 4), (2, 5), (5, 2)],
        );
        let model = calculated(&graph);

        assert_eq!(model.driver_nodes(), [0]);
        assert_eq!(model.control_paths().len(), 1);
        assert_eq!(model.control_paths()[0].nodes(), [0, 1, 2, 5, 2, 3, 4]);
        assert_edge_cover(&graph, &model);
    }

    #[test]
    fn edge_measure_counts_signals_and_balanced_components() {
        // two open walks out of the divergent vertex 0 plus the separate
        // balanced cycle {3,4}
        let graph = DiGraph::from_edges(5, [(0, 1), (0, 2), (3, 4), (4, 3)]);

        let mut model = SwitchboardModel::new(&graph)
            .with_measure(ControllabilityMeasure::EdgeMeasure);
        model.calculate().unwrap();

        assert_eq!(model.measure(), ControllabilityMeasure::EdgeMeasure);
        assert_eq!(model.controllability(), 3.0 / 4.0);
    }

    #[test]
    fn node_measure_is_driver_fraction() {
        let graph = DiGraph::from_edges(4, [(0, 1), (0, 2), (0, 3)]);
        let model = calculated(&graph);
        assert_eq!(model.controllability(), 0.25);
    }

    #[test]
    fn calculate_is_idempotent() {
        let graph = DiGraph::from_edges(
            6,
            [(0, 1), (1, 2), (2, 3), (3, 4), (2, 5), (5, 2)],
        );
        let mut model = calculated(&graph);
        let drivers = model.driver_nodes().to_vec();
        let nodes = model.control_paths()[0].nodes().to_vec();

        model.calculate().unwrap();
        assert_eq!(model.driver_nodes(), drivers);
        assert_eq!(model.control_paths()[0].nodes(), nodes);
    }

    #[test]
    fn clone_detached_keeps_measure() {
        let graph = DiGraph::from_edges(2, [(0, 1)]);
        let model = SwitchboardModel::new(&graph)
            .with_measure(ControllabilityMeasure::EdgeMeasure);

        let mut copy = model.clone_detached();
        assert_eq!(copy.measure(), ControllabilityMeasure::EdgeMeasure);
        copy.calculate().unwrap();
        assert_eq!(copy.controllability(), 1.0);
    }

    #[test]
    fn edge_classes_require_calculation() {
        let graph = DiGraph::from_edges(2, [(0, 1)]);
        let model = SwitchboardModel::new(&graph);
        assert_eq!(
            model.edge_classes().unwrap_err(),
            ControllabilityError::InvalidState
        );
    }

    #[test]
    fn self_loop_is_covered() {
        let graph = DiGraph::from_edges(2, [(0, 0), (0, 1)]);
        let model = calculated(&graph);

        assert_eq!(model.driver_nodes(), [0]);
        assert_edge_cover(&graph, &model);
    }
}
