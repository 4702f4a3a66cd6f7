/*!
# Control Paths

The routes along which control signals reach the network. The Liu model
produces *stems* (directed paths rooted in a driver node) and *buds*
(cycles, optionally attached to a stem); the switchboard model produces
*open* and *closed walks* that together cover every edge.

All four shapes share a vertex sequence and differ in a small closed set of
capabilities (edge enumeration, textual form, whether an independent input
signal is needed), so they are expressed as one tagged variant. A bud refers
to its attached stem by index into the owning solver's path list; the stem
never points back.
*/

use crate::node::Node;
use crate::ops::EdgeIndexedGraph;
use crate::edge::NumEdges;

/// A directed path of matched edges starting at a driver node.
#[derive(Debug, Clone, Default)]
pub struct Stem {
    nodes: Vec<Node>,
}

impl Stem {
    /// Creates a stem with the given vertex sequence.
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Returns the vertex sequence of the stem.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the root of the stem (i.e. the first vertex).
    pub fn root(&self) -> Node {
        *self.nodes.first().unwrap()
    }

    /// Returns the tip of the stem (i.e. the last vertex).
    pub fn tip(&self) -> Node {
        *self.nodes.last().unwrap()
    }
}

/// A directed cycle of matched edges, optionally attached to a stem.
#[derive(Debug, Clone, Default)]
pub struct Bud {
    nodes: Vec<Node>,
    /// Index of the attached stem in the owning solver's path list.
    stem: Option<usize>,
}

impl Bud {
    /// Creates an unattached bud with the given vertex sequence.
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes, stem: None }
    }

    /// Returns the vertex sequence of the bud.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Attaches the bud to the stem with the given path index.
    pub fn set_stem(&mut self, stem: usize) {
        self.stem = Some(stem);
    }

    /// Returns the path index of the attached stem, if any.
    pub fn stem(&self) -> Option<usize> {
        self.stem
    }
}

/// A directed trail of the switchboard model; open or closed depending on
/// the enclosing [`ControlPath`] variant.
#[derive(Debug, Clone, Default)]
pub struct Walk {
    nodes: Vec<Node>,
}

impl Walk {
    /// Creates a walk with the given vertex sequence.
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Returns the vertex sequence of the walk.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }
}

/// A control path of either model.
#[derive(Debug, Clone)]
pub enum ControlPath {
    Stem(Stem),
    Bud(Bud),
    OpenWalk(Walk),
    ClosedWalk(Walk),
}

impl ControlPath {
    /// Returns a user-friendly name for the control path type, as used in
    /// annotated graph output.
    pub fn name(&self) -> &'static str {
        match self {
            ControlPath::Stem(_) => "stem",
            ControlPath::Bud(_) => "bud",
            ControlPath::OpenWalk(_) => "open walk",
            ControlPath::ClosedWalk(_) => "closed walk",
        }
    }

    /// Returns the vertex sequence of the path.
    pub fn nodes(&self) -> &[Node] {
        match self {
            ControlPath::Stem(stem) => &stem.nodes,
            ControlPath::Bud(bud) => &bud.nodes,
            ControlPath::OpenWalk(walk) | ControlPath::ClosedWalk(walk) => &walk.nodes,
        }
    }

    /// Returns whether the path consumes an independent input signal.
    ///
    /// Stems and open walks always do; closed walks never do; a bud only
    /// when it is not attached to a stem.
    pub fn needs_input_signal(&self) -> bool {
        match self {
            ControlPath::Stem(_) | ControlPath::OpenWalk(_) => true,
            ControlPath::ClosedWalk(_) => false,
            ControlPath::Bud(bud) => bud.stem.is_none(),
        }
    }

    /// Returns `true` for the cyclic path shapes (buds and closed walks)
    /// whose edge sequence wraps around.
    fn is_cyclic(&self) -> bool {
        matches!(self, ControlPath::Bud(_) | ControlPath::ClosedWalk(_))
    }

    /// Returns the edge indices traversed by the path, in path order.
    ///
    /// For cyclic shapes the closing edge back to the first vertex is
    /// included; a single-vertex cycle maps to its self-loop if the graph
    /// has one.
    pub fn edges<G>(&self, graph: &G) -> Vec<NumEdges>
    where
        G: EdgeIndexedGraph,
    {
        let nodes = self.nodes();

        if nodes.is_empty() {
            return Vec::new();
        }
        if nodes.len() == 1 {
            return if self.is_cyclic() {
                graph.eid(nodes[0], nodes[0]).into_iter().collect()
            } else {
                Vec::new()
            };
        }

        let mut result: Vec<NumEdges> = nodes
            .windows(2)
            .filter_map(|w| graph.eid(w[0], w[1]))
            .collect();

        if self.is_cyclic() {
            if let Some(e) = graph.eid(*nodes.last().unwrap(), nodes[0]) {
                result.push(e);
            }
        }

        result
    }

    /// Returns a human-readable one-line form of the path, e.g.
    /// `Stem: 0 1 2`. Vertices are rendered through `names` when given.
    /// `paths` is the owning solver's path list, used to render the stem a
    /// bud is attached to.
    pub fn to_text(&self, paths: &[ControlPath], names: Option<&[String]>) -> String {
        let label = |u: Node| -> String {
            match names.and_then(|ns| ns.get(u as usize)) {
                Some(name) => name.clone(),
                None => u.to_string(),
            }
        };

        let mut out = match self {
            ControlPath::Stem(_) => "Stem:".to_string(),
            ControlPath::Bud(_) => "Bud:".to_string(),
            ControlPath::OpenWalk(_) => "Open walk:".to_string(),
            ControlPath::ClosedWalk(_) => "Closed walk:".to_string(),
        };

        for &u in self.nodes() {
            out.push(' ');
            out.push_str(&label(u));
        }

        if let ControlPath::Bud(bud) = self {
            if let Some(stem_idx) = bud.stem {
                out.push_str(" (assigned to ");
                out.push_str(&paths[stem_idx].to_text(paths, names));
                out.push(')');
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn stem_edges_and_text() {
        let graph = DiGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let path = ControlPath::Stem(Stem::new(vec![0, 1, 2, 3]));

        assert_eq!(path.edges(&graph), vec![0, 1, 2]);
        assert_eq!(path.name(), "stem");
        assert!(path.needs_input_signal());
        assert_eq!(path.to_text(&[], None), "Stem: 0 1 2 3");
    }

    #[test]
    fn bud_edges_wrap_around() {
        let graph = DiGraph::from_edges(3, [(0, 1), (1, 2), (2, 0)]);
        let path = ControlPath::Bud(Bud::new(vec![0, 1, 2]));

        assert_eq!(path.edges(&graph), vec![0, 1, 2]);
        assert!(path.needs_input_signal());
    }

    #[test]
    fn single_node_bud_maps_to_self_loop() {
        let graph = DiGraph::from_edges(2, [(0, 0), (0, 1)]);
        let path = ControlPath::Bud(Bud::new(vec![0]));

        assert_eq!(path.edges(&graph), vec![0]);
    }

    #[test]
    fn attached_bud_renders_its_stem_and_needs_no_signal() {
        let paths = vec![
            ControlPath::Stem(Stem::new(vec![4, 2])),
            ControlPath::Bud(Bud::new(vec![0, 1])),
        ];
        let mut bud = Bud::new(vec![0, 1]);
        bud.set_stem(0);
        let bud = ControlPath::Bud(bud);

        assert!(!bud.needs_input_signal());
        assert_eq!(
            bud.to_text(&paths, None),
            "Bud: 0 1 (assigned to Stem: 4 2)"
        );
    }

    #[test]
    fn names_replace_indices() {
        let names = vec!["a".to_string(), "b".to_string()];
        let path = ControlPath::OpenWalk(Walk::new(vec![0, 1]));

        assert_eq!(path.to_text(&[], Some(&names)), "Open walk: a b");
        assert!(path.needs_input_signal());
    }
}
