/*!
`ctrlgraphs` analyzes the *structural controllability* of directed complex
networks. Given a directed graph, it computes

- a minimum set of **driver nodes** that suffices to steer the network under
  one of two dynamical models,
- the **control paths** (stems and buds, or open and closed walks) that route
  control signals from the drivers through the rest of the network,
- a per-edge **classification** describing how removing the edge would change
  the number of required drivers.

# Models

Two dynamics are supported:

- **Liu et al.** (nodal dynamics): controllability reduces to a maximum
  matching on a bipartite graph derived from the network. Unmatched vertices
  are the drivers; the matching decomposes into *stems* and *buds*. See
  [`model::liu`].
- **Switchboard dynamics** (edge dynamics): drivers follow from per-vertex
  degree imbalance, and the edge set is covered by open and closed walks.
  See [`model::switchboard`].

# Representation

Nodes are `u32` in the range `0..n`; edges are ordered pairs `Edge(u, v)`
carrying an index in insertion order. Parallel edges and self-loops are
allowed. The one concrete representation is [`repr::DiGraph`]; the solvers
only rely on the traits in [`ops`], so alternative backends can be plugged in.

# Usage

```
use ctrlgraphs::prelude::*;
use ctrlgraphs::model::liu::LiuModel;
use ctrlgraphs::model::ControllabilityModel;

let g = DiGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
let mut model = LiuModel::new(&g);
model.calculate().unwrap();
assert_eq!(model.driver_nodes(), [0]);
```
*/

pub mod algo;
pub mod analysis;
pub mod edge;
pub mod errors;
pub mod gens;
pub mod io;
pub mod model;
pub mod node;
pub mod ops;
pub mod repr;

/// `ctrlgraphs::prelude` includes definitions for nodes and edges, all basic
/// graph operation traits as well as the concrete graph representation.
pub mod prelude {
    pub use super::{edge::*, node::*, ops::*, repr::*};
}
