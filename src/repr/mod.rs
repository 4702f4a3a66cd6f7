/*!
# Graph Representation

This module contains the concrete graph data structure used by the tool.

- [`DiGraph`]
  Stores the edge list in insertion order plus per-vertex incidence arrays
  of edge indices for both directions.
  - Supports parallel edges and self-loops.
  - Constant-time edge lookup by index, fast incident-edge iteration.
  - `has_edge`/`eid` scan the (typically short) out-incidence list.

The edge-index-centric layout is what the controllability solvers need:
edge classes, walk packing and path annotations are all reported per edge
index.
*/

use crate::{edge::*, node::*, ops::*};

pub mod digraph;

pub use digraph::DiGraph;
